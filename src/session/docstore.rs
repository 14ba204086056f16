use moka::sync::Cache;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::info;

type OpLog = Arc<Mutex<Vec<Value>>>;

/// Append-only operation logs keyed by document room.
///
/// Logs outlive room membership: a room that empties and is joined again
/// resumes the same history. With an idle TTL configured, a log nobody
/// touched for that long is dropped and starts over empty.
pub struct DocumentStore {
    logs: Cache<String, OpLog>,
}

impl DocumentStore {
    /// Neither bound set means logs live as long as the process
    pub fn new(max_rooms: Option<u64>, idle_ttl: Option<Duration>) -> Self {
        let mut builder = Cache::builder();
        if let Some(max) = max_rooms {
            builder = builder.max_capacity(max);
        }
        if let Some(ttl) = idle_ttl {
            builder = builder.time_to_idle(ttl);
        }
        info!(
            "Document store initialized (max_rooms={:?}, idle_ttl={:?})",
            max_rooms, idle_ttl
        );
        Self {
            logs: builder.build(),
        }
    }

    fn log(&self, key: &str) -> OpLog {
        self.logs
            .get_with(key.to_string(), || Arc::new(Mutex::new(Vec::new())))
    }

    /// Current log for `key`, creating an empty one if there is none
    pub fn get(&self, key: &str) -> Vec<Value> {
        let log = self.log(key);
        let ops = lock(&log);
        ops.clone()
    }

    /// Current log for `key` without creating it
    pub fn peek(&self, key: &str) -> Option<Vec<Value>> {
        let log = self.logs.get(key)?;
        let ops = lock(&log).clone();
        Some(ops)
    }

    /// Append `ops` in order behind everything already stored
    pub fn append(&self, key: &str, ops: &[Value]) {
        let log = self.log(key);
        lock(&log).extend_from_slice(ops);
    }

    pub fn len(&self) -> u64 {
        self.logs.run_pending_tasks();
        self.logs.entry_count()
    }
}

fn lock(log: &OpLog) -> MutexGuard<'_, Vec<Value>> {
    log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
