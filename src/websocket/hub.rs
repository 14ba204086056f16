use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error};

use crate::session::{ConnectionId, Dispatch};

/// Outbound channel of every open socket, keyed by connection id
#[derive(Default)]
pub struct ConnectionHub {
    senders: RwLock<HashMap<ConnectionId, UnboundedSender<String>>>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<ConnectionId, UnboundedSender<String>>> {
        self.senders.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ConnectionId, UnboundedSender<String>>> {
        self.senders.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Open the outbound queue of a new socket
    pub fn register(&self, conn: &ConnectionId) -> UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.write().insert(conn.clone(), tx);
        rx
    }

    /// Closing the sender ends the socket's write loop
    pub fn unregister(&self, conn: &ConnectionId) {
        self.write().remove(conn);
    }

    /// Fire and forget. Recipients that are gone are skipped silently.
    pub fn deliver(&self, dispatches: Vec<Dispatch>) {
        if dispatches.is_empty() {
            return;
        }
        let senders = self.read();
        for dispatch in dispatches {
            let frame = match serde_json::to_string(&dispatch.event) {
                Ok(frame) => frame,
                Err(e) => {
                    error!("Failed to serialize outbound event: {}", e);
                    continue;
                }
            };
            for recipient in &dispatch.recipients {
                match senders.get(recipient) {
                    Some(tx) => {
                        if tx.send(frame.clone()).is_err() {
                            debug!("Socket {} closed, dropping frame", recipient);
                        }
                    }
                    None => debug!("No connection {}, dropping frame", recipient),
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }
}
