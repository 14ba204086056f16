use std::collections::{BTreeSet, HashMap};

use super::room::{ConnectionId, RoomId};

/// What the server knows about one live connection
#[derive(Clone, Debug, Default)]
pub struct Connection {
    pub display_name: Option<String>,
    pub rooms: BTreeSet<RoomId>,
}

/// Live connections and the rooms each of them currently holds.
///
/// An entry exists from connect until disconnect; its absence is what makes
/// a second disconnect a no-op.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the connection was already registered
    pub fn register(&mut self, conn: &ConnectionId) -> bool {
        if self.connections.contains_key(conn) {
            return false;
        }
        self.connections.insert(conn.clone(), Connection::default());
        true
    }

    pub fn contains(&self, conn: &ConnectionId) -> bool {
        self.connections.contains_key(conn)
    }

    /// Overwrites any earlier name; no uniqueness check
    pub fn set_display_name(&mut self, conn: &ConnectionId, name: &str) {
        if let Some(entry) = self.connections.get_mut(conn) {
            entry.display_name = Some(name.to_string());
        }
    }

    pub fn display_name(&self, conn: &ConnectionId) -> Option<String> {
        self.connections
            .get(conn)
            .and_then(|entry| entry.display_name.clone())
    }

    pub fn track_join(&mut self, conn: &ConnectionId, room: &RoomId) {
        if let Some(entry) = self.connections.get_mut(conn) {
            entry.rooms.insert(room.clone());
        }
    }

    pub fn track_leave(&mut self, conn: &ConnectionId, room: &RoomId) {
        if let Some(entry) = self.connections.get_mut(conn) {
            entry.rooms.remove(room);
        }
    }

    /// Drop the connection, handing back what it held
    pub fn remove(&mut self, conn: &ConnectionId) -> Option<Connection> {
        self.connections.remove(conn)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }
}
