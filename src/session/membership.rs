use std::collections::{BTreeSet, HashMap};

use super::room::{ConnectionId, RoomId, RoomSpace};

/// Room id to member set. A room exists only while it has members.
///
/// No locking of its own: the coordinator owns it behind its mutex.
#[derive(Debug, Default)]
pub struct MembershipTable {
    rooms: HashMap<RoomId, BTreeSet<ConnectionId>>,
}

impl MembershipTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the connection was already a member
    pub fn add(&mut self, room: &RoomId, conn: &ConnectionId) -> bool {
        self.rooms
            .entry(room.clone())
            .or_default()
            .insert(conn.clone())
    }

    /// Returns false if the connection was not a member. Drops the room
    /// entry once its last member is gone.
    pub fn remove(&mut self, room: &RoomId, conn: &ConnectionId) -> bool {
        let Some(members) = self.rooms.get_mut(room) else {
            return false;
        };
        let removed = members.remove(conn);
        if members.is_empty() {
            self.rooms.remove(room);
        }
        removed
    }

    /// Snapshot of the member set, in a stable order
    pub fn members(&self, room: &RoomId) -> Vec<ConnectionId> {
        self.rooms
            .get(room)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn contains(&self, room: &RoomId) -> bool {
        self.rooms.contains_key(room)
    }

    pub fn count(&self, space: RoomSpace) -> usize {
        self.rooms.keys().filter(|room| room.space == space).count()
    }
}
