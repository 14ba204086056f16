use serde_json::Value;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use super::docstore::DocumentStore;
use super::membership::MembershipTable;
use super::registry::ConnectionRegistry;
use super::room::{ConnectionId, RoomId, RoomKind, RoomSpace};
use super::signaling::{SignalKind, SignalingRelay};
use crate::models::{
    ClientInfo, CodeMessage, CursorUpdateMessage, Delta, DisconnectedMessage, DocInitMessage,
    DocumentSnapshot, JoinedMessage, ServerEvent, VoiceParticipant, VoiceUserMessage,
};

const UNKNOWN_USER: &str = "Unknown User";

/// One outbound event and the connections it goes to.
///
/// Delivery is best effort and unacknowledged: recipients that are gone by
/// the time the transport gets to them are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub recipients: Vec<ConnectionId>,
    pub event: ServerEvent,
}

impl Dispatch {
    pub fn to_one(recipient: ConnectionId, event: ServerEvent) -> Self {
        Self {
            recipients: vec![recipient],
            event,
        }
    }

    pub fn to_many(recipients: Vec<ConnectionId>, event: ServerEvent) -> Self {
        Self { recipients, event }
    }
}

/// Counters for the diagnostics endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    pub connections: usize,
    pub shared_rooms: usize,
    pub voice_rooms: usize,
    pub documents: u64,
}

struct SessionState {
    registry: ConnectionRegistry,
    rooms: MembershipTable,
    documents: DocumentStore,
}

impl SessionState {
    fn clients(&self, room: &RoomId) -> Vec<ClientInfo> {
        self.rooms
            .members(room)
            .into_iter()
            .map(|socket_id| ClientInfo {
                username: self.registry.display_name(&socket_id),
                socket_id,
            })
            .collect()
    }

    fn others(&self, room: &RoomId, conn: &ConnectionId) -> Vec<ConnectionId> {
        self.rooms
            .members(room)
            .into_iter()
            .filter(|member| member != conn)
            .collect()
    }
}

/// Owns every piece of shared room state and serializes all access to it.
///
/// Each operation takes the lock, mutates, computes who hears about it and
/// returns the dispatches. The caller delivers them after the lock is
/// released, so a slow socket never holds up the state of the others.
pub struct SessionCoordinator {
    state: Mutex<SessionState>,
}

impl SessionCoordinator {
    pub fn new(documents: DocumentStore) -> Self {
        Self {
            state: Mutex::new(SessionState {
                registry: ConnectionRegistry::new(),
                rooms: MembershipTable::new(),
                documents,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn connect(&self, conn: &ConnectionId) -> bool {
        let registered = self.lock().registry.register(conn);
        if registered {
            info!("Connection {} registered", conn);
        } else {
            warn!("Connection {} was already registered", conn);
        }
        registered
    }

    /// Join the room `key` through one event family. Code and document joins
    /// share a member set; `kind` only picks what gets sent.
    pub fn join(&self, conn: &ConnectionId, kind: RoomKind, key: &str, username: &str) -> Vec<Dispatch> {
        let room = kind.room(key);
        let mut state = self.lock();
        if !state.registry.contains(conn) {
            warn!("Ignoring join of {} from unregistered connection {}", room, conn);
            return Vec::new();
        }

        state.registry.set_display_name(conn, username);
        state.rooms.add(&room, conn);
        state.registry.track_join(conn, &room);
        info!("{} ({}) joined {}", username, conn, room);

        let dispatches = match kind {
            // Everyone, the joiner included, gets the fresh member list
            RoomKind::Code => {
                let event = ServerEvent::Joined(JoinedMessage {
                    clients: state.clients(&room),
                    username: username.to_string(),
                    socket_id: conn.clone(),
                });
                vec![Dispatch::to_many(state.rooms.members(&room), event)]
            }
            RoomKind::Document => {
                let ops = state.documents.get(&room.key);
                let clients = state.clients(&room);
                let init = ServerEvent::DocInit(DocInitMessage {
                    document: DocumentSnapshot { ops },
                    clients: clients.clone(),
                });
                let joined = ServerEvent::DocJoined(JoinedMessage {
                    clients,
                    username: username.to_string(),
                    socket_id: conn.clone(),
                });
                vec![
                    Dispatch::to_one(conn.clone(), init),
                    Dispatch::to_many(state.others(&room, conn), joined),
                ]
            }
            RoomKind::Voice => {
                let others = state.others(&room, conn);
                let participants = others
                    .iter()
                    .map(|id| VoiceParticipant {
                        id: id.clone(),
                        name: state
                            .registry
                            .display_name(id)
                            .unwrap_or_else(|| UNKNOWN_USER.to_string()),
                    })
                    .collect();
                let joined = ServerEvent::VoiceUserJoined(VoiceUserMessage {
                    user_id: conn.clone(),
                    username: Some(username.to_string()),
                });
                vec![
                    Dispatch::to_one(conn.clone(), ServerEvent::VoiceParticipants(participants)),
                    Dispatch::to_many(others, joined),
                ]
            }
        };
        non_empty(dispatches)
    }

    /// Leave a single room; a room the connection is not in is a no-op
    pub fn leave(&self, conn: &ConnectionId, kind: RoomKind, key: &str) -> Vec<Dispatch> {
        let room = kind.room(key);
        let mut state = self.lock();
        if !state.rooms.remove(&room, conn) {
            debug!("{} is not in {}, nothing to leave", conn, room);
            return Vec::new();
        }
        state.registry.track_leave(conn, &room);
        info!("{} left {}", conn, room);

        let username = state.registry.display_name(conn);
        let remaining = state.rooms.members(&room);
        let mut dispatches = Vec::new();
        match kind {
            RoomKind::Code => {
                dispatches.push(disconnected(&remaining, conn, username));
            }
            RoomKind::Document => {
                dispatches.push(cursor_removed(&remaining, conn));
                dispatches.push(disconnected(&remaining, conn, username));
            }
            RoomKind::Voice => {
                dispatches.push(voice_user_left(&remaining, conn, username));
            }
        }
        non_empty(dispatches)
    }

    /// Append the batch to the room's log, then hand it unchanged to every
    /// other member. Never merged, never rejected.
    pub fn apply_document_change(
        &self,
        conn: &ConnectionId,
        key: &str,
        delta: Delta,
    ) -> Vec<Dispatch> {
        let state = self.lock();
        if !state.registry.contains(conn) {
            warn!("Ignoring change to document {} from unregistered connection {}", key, conn);
            return Vec::new();
        }
        state.documents.append(key, &delta.ops);
        debug!("Appended {} ops to document {} from {}", delta.ops.len(), key, conn);

        let others = state.others(&RoomId::shared(key), conn);
        non_empty(vec![Dispatch::to_many(
            others,
            ServerEvent::DocReceiveChanges(delta),
        )])
    }

    /// Code keeps no server copy; the payload only fans out
    pub fn apply_code_change(&self, conn: &ConnectionId, key: &str, code: Value) -> Vec<Dispatch> {
        let state = self.lock();
        if !state.registry.contains(conn) {
            warn!("Ignoring code change in {} from unregistered connection {}", key, conn);
            return Vec::new();
        }
        let others = state.others(&RoomId::shared(key), conn);
        non_empty(vec![Dispatch::to_many(
            others,
            ServerEvent::CodeChange(CodeMessage { code }),
        )])
    }

    pub fn move_cursor(&self, conn: &ConnectionId, key: &str, range: Value) -> Vec<Dispatch> {
        let state = self.lock();
        if !state.registry.contains(conn) {
            return Vec::new();
        }
        let event = ServerEvent::DocCursorUpdate(CursorUpdateMessage {
            socket_id: conn.clone(),
            username: state.registry.display_name(conn),
            range,
        });
        non_empty(vec![Dispatch::to_many(
            state.others(&RoomId::shared(key), conn),
            event,
        )])
    }

    /// Push a member's code straight to one named peer, usually a late joiner
    pub fn sync_code(&self, conn: &ConnectionId, target: ConnectionId, code: Value) -> Vec<Dispatch> {
        if !self.lock().registry.contains(conn) {
            return Vec::new();
        }
        debug!("Syncing code from {} to {}", conn, target);
        vec![Dispatch::to_one(
            target,
            ServerEvent::CodeChange(CodeMessage { code }),
        )]
    }

    pub fn relay_signal(
        &self,
        conn: &ConnectionId,
        kind: SignalKind,
        target: ConnectionId,
        payload: Value,
    ) -> Vec<Dispatch> {
        if !self.lock().registry.contains(conn) {
            return Vec::new();
        }
        vec![SignalingRelay::forward(kind, conn, target, payload)]
    }

    /// Remove the connection from every room it holds and tell whoever is
    /// left. Runs at most once per connection: the registry entry is taken
    /// out first, so a second call finds nothing to clean. A key joined as
    /// both code and document is one held room and is announced once.
    pub fn disconnect(&self, conn: &ConnectionId) -> Vec<Dispatch> {
        let mut state = self.lock();
        let Some(connection) = state.registry.remove(conn) else {
            debug!("Connection {} already cleaned up", conn);
            return Vec::new();
        };

        let mut dispatches = Vec::new();
        for room in &connection.rooms {
            state.rooms.remove(room, conn);
            let remaining = state.rooms.members(room);
            if remaining.is_empty() {
                debug!("Room {} is now empty", room);
                continue;
            }
            dispatches.push(cursor_removed(&remaining, conn));
            dispatches.push(disconnected(&remaining, conn, connection.display_name.clone()));
            if room.is_voice() {
                dispatches.push(voice_user_left(&remaining, conn, connection.display_name.clone()));
            }
        }
        info!(
            "Connection {} disconnected, left {} room(s)",
            conn,
            connection.rooms.len()
        );
        dispatches
    }

    pub fn clients(&self, room: &RoomId) -> Vec<ClientInfo> {
        self.lock().clients(room)
    }

    /// Stored log of a document room, if one exists
    pub fn document(&self, key: &str) -> Option<Vec<Value>> {
        self.lock().documents.peek(key)
    }

    pub fn is_connected(&self, conn: &ConnectionId) -> bool {
        self.lock().registry.contains(conn)
    }

    pub fn stats(&self) -> SessionStats {
        let state = self.lock();
        SessionStats {
            connections: state.registry.len(),
            shared_rooms: state.rooms.count(RoomSpace::Shared),
            voice_rooms: state.rooms.count(RoomSpace::Voice),
            documents: state.documents.len(),
        }
    }
}

fn non_empty(dispatches: Vec<Dispatch>) -> Vec<Dispatch> {
    dispatches
        .into_iter()
        .filter(|dispatch| !dispatch.recipients.is_empty())
        .collect()
}

fn cursor_removed(remaining: &[ConnectionId], conn: &ConnectionId) -> Dispatch {
    Dispatch::to_many(remaining.to_vec(), ServerEvent::DocCursorRemoved(conn.clone()))
}

fn disconnected(remaining: &[ConnectionId], conn: &ConnectionId, username: Option<String>) -> Dispatch {
    Dispatch::to_many(
        remaining.to_vec(),
        ServerEvent::Disconnected(DisconnectedMessage {
            socket_id: conn.clone(),
            username,
        }),
    )
}

fn voice_user_left(remaining: &[ConnectionId], conn: &ConnectionId, username: Option<String>) -> Dispatch {
    Dispatch::to_many(
        remaining.to_vec(),
        ServerEvent::VoiceUserLeft(VoiceUserMessage {
            user_id: conn.clone(),
            username,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn coordinator() -> SessionCoordinator {
        SessionCoordinator::new(DocumentStore::new(None, None))
    }

    fn connected(coord: &SessionCoordinator, name: &str) -> ConnectionId {
        let id = ConnectionId::from(name);
        assert!(coord.connect(&id));
        id
    }

    /// Every event `conn` would receive from `dispatches`, in order
    fn received(dispatches: &[Dispatch], conn: &ConnectionId) -> Vec<ServerEvent> {
        dispatches
            .iter()
            .filter(|d| d.recipients.contains(conn))
            .map(|d| d.event.clone())
            .collect()
    }

    fn member_ids(coord: &SessionCoordinator, room: &RoomId) -> Vec<ConnectionId> {
        coord.clients(room).into_iter().map(|c| c.socket_id).collect()
    }

    #[test]
    fn code_join_notifies_everyone_including_joiner() {
        let coord = coordinator();
        let a = connected(&coord, "a");
        let b = connected(&coord, "b");
        coord.join(&a, RoomKind::Code, "r1", "alice");

        let out = coord.join(&b, RoomKind::Code, "r1", "bob");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].recipients, vec![a.clone(), b.clone()]);
        match &out[0].event {
            ServerEvent::Joined(msg) => {
                assert_eq!(msg.socket_id, b);
                assert_eq!(msg.username, "bob");
                assert_eq!(msg.clients.len(), 2);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn document_join_sends_snapshot_to_joiner_and_notice_to_others() {
        let coord = coordinator();
        let a = connected(&coord, "a");
        let b = connected(&coord, "b");
        coord.join(&a, RoomKind::Document, "r1", "alice");

        let out = coord.join(&b, RoomKind::Document, "r1", "bob");
        let to_b = received(&out, &b);
        let to_a = received(&out, &a);
        assert_eq!(to_b.len(), 1);
        assert!(matches!(to_b[0], ServerEvent::DocInit(_)));
        assert_eq!(to_a.len(), 1);
        assert!(matches!(to_a[0], ServerEvent::DocJoined(_)));
    }

    #[test]
    fn first_document_joiner_only_gets_init() {
        let coord = coordinator();
        let a = connected(&coord, "a");
        let out = coord.join(&a, RoomKind::Document, "r1", "alice");
        assert_eq!(out.len(), 1);
        assert_eq!(coord.document("r1"), Some(vec![]));
    }

    #[test]
    fn late_joiner_receives_log_and_sender_is_never_echoed() {
        let coord = coordinator();
        let a = connected(&coord, "a");
        let b = connected(&coord, "b");
        coord.join(&a, RoomKind::Document, "r1", "alice");

        let out = coord.apply_document_change(&a, "r1", Delta::new(vec![json!("x")]));
        assert!(received(&out, &a).is_empty());

        let out = coord.join(&b, RoomKind::Document, "r1", "bob");
        match &received(&out, &b)[0] {
            ServerEvent::DocInit(init) => {
                assert_eq!(init.document.ops, vec![json!("x")]);
                assert_eq!(init.clients.len(), 2);
            }
            other => panic!("unexpected event {:?}", other),
        }

        let out = coord.apply_document_change(&b, "r1", Delta::new(vec![json!("y")]));
        assert_eq!(
            received(&out, &a),
            vec![ServerEvent::DocReceiveChanges(Delta::new(vec![json!("y")]))]
        );
        assert!(received(&out, &b).is_empty());
        assert_eq!(coord.document("r1"), Some(vec![json!("x"), json!("y")]));
    }

    #[test]
    fn change_to_unjoined_document_creates_the_log() {
        let coord = coordinator();
        let a = connected(&coord, "a");
        let out = coord.apply_document_change(&a, "fresh", Delta::new(vec![json!(1)]));
        assert!(out.is_empty());
        assert_eq!(coord.document("fresh"), Some(vec![json!(1)]));
    }

    #[test]
    fn code_change_goes_to_other_members_only() {
        let coord = coordinator();
        let a = connected(&coord, "a");
        let b = connected(&coord, "b");
        let c = connected(&coord, "c");
        coord.join(&a, RoomKind::Code, "r1", "alice");
        coord.join(&b, RoomKind::Code, "r1", "bob");
        coord.join(&c, RoomKind::Code, "r2", "carol");

        let out = coord.apply_code_change(&a, "r1", json!("fn main() {}"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].recipients, vec![b]);
        assert!(coord.document("r1").is_none());
    }

    #[test]
    fn code_and_document_joins_share_one_room() {
        let coord = coordinator();
        let a = connected(&coord, "a");
        let b = connected(&coord, "b");
        coord.join(&a, RoomKind::Code, "r1", "alice");

        let out = coord.join(&b, RoomKind::Document, "r1", "bob");
        match &received(&out, &b)[0] {
            ServerEvent::DocInit(init) => {
                let ids: Vec<_> = init.clients.iter().map(|c| c.socket_id.clone()).collect();
                assert_eq!(ids, vec![a.clone(), b.clone()]);
            }
            other => panic!("unexpected event {:?}", other),
        }
        let to_a = received(&out, &a);
        assert!(matches!(to_a.as_slice(), [ServerEvent::DocJoined(_)]));

        let out = coord.apply_code_change(&a, "r1", json!("x = 1"));
        assert_eq!(
            received(&out, &b),
            vec![ServerEvent::CodeChange(CodeMessage { code: json!("x = 1") })]
        );
        let out = coord.apply_document_change(&b, "r1", Delta::new(vec![json!("y")]));
        assert_eq!(received(&out, &a).len(), 1);

        // Both views of the same key are still one held room
        coord.join(&a, RoomKind::Document, "r1", "alice");
        coord.join(&b, RoomKind::Code, "r1", "bob");
        assert_eq!(coord.stats().shared_rooms, 1);

        let out = coord.disconnect(&a);
        let to_b = received(&out, &b);
        assert_eq!(
            to_b,
            vec![
                ServerEvent::DocCursorRemoved(a.clone()),
                ServerEvent::Disconnected(DisconnectedMessage {
                    socket_id: a.clone(),
                    username: Some("alice".to_string()),
                }),
            ]
        );
        assert_eq!(member_ids(&coord, &RoomId::shared("r1")), vec![b]);
    }

    #[test]
    fn cursor_update_is_stamped_with_sender() {
        let coord = coordinator();
        let a = connected(&coord, "a");
        let b = connected(&coord, "b");
        coord.join(&a, RoomKind::Document, "r1", "alice");
        coord.join(&b, RoomKind::Document, "r1", "bob");

        let out = coord.move_cursor(&a, "r1", json!({"index": 3, "length": 0}));
        assert_eq!(
            received(&out, &b),
            vec![ServerEvent::DocCursorUpdate(CursorUpdateMessage {
                socket_id: a.clone(),
                username: Some("alice".to_string()),
                range: json!({"index": 3, "length": 0}),
            })]
        );
        assert!(received(&out, &a).is_empty());
    }

    #[test]
    fn sync_code_targets_one_connection() {
        let coord = coordinator();
        let a = connected(&coord, "a");
        let b = ConnectionId::from("b");
        let out = coord.sync_code(&a, b.clone(), json!("let x = 1;"));
        assert_eq!(
            out,
            vec![Dispatch::to_one(
                b,
                ServerEvent::CodeChange(CodeMessage { code: json!("let x = 1;") })
            )]
        );
    }

    #[test]
    fn voice_join_lists_existing_participants() {
        let coord = coordinator();
        let a = connected(&coord, "a");
        let b = connected(&coord, "b");
        coord.join(&a, RoomKind::Voice, "r1", "alice");

        let out = coord.join(&b, RoomKind::Voice, "r1", "bob");
        assert_eq!(
            received(&out, &b),
            vec![ServerEvent::VoiceParticipants(vec![VoiceParticipant {
                id: a.clone(),
                name: "alice".to_string(),
            }])]
        );
        assert_eq!(
            received(&out, &a),
            vec![ServerEvent::VoiceUserJoined(VoiceUserMessage {
                user_id: b,
                username: Some("bob".to_string()),
            })]
        );
    }

    #[test]
    fn signal_reaches_target_even_without_shared_room() {
        let coord = coordinator();
        let a = connected(&coord, "a");
        let b = connected(&coord, "b");
        let out = coord.relay_signal(&a, SignalKind::Offer, b.clone(), json!({"sdp": "v=0"}));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].recipients, vec![b]);
    }

    #[test]
    fn disconnect_cleans_every_room_kind_once() {
        let coord = coordinator();
        let a = connected(&coord, "a");
        let b = connected(&coord, "b");
        for (kind, key) in [(RoomKind::Code, "r1"), (RoomKind::Document, "r2"), (RoomKind::Voice, "r3")] {
            coord.join(&a, kind, key, "alice");
            coord.join(&b, kind, key, "bob");
        }

        let out = coord.disconnect(&a);
        let to_b = received(&out, &b);
        let disconnects = to_b
            .iter()
            .filter(|e| matches!(e, ServerEvent::Disconnected(_)))
            .count();
        let voice_left = to_b
            .iter()
            .filter(|e| matches!(e, ServerEvent::VoiceUserLeft(_)))
            .count();
        assert_eq!(disconnects, 3);
        assert_eq!(voice_left, 1);
        assert!(received(&out, &a).is_empty());

        for room in [RoomId::shared("r1"), RoomId::shared("r2"), RoomId::voice("r3")] {
            assert_eq!(member_ids(&coord, &room), vec![b.clone()]);
        }
        assert!(!coord.is_connected(&a));

        assert!(coord.disconnect(&a).is_empty());
    }

    #[test]
    fn disconnect_keeps_document_log_for_rejoin() {
        let coord = coordinator();
        let a = connected(&coord, "a");
        coord.join(&a, RoomKind::Document, "r1", "alice");
        coord.apply_document_change(&a, "r1", Delta::new(vec![json!("x")]));
        coord.disconnect(&a);

        assert_eq!(coord.stats().shared_rooms, 0);
        let b = connected(&coord, "b");
        let out = coord.join(&b, RoomKind::Document, "r1", "bob");
        match &out[0].event {
            ServerEvent::DocInit(init) => assert_eq!(init.document.ops, vec![json!("x")]),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn leave_then_disconnect_does_not_notify_twice() {
        let coord = coordinator();
        let a = connected(&coord, "a");
        let b = connected(&coord, "b");
        coord.join(&a, RoomKind::Voice, "r1", "alice");
        coord.join(&b, RoomKind::Voice, "r1", "bob");

        let out = coord.leave(&a, RoomKind::Voice, "r1");
        assert_eq!(
            received(&out, &b),
            vec![ServerEvent::VoiceUserLeft(VoiceUserMessage {
                user_id: a.clone(),
                username: Some("alice".to_string()),
            })]
        );
        assert!(coord.leave(&a, RoomKind::Voice, "r1").is_empty());
        assert!(coord.disconnect(&a).is_empty());
    }

    #[test]
    fn events_from_disconnected_connection_are_ignored() {
        let coord = coordinator();
        let a = connected(&coord, "a");
        let b = connected(&coord, "b");
        coord.join(&b, RoomKind::Document, "r1", "bob");
        coord.disconnect(&a);

        assert!(coord.join(&a, RoomKind::Document, "r1", "alice").is_empty());
        assert!(coord
            .apply_document_change(&a, "r1", Delta::new(vec![json!("late")]))
            .is_empty());
        assert_eq!(member_ids(&coord, &RoomId::shared("r1")), vec![b]);
        assert_eq!(coord.document("r1"), Some(vec![]));
    }

    #[test]
    fn membership_tracks_joins_and_disconnects() {
        let coord = coordinator();
        let room = RoomId::shared("r1");
        let ids: Vec<ConnectionId> = ["a", "b", "c", "d"]
            .iter()
            .map(|n| connected(&coord, n))
            .collect();
        for id in &ids {
            coord.join(id, RoomKind::Code, "r1", id.as_str());
        }
        // Rejoining is a no-op for membership
        coord.join(&ids[0], RoomKind::Code, "r1", "a");
        coord.disconnect(&ids[1]);
        coord.leave(&ids[3], RoomKind::Code, "r1");

        assert_eq!(member_ids(&coord, &room), vec![ids[0].clone(), ids[2].clone()]);
        coord.disconnect(&ids[0]);
        coord.disconnect(&ids[2]);
        assert_eq!(coord.stats().shared_rooms, 0);
    }

    #[test]
    fn concurrent_changes_are_all_appended() {
        let coord = Arc::new(coordinator());
        let writers: Vec<ConnectionId> = (0..8).map(|i| connected(&coord, &format!("w{}", i))).collect();

        let handles: Vec<_> = writers
            .into_iter()
            .map(|writer| {
                let coord = coord.clone();
                std::thread::spawn(move || {
                    for n in 0..50 {
                        coord.apply_document_change(
                            &writer,
                            "r1",
                            Delta::new(vec![json!([writer.as_str(), n])]),
                        );
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let log = coord.document("r1").unwrap();
        assert_eq!(log.len(), 400);
        // Per-writer order survives interleaving
        for i in 0..8 {
            let name = format!("w{}", i);
            let seq: Vec<i64> = log
                .iter()
                .filter(|op| op[0] == json!(name))
                .map(|op| op[1].as_i64().unwrap())
                .collect();
            assert_eq!(seq, (0..50).collect::<Vec<_>>());
        }
    }
}
