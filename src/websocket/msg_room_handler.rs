use crate::models::{JoinMessage, LeaveMessage};
use crate::session::{ConnectionId, Dispatch, RoomKind, SessionCoordinator};

/// Handle `join`, `doc-join` and `voice-join`
pub fn handle_join_message(
    coordinator: &SessionCoordinator,
    conn: &ConnectionId,
    kind: RoomKind,
    msg: JoinMessage,
) -> Vec<Dispatch> {
    coordinator.join(conn, kind, &msg.room_id, &msg.username)
}

/// Handle `leave`, `doc-leave` and `voice-leave`
pub fn handle_leave_message(
    coordinator: &SessionCoordinator,
    conn: &ConnectionId,
    kind: RoomKind,
    msg: LeaveMessage,
) -> Vec<Dispatch> {
    coordinator.leave(conn, kind, &msg.room_id)
}
