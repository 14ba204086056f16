use crate::models::{CodeChangeMessage, CursorMoveMessage, DocChangeMessage, SyncCodeMessage};
use crate::session::{ConnectionId, Dispatch, SessionCoordinator};

pub fn handle_code_change(
    coordinator: &SessionCoordinator,
    conn: &ConnectionId,
    msg: CodeChangeMessage,
) -> Vec<Dispatch> {
    coordinator.apply_code_change(conn, &msg.room_id, msg.code)
}

pub fn handle_sync_code(
    coordinator: &SessionCoordinator,
    conn: &ConnectionId,
    msg: SyncCodeMessage,
) -> Vec<Dispatch> {
    coordinator.sync_code(conn, msg.socket_id, msg.code)
}

pub fn handle_doc_change(
    coordinator: &SessionCoordinator,
    conn: &ConnectionId,
    msg: DocChangeMessage,
) -> Vec<Dispatch> {
    coordinator.apply_document_change(conn, &msg.room_id, msg.delta)
}

pub fn handle_cursor_move(
    coordinator: &SessionCoordinator,
    conn: &ConnectionId,
    msg: CursorMoveMessage,
) -> Vec<Dispatch> {
    coordinator.move_cursor(conn, &msg.room_id, msg.range)
}
