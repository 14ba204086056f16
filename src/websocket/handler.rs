use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tracing::{debug, error, info};

use crate::models::ClientEvent;
use crate::session::{ConnectionId, Dispatch, RoomKind, SignalKind};
use crate::utils::scope_guard::ScopeGuard;
use crate::websocket::msg_edit_handler::{
    handle_code_change, handle_cursor_move, handle_doc_change, handle_sync_code,
};
use crate::websocket::msg_ping_handler::handle_ping_message;
use crate::websocket::msg_room_handler::{handle_join_message, handle_leave_message};
use crate::AppState;

/// WebSocket handler
pub async fn websocket_handler(ws: WebSocketUpgrade, State(app_state): State<AppState>) -> Response {
    info!("New WebSocket connection attempt");
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

/// Handle WebSocket connection
async fn handle_socket(socket: WebSocket, app_state: AppState) {
    let connection_id = ConnectionId::generate();
    let mut outbound = app_state.hub.register(&connection_id);
    app_state.coordinator.connect(&connection_id);
    info!("WebSocket connection established with connection_id: {}", connection_id);

    // However this task ends, the rooms hear about it once
    let _cleanup = {
        let app_state = app_state.clone();
        let connection_id = connection_id.clone();
        ScopeGuard::new(move || {
            app_state.hub.unregister(&connection_id);
            let dispatches = app_state.coordinator.disconnect(&connection_id);
            app_state.hub.deliver(dispatches);
        })
    };

    let (mut sender, mut receiver) = socket.split();

    // Drain the hub queue into the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            if sender.send(Message::Text(frame)).await.is_err() {
                break;
            }
        }
    });

    let recv_state = app_state.clone();
    let recv_id = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => handle_text_message(&recv_state, &recv_id, &text),
                Message::Close(_) => break,
                // Binary and control frames carry nothing for us
                _ => continue,
            }
        }
    });

    // Wait for either task to finish (and finish the other)
    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };
    info!("WebSocket connection {} terminated", connection_id);
}

/// Parse one text frame, run it and deliver whatever it produced.
/// A frame that does not parse is logged and dropped; the socket stays open.
pub fn handle_text_message(app_state: &AppState, conn: &ConnectionId, text: &str) {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            error!("Failed to parse message from {}: {}", conn, e);
            return;
        }
    };
    debug!("Received message from {}: {:?}", conn, event);
    let dispatches = dispatch_event(app_state, conn, event);
    app_state.hub.deliver(dispatches);
}

fn dispatch_event(app_state: &AppState, conn: &ConnectionId, event: ClientEvent) -> Vec<Dispatch> {
    let coordinator = app_state.coordinator.as_ref();
    match event {
        ClientEvent::Join(msg) => handle_join_message(coordinator, conn, RoomKind::Code, msg),
        ClientEvent::Leave(msg) => handle_leave_message(coordinator, conn, RoomKind::Code, msg),
        ClientEvent::CodeChange(msg) => handle_code_change(coordinator, conn, msg),
        ClientEvent::SyncCode(msg) => handle_sync_code(coordinator, conn, msg),
        ClientEvent::DocJoin(msg) => handle_join_message(coordinator, conn, RoomKind::Document, msg),
        ClientEvent::DocLeave(msg) => handle_leave_message(coordinator, conn, RoomKind::Document, msg),
        ClientEvent::DocChange(msg) => handle_doc_change(coordinator, conn, msg),
        ClientEvent::DocCursorMove(msg) => handle_cursor_move(coordinator, conn, msg),
        ClientEvent::VoiceJoin(msg) => handle_join_message(coordinator, conn, RoomKind::Voice, msg),
        ClientEvent::VoiceLeave(msg) => handle_leave_message(coordinator, conn, RoomKind::Voice, msg),
        ClientEvent::VoiceOffer(msg) => {
            coordinator.relay_signal(conn, SignalKind::Offer, msg.peer_id, msg.offer)
        }
        ClientEvent::VoiceAnswer(msg) => {
            coordinator.relay_signal(conn, SignalKind::Answer, msg.peer_id, msg.answer)
        }
        ClientEvent::IceCandidate(msg) => {
            coordinator.relay_signal(conn, SignalKind::IceCandidate, msg.peer_id, msg.candidate)
        }
        ClientEvent::Ping => handle_ping_message(conn),
    }
}
