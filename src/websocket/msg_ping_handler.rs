use chrono::Utc;
use tracing::debug;

use crate::models::{PongMessage, ServerEvent};
use crate::session::{ConnectionId, Dispatch};

/// Answer a keepalive ping to the sender only
pub fn handle_ping_message(conn: &ConnectionId) -> Vec<Dispatch> {
    debug!("Ping received from {}", conn);
    let pong = ServerEvent::Pong(PongMessage {
        date: Utc::now().to_rfc3339(),
    });
    vec![Dispatch::to_one(conn.clone(), pong)]
}
