pub mod handler;
pub mod hub;
pub mod msg_edit_handler;
pub mod msg_ping_handler;
pub mod msg_room_handler;

pub use handler::websocket_handler;
pub use hub::ConnectionHub;
