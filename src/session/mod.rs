//! Room coordination: who is connected, which rooms they are in, the
//! document logs, and the fan-out that follows every change.

pub mod coordinator;
pub mod docstore;
pub mod membership;
pub mod registry;
pub mod room;
pub mod signaling;

pub use coordinator::{Dispatch, SessionCoordinator};
pub use docstore::DocumentStore;
pub use room::{ConnectionId, RoomId, RoomKind};
pub use signaling::SignalKind;
