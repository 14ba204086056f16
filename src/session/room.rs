use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Prefix of the voice namespace as clients and logs know it
pub const VOICE_PREFIX: &str = "voice-";

/// Transport-assigned identity of one socket
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Allocate a fresh random id for a new socket
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ConnectionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ConnectionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which event family a frame belongs to. Decides the payloads a join,
/// leave or change fans out, not which member set it touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoomKind {
    Code,
    Document,
    Voice,
}

impl RoomKind {
    /// Member set this family uses for `key`. Code and document frames
    /// address the same room.
    pub fn room(self, key: impl Into<String>) -> RoomId {
        match self {
            RoomKind::Code | RoomKind::Document => RoomId::shared(key),
            RoomKind::Voice => RoomId::voice(key),
        }
    }
}

/// Key namespace of a member set
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RoomSpace {
    /// Code editing and document editing of one room key
    Shared,
    Voice,
}

/// Room identity: a namespace tag plus the base key the client chose.
///
/// The voice prefix is only applied when rendering the id, so a room
/// literally named `voice-x` can never collide with the voice room of `x`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId {
    pub space: RoomSpace,
    pub key: String,
}

impl RoomId {
    pub fn shared(key: impl Into<String>) -> Self {
        Self {
            space: RoomSpace::Shared,
            key: key.into(),
        }
    }

    pub fn voice(key: impl Into<String>) -> Self {
        Self {
            space: RoomSpace::Voice,
            key: key.into(),
        }
    }

    pub fn is_voice(&self) -> bool {
        self.space == RoomSpace::Voice
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.space {
            RoomSpace::Shared => f.write_str(&self.key),
            RoomSpace::Voice => write!(f, "{}{}", VOICE_PREFIX, self.key),
        }
    }
}
