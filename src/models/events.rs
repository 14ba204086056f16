use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::session::ConnectionId;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JoinMessage {
    pub room_id: String,
    pub username: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LeaveMessage {
    pub room_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodeChangeMessage {
    pub room_id: String,
    pub code: Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncCodeMessage {
    pub socket_id: ConnectionId,
    pub code: Value,
}

/// One batch of document edits. Anything besides `ops` rides along
/// untouched when the batch is rebroadcast.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Delta {
    #[serde(default)]
    pub ops: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Delta {
    pub fn new(ops: Vec<Value>) -> Self {
        Self {
            ops,
            extra: Map::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocChangeMessage {
    pub room_id: String,
    pub delta: Delta,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CursorMoveMessage {
    pub room_id: String,
    pub range: Value,
}

// Signaling frames have the same shape in both directions. Inbound `peerId`
// is the target; outbound it is the sender.

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OfferMessage {
    pub offer: Value,
    pub peer_id: ConnectionId,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerMessage {
    pub answer: Value,
    pub peer_id: ConnectionId,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidateMessage {
    pub candidate: Value,
    pub peer_id: ConnectionId,
}

/// Frames a client sends
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "join")]
    Join(JoinMessage),
    #[serde(rename = "leave")]
    Leave(LeaveMessage),
    #[serde(rename = "code-change")]
    CodeChange(CodeChangeMessage),
    #[serde(rename = "sync-code")]
    SyncCode(SyncCodeMessage),
    #[serde(rename = "doc-join")]
    DocJoin(JoinMessage),
    #[serde(rename = "doc-leave")]
    DocLeave(LeaveMessage),
    #[serde(rename = "doc-change")]
    DocChange(DocChangeMessage),
    #[serde(rename = "doc-cursor-move")]
    DocCursorMove(CursorMoveMessage),
    #[serde(rename = "voice-join")]
    VoiceJoin(JoinMessage),
    #[serde(rename = "voice-leave")]
    VoiceLeave(LeaveMessage),
    #[serde(rename = "voice-offer")]
    VoiceOffer(OfferMessage),
    #[serde(rename = "voice-answer")]
    VoiceAnswer(AnswerMessage),
    #[serde(rename = "ice-candidate")]
    IceCandidate(IceCandidateMessage),
    #[serde(rename = "ping")]
    Ping,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    #[schema(value_type = String)]
    pub socket_id: ConnectionId,
    pub username: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JoinedMessage {
    pub clients: Vec<ClientInfo>,
    pub username: String,
    pub socket_id: ConnectionId,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectedMessage {
    pub socket_id: ConnectionId,
    pub username: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CodeMessage {
    pub code: Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub ops: Vec<Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DocInitMessage {
    pub document: DocumentSnapshot,
    pub clients: Vec<ClientInfo>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CursorUpdateMessage {
    pub socket_id: ConnectionId,
    pub username: Option<String>,
    pub range: Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VoiceParticipant {
    pub id: ConnectionId,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VoiceUserMessage {
    pub user_id: ConnectionId,
    pub username: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PongMessage {
    pub date: String,
}

/// Frames the server sends
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "joined")]
    Joined(JoinedMessage),
    #[serde(rename = "disconnected")]
    Disconnected(DisconnectedMessage),
    #[serde(rename = "code-change")]
    CodeChange(CodeMessage),
    #[serde(rename = "doc-init")]
    DocInit(DocInitMessage),
    #[serde(rename = "doc-joined")]
    DocJoined(JoinedMessage),
    #[serde(rename = "doc-receive-changes")]
    DocReceiveChanges(Delta),
    #[serde(rename = "doc-cursor-update")]
    DocCursorUpdate(CursorUpdateMessage),
    #[serde(rename = "doc-cursor-removed")]
    DocCursorRemoved(ConnectionId),
    #[serde(rename = "voice-participants")]
    VoiceParticipants(Vec<VoiceParticipant>),
    #[serde(rename = "voice-user-joined")]
    VoiceUserJoined(VoiceUserMessage),
    #[serde(rename = "voice-user-left")]
    VoiceUserLeft(VoiceUserMessage),
    #[serde(rename = "voice-offer")]
    VoiceOffer(OfferMessage),
    #[serde(rename = "voice-answer")]
    VoiceAnswer(AnswerMessage),
    #[serde(rename = "ice-candidate")]
    IceCandidate(IceCandidateMessage),
    #[serde(rename = "pong")]
    Pong(PongMessage),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_doc_change_frame() {
        let frame = json!({
            "event": "doc-change",
            "data": {"roomId": "r1", "delta": {"ops": [{"insert": "hi"}]}}
        });
        let event: ClientEvent = serde_json::from_value(frame).unwrap();
        assert_eq!(
            event,
            ClientEvent::DocChange(DocChangeMessage {
                room_id: "r1".to_string(),
                delta: Delta::new(vec![json!({"insert": "hi"})]),
            })
        );
    }

    #[test]
    fn delta_keeps_unknown_fields() {
        let raw = json!({"ops": [1], "version": 7});
        let delta: Delta = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(delta.extra.get("version"), Some(&json!(7)));
        assert_eq!(serde_json::to_value(&delta).unwrap(), raw);
    }

    #[test]
    fn parses_signaling_target() {
        let frame = json!({
            "event": "ice-candidate",
            "data": {"candidate": {"sdpMid": "0"}, "peerId": "peer-b"}
        });
        match serde_json::from_value::<ClientEvent>(frame).unwrap() {
            ClientEvent::IceCandidate(msg) => assert_eq!(msg.peer_id.as_str(), "peer-b"),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn unknown_event_is_rejected() {
        let frame = json!({"event": "doc-save", "data": {}});
        assert!(serde_json::from_value::<ClientEvent>(frame).is_err());
    }

    #[test]
    fn cursor_removed_carries_bare_socket_id() {
        let event = ServerEvent::DocCursorRemoved(ConnectionId::from("a"));
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"event": "doc-cursor-removed", "data": "a"})
        );
    }

    #[test]
    fn doc_init_wire_shape() {
        let event = ServerEvent::DocInit(DocInitMessage {
            document: DocumentSnapshot { ops: vec![json!("x")] },
            clients: vec![ClientInfo {
                socket_id: ConnectionId::from("a"),
                username: Some("alice".to_string()),
            }],
        });
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "event": "doc-init",
                "data": {
                    "document": {"ops": ["x"]},
                    "clients": [{"socketId": "a", "username": "alice"}]
                }
            })
        );
    }
}
