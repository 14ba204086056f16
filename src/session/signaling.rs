use serde_json::Value;
use tracing::debug;

use super::coordinator::Dispatch;
use super::room::ConnectionId;
use crate::models::{AnswerMessage, IceCandidateMessage, OfferMessage, ServerEvent};

/// The three peer-to-peer call setup payloads
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

/// Point-to-point relay for call setup. Holds no state and checks neither
/// room membership nor whether the target is still connected: a frame for
/// a vanished peer is dropped at delivery.
pub struct SignalingRelay;

impl SignalingRelay {
    pub fn forward(
        kind: SignalKind,
        sender: &ConnectionId,
        target: ConnectionId,
        payload: Value,
    ) -> Dispatch {
        debug!("Relaying {:?} from {} to {}", kind, sender, target);
        let peer_id = sender.clone();
        let event = match kind {
            SignalKind::Offer => ServerEvent::VoiceOffer(OfferMessage {
                offer: payload,
                peer_id,
            }),
            SignalKind::Answer => ServerEvent::VoiceAnswer(AnswerMessage {
                answer: payload,
                peer_id,
            }),
            SignalKind::IceCandidate => ServerEvent::IceCandidate(IceCandidateMessage {
                candidate: payload,
                peer_id,
            }),
        };
        Dispatch::to_one(target, event)
    }
}
