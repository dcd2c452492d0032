//! Events pushed from the engine to connected clients.

use super::value_object::{ChatKind, ConnectionId, MessageText, SessionId, SignalPayload};

/// Why a session ended, as seen by the remaining member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The partner asked to leave (or re-joined the waiting room)
    Left,
    /// The partner's connection went away
    Disconnect,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::Left => "left",
            EndReason::Disconnect => "disconnect",
        }
    }
}

/// Outbound event addressed to one or more connections
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    /// Tells a freshly accepted client its own connection id
    Connected { connection_id: ConnectionId },
    /// No partner was available; the requester is queued
    Waiting,
    /// A pair was formed; sent to both members with the same session id
    ChatStarted { session_id: SessionId, kind: ChatKind },
    /// The session ended; sent to the remaining member only
    ChatEnded { reason: EndReason },
    /// Chat text relayed to both members
    NewMessage {
        sender: ConnectionId,
        text: MessageText,
    },
    /// Signaling payload relayed to the other member only
    Signal {
        sender: ConnectionId,
        payload: SignalPayload,
    },
}
