//! WebSocket event DTOs.
//!
//! Every frame is a JSON object `{"event": "<name>", "data": {...}}`.
//! Request fields are optional on the wire; missing ones are rejected during
//! conversion to domain types, not during parsing.

use serde::{Deserialize, Serialize};

/// Events sent by clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    JoinWaitingRoom(JoinWaitingRoomRequest),
    LeaveChat(LeaveChatRequest),
    SendMessage(SendMessageRequest),
    WebrtcSignal(SignalRequest),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JoinWaitingRoomRequest {
    /// "text" or "video"
    #[serde(rename = "type")]
    pub chat_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeaveChatRequest {
    pub room: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub room: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalRequest {
    pub room: Option<String>,
    /// Opaque to the server
    #[serde(default)]
    pub signal: serde_json::Value,
}

/// Events sent by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerMessage {
    Connected {
        sid: String,
    },
    Waiting {},
    ChatStarted {
        room: String,
        #[serde(rename = "type")]
        chat_type: String,
    },
    ChatEnded {
        reason: String,
    },
    NewMessage {
        sender: String,
        message: String,
    },
    WebrtcSignal {
        sender: String,
        signal: serde_json::Value,
    },
}
