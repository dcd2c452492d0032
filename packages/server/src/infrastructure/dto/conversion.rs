//! Conversion logic between DTOs and domain types.

use crate::domain::{
    ChatKind, OutboundEvent, SessionId, SignalPayload, ValueObjectError,
    matchmaker::MatchmakingSnapshot,
};
use crate::infrastructure::dto::{http, websocket as dto};
use crate::usecase::MatchmakingStats;

use pairchat_shared::time::timestamp_to_rfc3339;

// ========================================
// DTO → Domain
// ========================================

impl TryFrom<&dto::JoinWaitingRoomRequest> for ChatKind {
    type Error = ValueObjectError;

    fn try_from(request: &dto::JoinWaitingRoomRequest) -> Result<Self, Self::Error> {
        ChatKind::try_from(request.chat_type.as_deref().unwrap_or_default())
    }
}

/// Parse the `room` field every session-scoped request carries
pub fn parse_room(room: Option<String>) -> Result<SessionId, ValueObjectError> {
    SessionId::new(room.unwrap_or_default())
}

impl TryFrom<dto::SignalRequest> for (SessionId, SignalPayload) {
    type Error = ValueObjectError;

    fn try_from(request: dto::SignalRequest) -> Result<Self, Self::Error> {
        Ok((parse_room(request.room)?, SignalPayload::new(request.signal)?))
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&OutboundEvent> for dto::ServerMessage {
    fn from(event: &OutboundEvent) -> Self {
        match event {
            OutboundEvent::Connected { connection_id } => Self::Connected {
                sid: connection_id.as_str().to_string(),
            },
            OutboundEvent::Waiting => Self::Waiting {},
            OutboundEvent::ChatStarted { session_id, kind } => Self::ChatStarted {
                room: session_id.as_str().to_string(),
                chat_type: kind.as_str().to_string(),
            },
            OutboundEvent::ChatEnded { reason } => Self::ChatEnded {
                reason: reason.as_str().to_string(),
            },
            OutboundEvent::NewMessage { sender, text } => Self::NewMessage {
                sender: sender.as_str().to_string(),
                message: text.as_str().to_string(),
            },
            OutboundEvent::Signal { sender, payload } => Self::WebrtcSignal {
                sender: sender.as_str().to_string(),
                signal: payload.as_value().clone(),
            },
        }
    }
}

impl From<MatchmakingStats> for http::StatsDto {
    fn from(stats: MatchmakingStats) -> Self {
        let MatchmakingSnapshot {
            waiting_text,
            waiting_video,
            active_sessions,
        } = stats.snapshot;
        Self {
            connected_clients: stats.connected_clients,
            waiting: http::WaitingDto {
                text: waiting_text,
                video: waiting_video,
            },
            active_sessions,
            generated_at: timestamp_to_rfc3339(stats.generated_at.value()),
        }
    }
}
