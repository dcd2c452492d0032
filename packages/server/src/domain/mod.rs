//! Domain layer: matchmaking state, value objects and the traits the
//! outer layers implement.

pub mod entity;
pub mod error;
pub mod event;
pub mod matchmaker;
pub mod message_pusher;
pub mod repository;
pub mod value_object;
pub mod waiting_pool;

pub use entity::Pair;
pub use error::{DomainError, MessagePushError, ValueObjectError};
pub use event::{EndReason, OutboundEvent};
pub use matchmaker::{
    ConnectionState, EndedSession, JoinOutcome, JoinResult, Matchmaker, MatchmakingSnapshot,
};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{MatchmakingRepository, RelayScope};
pub use value_object::{
    ChatKind, ConnectionId, DEFAULT_MAX_MESSAGE_CHARS, MessageText, SessionId, SignalPayload,
    Timestamp,
};
pub use waiting_pool::WaitingPool;
