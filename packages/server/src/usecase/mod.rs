//! UseCase layer: one use case per inbound event.
//!
//! Every use case first applies its state transition through the
//! repository (one atomic step), then pushes the resulting events after the
//! repository lock is released.

mod connect_participant;
mod disconnect_participant;
mod error;
mod get_stats;
mod join_waiting_room;
mod leave_chat;
mod notify;
mod relay_signal;
mod send_message;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::ConnectError;
pub use get_stats::{GetMatchmakingStatsUseCase, MatchmakingStats};
pub use join_waiting_room::JoinWaitingRoomUseCase;
pub use leave_chat::LeaveChatUseCase;
pub use relay_signal::RelaySignalUseCase;
pub use send_message::SendMessageUseCase;

#[cfg(test)]
pub(crate) mod test_support;
