//! UseCase: WebRTC シグナリング中継処理
//!
//! シグナルの中身は解釈せず、同じセッションの相手にだけそのまま転送する。

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MatchmakingRepository, MessagePusher, OutboundEvent, RelayScope, SessionId,
    SignalPayload,
};

/// シグナリング中継のユースケース
pub struct RelaySignalUseCase {
    repository: Arc<dyn MatchmakingRepository>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelaySignalUseCase {
    pub fn new(
        repository: Arc<dyn MatchmakingRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// シグナルを相手に中継する
    ///
    /// # Returns
    ///
    /// * `Some(ConnectionId)` - 転送先の相手
    /// * `None` - 無効なリクエストとして捨てた
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        session_id: SessionId,
        payload: SignalPayload,
    ) -> Option<ConnectionId> {
        let event = OutboundEvent::Signal {
            sender: connection_id.clone(),
            payload,
        };
        let Some(mut targets) = self
            .repository
            .relay_in_session(
                &connection_id,
                &session_id,
                RelayScope::PartnerOnly,
                &event,
                self.message_pusher.as_ref(),
            )
            .await
        else {
            tracing::debug!(
                "Dropping signal from '{}' for session {} it is not part of",
                connection_id,
                session_id
            );
            return None;
        };

        targets.pop()
    }
}
