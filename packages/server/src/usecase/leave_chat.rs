//! UseCase: セッション離脱処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveChatUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 離脱した本人には何も届かず、相手にだけ chat_ended(left) が届く
//! - 古い / 他人のセッションへの leave は黙って無視される
//!
//! ### どのような状況を想定しているか
//! - 正常系：メンバーによる離脱
//! - 異常系：終了済みセッション、非メンバーからの離脱

use std::sync::Arc;

use crate::domain::{ConnectionId, EndedSession, MatchmakingRepository, MessagePusher, SessionId};

use super::notify::notify_session_ended;

/// セッション離脱のユースケース
pub struct LeaveChatUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn MatchmakingRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveChatUseCase {
    /// 新しい LeaveChatUseCase を作成
    pub fn new(
        repository: Arc<dyn MatchmakingRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// セッション離脱を実行
    ///
    /// # Returns
    ///
    /// * `Some(EndedSession)` - セッションを終了した
    /// * `None` - 無効なリクエストとして無視した
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        session_id: SessionId,
    ) -> Option<EndedSession> {
        let Some(ended) = self
            .repository
            .leave_session(&connection_id, &session_id)
            .await
        else {
            tracing::debug!(
                "Ignoring leave from '{}' for session {} it is not part of",
                connection_id,
                session_id
            );
            return None;
        };

        tracing::info!("'{}' left session {}", connection_id, session_id);
        notify_session_ended(self.message_pusher.as_ref(), &ended).await;
        Some(ended)
    }
}
