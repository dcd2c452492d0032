//! UseCase: チャットメッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - メッセージの無害化（長さ制限 → エスケープ）と配信先
//!
//! ### なぜこのテストが必要か
//! - 送信者自身にも同じ new_message が返ることで、表示順がサーバー基準になる
//! - 空メッセージや他人のセッションへの送信は黙って捨てられる
//!
//! ### どのような状況を想定しているか
//! - 正常系：ペア内での送信
//! - 異常系：空メッセージ、非メンバーからの送信
//! - エッジケース：長すぎるメッセージ、HTML を含むメッセージ

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MatchmakingRepository, MessagePusher, MessageText, OutboundEvent, RelayScope,
    SessionId,
};

/// チャットメッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn MatchmakingRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// メッセージの最大文字数（Unicode スカラー値単位）
    max_message_chars: usize,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        repository: Arc<dyn MatchmakingRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        max_message_chars: usize,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            max_message_chars,
        }
    }

    /// メッセージ送信を実行
    ///
    /// # Returns
    ///
    /// * `Some(Vec<ConnectionId>)` - 配信先（送信者を含むペアの両者）
    /// * `None` - 無効なリクエストとして捨てた
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        session_id: SessionId,
        raw: &str,
    ) -> Option<Vec<ConnectionId>> {
        let text = match MessageText::sanitize(raw, self.max_message_chars) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!("Dropping message from '{}': {}", connection_id, e);
                return None;
            }
        };

        let event = OutboundEvent::NewMessage {
            sender: connection_id.clone(),
            text,
        };
        // 検索と投入を一度に行い、終了済みのセッションには届けない
        let delivered = self
            .repository
            .relay_in_session(
                &connection_id,
                &session_id,
                RelayScope::BothMembers,
                &event,
                self.message_pusher.as_ref(),
            )
            .await;
        if delivered.is_none() {
            tracing::debug!(
                "Dropping message from '{}' for session {} it is not part of",
                connection_id,
                session_id
            );
        }
        delivered
    }
}
