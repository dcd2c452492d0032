//! UseCase: 接続切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 切断時の片付け（待機キュー、ペア、送信キュー）
//!
//! ### なぜこのテストが必要か
//! - ペア中の切断では相手にちょうど一度 chat_ended(disconnect) が届く
//! - 切断後、そのセッションへのメッセージは届かない
//! - Idle のまま切断しても何も起こらない
//!
//! ### どのような状況を想定しているか
//! - 正常系：ペア中の切断、待機中の切断
//! - エッジケース：Idle の切断、二重の切断
//! - 並行性：同じ接続の join / メッセージ / シグナルと切断の競合

use std::sync::Arc;

use crate::domain::{ConnectionId, EndedSession, MatchmakingRepository, MessagePusher};

use super::notify::notify_session_ended;

/// 接続切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn MatchmakingRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(
        repository: Arc<dyn MatchmakingRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 接続切断を実行
    ///
    /// どの状態から呼ばれても安全。
    ///
    /// # Returns
    ///
    /// * `Some(EndedSession)` - ペア中だったため、そのセッションを終了した
    /// * `None` - 待機中または Idle だった
    pub async fn execute(&self, connection_id: ConnectionId) -> Option<EndedSession> {
        // 1. 待機キュー・ペアから削除
        let ended = self.repository.remove_connection(&connection_id).await;

        // 2. MessagePusher からクライアントを登録解除
        self.message_pusher.unregister_client(&connection_id).await;

        // 3. 相手に通知
        if let Some(ended) = &ended {
            notify_session_ended(self.message_pusher.as_ref(), ended).await;
        }

        ended
    }
}
