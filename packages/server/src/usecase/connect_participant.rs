//! UseCase: 接続受付処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - 送信キュー・マッチング状態への登録と、接続 ID の通知
//!
//! ### なぜこのテストが必要か
//! - クライアントは `connected` イベントで自分の ID を知り、
//!   `new_message` の送信者が自分かどうかを判定する
//! - 同時接続数の上限を超えた接続は拒否されなければならない
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続
//! - 異常系：上限超過、登録失敗

use std::sync::Arc;

use crate::domain::{
    ConnectionId, MatchmakingRepository, MessagePushError, MessagePusher, OutboundEvent,
    PusherChannel,
};

use super::error::ConnectError;

/// 接続受付のユースケース
///
/// 接続直後のクライアントは Idle。切断されるまでの間だけ join できる。
pub struct ConnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn MatchmakingRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(
        repository: Arc<dyn MatchmakingRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 接続受付を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - トランスポート層が割り当てた接続 ID
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(())` - 接続成功
    /// * `Err(ConnectError)` - 接続拒否
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<(), ConnectError> {
        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await
            .map_err(|e| match e {
                MessagePushError::CapacityExceeded(limit) => ConnectError::CapacityExceeded(limit),
                MessagePushError::DuplicateClient(id) => ConnectError::DuplicateConnectionId(id),
                other => ConnectError::RegistrationFailed(other.to_string()),
            })?;

        if !self.repository.add_connection(connection_id.clone()).await {
            tracing::warn!("Connection '{}' was already tracked", connection_id);
        }

        let event = OutboundEvent::Connected {
            connection_id: connection_id.clone(),
        };
        if let Err(e) = self.message_pusher.push_to(&connection_id, &event).await {
            tracing::warn!("Failed to greet '{}': {}", connection_id, e);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ChatKind, ConnectionState, MatchmakingSnapshot, MockMessagePusher},
        infrastructure::dto::websocket::ServerMessage,
        usecase::test_support::{
            conn, create_test_message_pusher, create_test_repository, next_event,
        },
    };
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_connect_registers_and_greets() {
        // テスト項目: 接続すると送信キューが登録され、自分の接続 ID が通知される
        // given (前提条件):
        let repository = create_test_repository();
        let message_pusher = create_test_message_pusher();
        let usecase = ConnectParticipantUseCase::new(repository.clone(), message_pusher.clone());
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = usecase.execute(conn("alice"), tx).await;

        // then (期待する結果):
        assert_eq!(result, Ok(()));
        assert_eq!(message_pusher.count_clients().await, 1);
        // 接続済みなので join できる
        assert!(
            repository
                .join_waiting_room(conn("alice"), ChatKind::Text)
                .await
                .is_some()
        );
        assert_eq!(
            next_event(&mut rx),
            ServerMessage::Connected {
                sid: "alice".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_connect_capacity_exceeded() {
        // テスト項目: 上限超過で登録が拒否されると ConnectError になり、挨拶は送られない
        // given (前提条件):
        let mut message_pusher = MockMessagePusher::new();
        message_pusher
            .expect_register_client()
            .times(1)
            .returning(|_, _| Err(MessagePushError::CapacityExceeded(1000)));
        message_pusher.expect_push_to().never();
        let repository = create_test_repository();
        let usecase = ConnectParticipantUseCase::new(repository.clone(), Arc::new(message_pusher));
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = usecase.execute(conn("alice"), tx).await;

        // then (期待する結果):
        assert_eq!(result, Err(ConnectError::CapacityExceeded(1000)));
        // 拒否された接続は join できない
        assert_eq!(
            repository
                .join_waiting_room(conn("alice"), ChatKind::Text)
                .await,
            None
        );
        assert_eq!(repository.snapshot().await, MatchmakingSnapshot::default());
        assert_eq!(
            repository.connection_state(&conn("alice")).await,
            ConnectionState::Idle
        );
    }

    #[tokio::test]
    async fn test_connect_duplicate_id() {
        // テスト項目: 同じ接続 ID の二重登録は拒否される
        // given (前提条件):
        let message_pusher = create_test_message_pusher();
        let usecase =
            ConnectParticipantUseCase::new(create_test_repository(), message_pusher.clone());
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        usecase.execute(conn("alice"), tx1).await.unwrap();

        // when (操作):
        let result = usecase.execute(conn("alice"), tx2).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ConnectError::DuplicateConnectionId("alice".to_string()))
        );
        assert_eq!(message_pusher.count_clients().await, 1);
    }
}
