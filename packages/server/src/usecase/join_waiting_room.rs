//! UseCase: 待機キュー参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinWaitingRoomUseCase::execute() メソッド
//! - 待機 / マッチング時の通知先と内容
//!
//! ### なぜこのテストが必要か
//! - マッチングが成立した両者には同じ session id が届かなければならない
//! - 待機通知は本人だけに届く
//! - ペア中の再 join では旧パートナーに終了通知が届く
//!
//! ### どのような状況を想定しているか
//! - 正常系：待機、マッチング
//! - エッジケース：種別の切り替え、ペア中の再 join、切断後に届いた join

use std::sync::Arc;

use crate::domain::{
    ChatKind, ConnectionId, JoinOutcome, JoinResult, MatchmakingRepository, MessagePusher,
    OutboundEvent,
};

use super::notify::notify_session_ended;

/// 待機キュー参加のユースケース
pub struct JoinWaitingRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn MatchmakingRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl JoinWaitingRoomUseCase {
    /// 新しい JoinWaitingRoomUseCase を作成
    pub fn new(
        repository: Arc<dyn MatchmakingRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 待機キューへの参加を実行
    ///
    /// 種別の検証は呼び出し側（UI 層の DTO 変換）で済んでいる前提。
    ///
    /// # Returns
    ///
    /// * `Some(JoinOutcome)` - 待機になったか、誰とペアになったか
    /// * `None` - 既に切断された接続として無視した
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        kind: ChatKind,
    ) -> Option<JoinOutcome> {
        let Some(JoinResult { ended, outcome }) = self
            .repository
            .join_waiting_room(connection_id.clone(), kind)
            .await
        else {
            tracing::debug!(
                "Ignoring {} join from disconnected '{}'",
                kind,
                connection_id
            );
            return None;
        };
        tracing::info!("'{}' joined the {} waiting room", connection_id, kind);

        if let Some(ended) = &ended {
            notify_session_ended(self.message_pusher.as_ref(), ended).await;
        }

        match &outcome {
            JoinOutcome::Waiting => {
                if let Err(e) = self
                    .message_pusher
                    .push_to(&connection_id, &OutboundEvent::Waiting)
                    .await
                {
                    tracing::warn!("Failed to tell '{}' it is waiting: {}", connection_id, e);
                }
            }
            JoinOutcome::Paired(pair) => {
                let [a, b] = &pair.members;
                tracing::info!(
                    "Pair created in session {} ({}): '{}' and '{}'",
                    pair.session_id,
                    pair.kind,
                    a,
                    b
                );
                let event = OutboundEvent::ChatStarted {
                    session_id: pair.session_id.clone(),
                    kind: pair.kind,
                };
                if let Err(e) = self
                    .message_pusher
                    .broadcast(pair.member_ids(), &event)
                    .await
                {
                    tracing::warn!("Failed to announce session {}: {}", pair.session_id, e);
                }
            }
        }

        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::ConnectionState,
        infrastructure::dto::websocket::ServerMessage,
        usecase::{
            DisconnectParticipantUseCase,
            test_support::{
                assert_no_event, conn, connect, create_test_message_pusher,
                create_test_repository, next_event,
            },
        },
    };

    #[tokio::test]
    async fn test_join_without_peer_waits() {
        // テスト項目: 待機者がいなければ本人にだけ waiting が届く
        // given (前提条件):
        let repository = create_test_repository();
        let message_pusher = create_test_message_pusher();
        let mut alice_rx = connect(&repository, &message_pusher, "alice").await;
        let usecase = JoinWaitingRoomUseCase::new(repository.clone(), message_pusher);

        // when (操作):
        let outcome = usecase.execute(conn("alice"), ChatKind::Text).await;

        // then (期待する結果):
        assert_eq!(outcome, Some(JoinOutcome::Waiting));
        assert_eq!(next_event(&mut alice_rx), ServerMessage::Waiting {});
        assert_no_event(&mut alice_rx);
    }

    #[tokio::test]
    async fn test_join_with_peer_notifies_both_with_same_session() {
        // テスト項目: マッチング成立時、両者に同じ session id の chat_started が届く
        // given (前提条件):
        let repository = create_test_repository();
        let message_pusher = create_test_message_pusher();
        let mut alice_rx = connect(&repository, &message_pusher, "alice").await;
        let mut bob_rx = connect(&repository, &message_pusher, "bob").await;
        let usecase = JoinWaitingRoomUseCase::new(repository.clone(), message_pusher);
        usecase.execute(conn("alice"), ChatKind::Video).await;
        next_event(&mut alice_rx);

        // when (操作):
        let outcome = usecase.execute(conn("bob"), ChatKind::Video).await;

        // then (期待する結果):
        let Some(JoinOutcome::Paired(pair)) = outcome else {
            panic!("expected a pair");
        };
        let expected = ServerMessage::ChatStarted {
            room: pair.session_id.as_str().to_string(),
            chat_type: "video".to_string(),
        };
        assert_eq!(next_event(&mut alice_rx), expected);
        assert_eq!(next_event(&mut bob_rx), expected);
        assert_no_event(&mut bob_rx);
    }

    #[tokio::test]
    async fn test_kind_switch_leaves_single_queue_entry() {
        // テスト項目: text で待機中に video で join すると video キューだけに残る
        // given (前提条件):
        let repository = create_test_repository();
        let message_pusher = create_test_message_pusher();
        let _alice_rx = connect(&repository, &message_pusher, "alice").await;
        let usecase = JoinWaitingRoomUseCase::new(repository.clone(), message_pusher);
        usecase.execute(conn("alice"), ChatKind::Text).await;

        // when (操作):
        usecase.execute(conn("alice"), ChatKind::Video).await;

        // then (期待する結果):
        let snapshot = repository.snapshot().await;
        assert_eq!(snapshot.waiting_text, 0);
        assert_eq!(snapshot.waiting_video, 1);
        assert_eq!(
            repository.connection_state(&conn("alice")).await,
            ConnectionState::Waiting(ChatKind::Video)
        );
    }

    #[tokio::test]
    async fn test_rejoin_while_paired_notifies_old_partner() {
        // テスト項目: ペア中の再 join で旧パートナーに chat_ended(left) が届き、本人は待機になる
        // given (前提条件):
        let repository = create_test_repository();
        let message_pusher = create_test_message_pusher();
        let mut alice_rx = connect(&repository, &message_pusher, "alice").await;
        let mut bob_rx = connect(&repository, &message_pusher, "bob").await;
        let usecase = JoinWaitingRoomUseCase::new(repository.clone(), message_pusher);
        usecase.execute(conn("alice"), ChatKind::Text).await;
        usecase.execute(conn("bob"), ChatKind::Text).await;
        next_event(&mut alice_rx); // waiting
        next_event(&mut alice_rx); // chat_started
        next_event(&mut bob_rx); // chat_started

        // when (操作):
        let outcome = usecase.execute(conn("bob"), ChatKind::Text).await;

        // then (期待する結果):
        assert_eq!(outcome, Some(JoinOutcome::Waiting));
        assert_eq!(
            next_event(&mut alice_rx),
            ServerMessage::ChatEnded {
                reason: "left".to_string()
            }
        );
        assert_eq!(next_event(&mut bob_rx), ServerMessage::Waiting {});
        assert_eq!(
            repository.connection_state(&conn("alice")).await,
            ConnectionState::Idle
        );
    }

    #[tokio::test]
    async fn test_join_after_disconnect_does_not_queue_ghost() {
        // テスト項目: 切断処理の後に届いた join は無視され、次の参加者はその接続とペアにならない
        // given (前提条件):
        let repository = create_test_repository();
        let message_pusher = create_test_message_pusher();
        let _ghost_rx = connect(&repository, &message_pusher, "ghost").await;
        let mut bob_rx = connect(&repository, &message_pusher, "bob").await;
        let usecase = JoinWaitingRoomUseCase::new(repository.clone(), message_pusher.clone());
        let disconnect =
            DisconnectParticipantUseCase::new(repository.clone(), message_pusher.clone());
        disconnect.execute(conn("ghost")).await;

        // when (操作):
        let late = usecase.execute(conn("ghost"), ChatKind::Text).await;
        let next = usecase.execute(conn("bob"), ChatKind::Text).await;

        // then (期待する結果):
        assert_eq!(late, None);
        assert_eq!(next, Some(JoinOutcome::Waiting));
        assert_eq!(next_event(&mut bob_rx), ServerMessage::Waiting {});
        assert_no_event(&mut bob_rx);
        assert_eq!(repository.snapshot().await.waiting_text, 1);
    }
}
