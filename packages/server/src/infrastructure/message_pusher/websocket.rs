//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を管理（同時接続数の上限もここで守る）
//! - ドメインイベントを JSON にエンコードし、送信キューへ投入（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、イベント送信に使用します。
//! 送信キューへの投入はブロックしないため、遅いクライアントが
//! 他の接続の処理を止めることはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, OutboundEvent, PusherChannel},
    infrastructure::dto::websocket::ServerMessage,
};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信キュー
    ///
    /// Key: ConnectionId
    /// Value: PusherChannel
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
    /// 同時接続数の上限
    max_clients: usize,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    ///
    /// # 引数
    ///
    /// - `clients`: 接続中のクライアントの sender マップ
    /// - `max_clients`: 同時接続数の上限
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>, max_clients: usize) -> Self {
        Self {
            clients,
            max_clients,
        }
    }

    fn encode(event: &OutboundEvent) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerMessage::from(event))
            .map_err(|e| MessagePushError::EncodeFailed(e.to_string()))
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<(), MessagePushError> {
        let mut clients = self.clients.lock().await;
        if clients.contains_key(&connection_id) {
            return Err(MessagePushError::DuplicateClient(
                connection_id.into_string(),
            ));
        }
        if clients.len() >= self.max_clients {
            return Err(MessagePushError::CapacityExceeded(self.max_clients));
        }
        tracing::debug!("Client '{}' registered to MessagePusher", connection_id);
        clients.insert(connection_id, sender);
        Ok(())
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!("Client '{}' unregistered from MessagePusher", connection_id);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(event)?;
        let clients = self.clients.lock().await;

        let Some(sender) = clients.get(connection_id) else {
            return Err(MessagePushError::ClientNotFound(
                connection_id.as_str().to_string(),
            ));
        };
        sender
            .send(content)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed event to client '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &OutboundEvent,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(event)?;
        let clients = self.clients.lock().await;

        for target in targets {
            if let Some(sender) = clients.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = sender.send(content.clone()) {
                    tracing::warn!("Failed to push event to client '{}': {}", target, e);
                } else {
                    tracing::debug!("Broadcasted event to client '{}'", target);
                }
            } else {
                tracing::warn!("Client '{}' not found during broadcast, skipping", target);
            }
        }

        Ok(())
    }

    async fn count_clients(&self) -> usize {
        self.clients.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChatKind, EndReason, SessionId};
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - WebSocketMessagePusher の登録とイベント送信
    // - push_to: 特定のクライアントへの送信
    // - broadcast: 複数クライアントへの送信（部分失敗の許容）
    // - 同時接続数の上限
    //
    // 【なぜこのテストが必要か】
    // - MessagePusher は UseCase から呼ばれる通信層の中核
    // - ドメインイベントが正しいワイヤ形式で送信キューに入ることを保証する
    // ========================================

    fn create_test_pusher(
        max_clients: usize,
    ) -> (
        WebSocketMessagePusher,
        Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
    ) {
        let clients = Arc::new(Mutex::new(HashMap::new()));
        let pusher = WebSocketMessagePusher::new(clients.clone(), max_clients);
        (pusher, clients)
    }

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定のクライアントにエンコード済みのイベントを送信できる
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher(10);
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_client(conn("alice"), tx).await.unwrap();

        // when (操作):
        let result = pusher
            .push_to(
                &conn("alice"),
                &OutboundEvent::ChatEnded {
                    reason: EndReason::Left,
                },
            )
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            rx.recv().await,
            Some(r#"{"event":"chat_ended","data":{"reason":"left"}}"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 存在しないクライアントへの送信はエラーを返す
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher(10);

        // when (操作):
        let result = pusher.push_to(&conn("ghost"), &OutboundEvent::Waiting).await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }

    #[tokio::test]
    async fn test_push_to_closed_channel_fails() {
        // テスト項目: 受信側が閉じた送信キューへの送信は PushFailed になる
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher(10);
        let (tx, rx) = mpsc::unbounded_channel();
        pusher.register_client(conn("alice"), tx).await.unwrap();
        drop(rx);

        // when (操作):
        let result = pusher.push_to(&conn("alice"), &OutboundEvent::Waiting).await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::PushFailed(_))));
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: ブロードキャスト時、一部のクライアントが存在しなくても成功する
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher(10);
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher.register_client(conn("alice"), tx1).await.unwrap();
        pusher.register_client(conn("bob"), tx2).await.unwrap();
        let event = OutboundEvent::ChatStarted {
            session_id: SessionId::new("r1".to_string()).unwrap(),
            kind: ChatKind::Text,
        };

        // when (操作):
        let result = pusher
            .broadcast(vec![conn("alice"), conn("bob"), conn("ghost")], &event)
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        let expected = r#"{"event":"chat_started","data":{"room":"r1","type":"text"}}"#;
        assert_eq!(rx1.recv().await.as_deref(), Some(expected));
        assert_eq!(rx2.recv().await.as_deref(), Some(expected));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates_and_enforces_capacity() {
        // テスト項目: 重複登録と上限超過は拒否され、登録解除で空きができる
        // given (前提条件):
        let (pusher, clients) = create_test_pusher(2);
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let (tx3, _rx3) = mpsc::unbounded_channel();
        let (tx4, _rx4) = mpsc::unbounded_channel();
        pusher.register_client(conn("alice"), tx1).await.unwrap();

        // when (操作):
        let duplicate = pusher.register_client(conn("alice"), tx2.clone()).await;
        let second = pusher.register_client(conn("bob"), tx2).await;
        let third = pusher.register_client(conn("carol"), tx3).await;
        pusher.unregister_client(&conn("alice")).await;
        let after_leave = pusher.register_client(conn("carol"), tx4).await;

        // then (期待する結果):
        assert_eq!(
            duplicate,
            Err(MessagePushError::DuplicateClient("alice".to_string()))
        );
        assert!(second.is_ok());
        assert_eq!(third, Err(MessagePushError::CapacityExceeded(2)));
        assert!(after_leave.is_ok());
        assert_eq!(pusher.count_clients().await, 2);
        assert!(clients.lock().await.contains_key(&conn("carol")));
    }
}
