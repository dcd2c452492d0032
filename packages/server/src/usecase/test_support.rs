//! Fixtures shared by the use case tests.

use std::{collections::HashMap, sync::Arc};

use pairchat_shared::time::FixedClock;
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{ConnectionId, MatchmakingRepository, Matchmaker, MessagePusher},
    infrastructure::{
        dto::websocket::ServerMessage, message_pusher::WebSocketMessagePusher,
        repository::InMemoryMatchmakingRepository,
    },
};

pub const TEST_NOW: i64 = 1_700_000_000_000;

pub fn conn(id: &str) -> ConnectionId {
    ConnectionId::new(id.to_string()).unwrap()
}

pub fn create_test_repository() -> Arc<InMemoryMatchmakingRepository> {
    Arc::new(InMemoryMatchmakingRepository::new(
        Arc::new(Mutex::new(Matchmaker::new())),
        Arc::new(FixedClock::new(TEST_NOW)),
    ))
}

pub fn create_test_message_pusher() -> Arc<WebSocketMessagePusher> {
    let clients = Arc::new(Mutex::new(HashMap::new()));
    Arc::new(WebSocketMessagePusher::new(clients, 100))
}

/// Register `id` with the pusher and hand back its outbound queue
pub async fn register(
    message_pusher: &WebSocketMessagePusher,
    id: &str,
) -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    message_pusher.register_client(conn(id), tx).await.unwrap();
    rx
}

/// Register `id` with both the pusher and the engine, as an accepted socket is
pub async fn connect(
    repository: &InMemoryMatchmakingRepository,
    message_pusher: &WebSocketMessagePusher,
    id: &str,
) -> mpsc::UnboundedReceiver<String> {
    let rx = register(message_pusher, id).await;
    repository.add_connection(conn(id)).await;
    rx
}

/// Next event already queued for a client
pub fn next_event(rx: &mut mpsc::UnboundedReceiver<String>) -> ServerMessage {
    let raw = rx.try_recv().expect("expected a queued event");
    serde_json::from_str(&raw).expect("queued event should be valid JSON")
}

pub fn assert_no_event(rx: &mut mpsc::UnboundedReceiver<String>) {
    if let Ok(raw) = rx.try_recv() {
        panic!("expected no event, got {raw}");
    }
}
