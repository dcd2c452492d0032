//! InMemory Matchmaking Repository 実装
//!
//! ドメイン層が定義する MatchmakingRepository trait の具体的な実装。
//! `Matchmaker` を一つの Mutex で包み、各操作を不可分に実行します。
//! 状態遷移のロックは同期的な処理の間だけ保持され、await をまたぎません。
//! 例外はセッション内中継で、検索から送信キューへの投入（ブロックしない）まで
//! ロックを保持し、終了処理との間に割り込まれないようにしています。
//!
//! 状態はプロセスのメモリ上にのみ存在し、再起動で失われます。

use std::sync::Arc;

use async_trait::async_trait;
use pairchat_shared::time::Clock;
use tokio::sync::Mutex;

use crate::domain::{
    ChatKind, ConnectionId, ConnectionState, EndedSession, JoinResult, Matchmaker,
    MatchmakingRepository, MatchmakingSnapshot, MessagePusher, OutboundEvent, Pair, RelayScope,
    SessionId, Timestamp,
};

/// インメモリ Matchmaking Repository 実装
pub struct InMemoryMatchmakingRepository {
    /// 待機キューとセッション索引の唯一の所有者
    matchmaker: Arc<Mutex<Matchmaker>>,
    /// ペア開始・終了時刻の取得元
    clock: Arc<dyn Clock>,
}

impl InMemoryMatchmakingRepository {
    /// 新しい InMemoryMatchmakingRepository を作成
    pub fn new(matchmaker: Arc<Mutex<Matchmaker>>, clock: Arc<dyn Clock>) -> Self {
        Self { matchmaker, clock }
    }

    fn now(&self) -> Timestamp {
        Timestamp::new(self.clock.now_millis())
    }
}

#[async_trait]
impl MatchmakingRepository for InMemoryMatchmakingRepository {
    async fn add_connection(&self, connection_id: ConnectionId) -> bool {
        let mut matchmaker = self.matchmaker.lock().await;
        matchmaker.connect(connection_id)
    }

    async fn join_waiting_room(
        &self,
        connection_id: ConnectionId,
        kind: ChatKind,
    ) -> Option<JoinResult> {
        let now = self.now();
        let mut matchmaker = self.matchmaker.lock().await;
        matchmaker.join(connection_id, kind, now, SessionId::generate)
    }

    async fn leave_session(
        &self,
        connection_id: &ConnectionId,
        session_id: &SessionId,
    ) -> Option<EndedSession> {
        let now = self.now();
        let mut matchmaker = self.matchmaker.lock().await;
        matchmaker.leave(connection_id, session_id, now)
    }

    async fn remove_connection(&self, connection_id: &ConnectionId) -> Option<EndedSession> {
        let now = self.now();
        let mut matchmaker = self.matchmaker.lock().await;
        matchmaker.disconnect(connection_id, now)
    }

    async fn find_pair(
        &self,
        connection_id: &ConnectionId,
        session_id: &SessionId,
    ) -> Option<Pair> {
        let matchmaker = self.matchmaker.lock().await;
        matchmaker.find_pair(connection_id, session_id).cloned()
    }

    async fn relay_in_session(
        &self,
        connection_id: &ConnectionId,
        session_id: &SessionId,
        scope: RelayScope,
        event: &OutboundEvent,
        message_pusher: &dyn MessagePusher,
    ) -> Option<Vec<ConnectionId>> {
        let matchmaker = self.matchmaker.lock().await;
        let pair = matchmaker.find_pair(connection_id, session_id)?;
        let targets = match scope {
            RelayScope::BothMembers => pair.member_ids(),
            RelayScope::PartnerOnly => vec![pair.partner_of(connection_id)?.clone()],
        };

        let result = match scope {
            RelayScope::BothMembers => message_pusher.broadcast(targets.clone(), event).await,
            RelayScope::PartnerOnly => message_pusher.push_to(&targets[0], event).await,
        };
        if let Err(e) = result {
            tracing::warn!("Failed to relay in session {}: {}", session_id, e);
        }

        Some(targets)
    }

    async fn connection_state(&self, connection_id: &ConnectionId) -> ConnectionState {
        let matchmaker = self.matchmaker.lock().await;
        matchmaker.state_of(connection_id)
    }

    async fn snapshot(&self) -> MatchmakingSnapshot {
        let matchmaker = self.matchmaker.lock().await;
        matchmaker.snapshot()
    }
}
