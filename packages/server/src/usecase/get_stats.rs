//! UseCase: マッチング状況の取得

use std::sync::Arc;

use pairchat_shared::time::Clock;

use crate::domain::{MatchmakingRepository, MatchmakingSnapshot, MessagePusher, Timestamp};

/// ある時点でのマッチング状況
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchmakingStats {
    /// 接続中のクライアント数
    pub connected_clients: usize,
    pub snapshot: MatchmakingSnapshot,
    pub generated_at: Timestamp,
}

/// マッチング状況取得のユースケース
pub struct GetMatchmakingStatsUseCase {
    repository: Arc<dyn MatchmakingRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl GetMatchmakingStatsUseCase {
    pub fn new(
        repository: Arc<dyn MatchmakingRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    pub async fn execute(&self) -> MatchmakingStats {
        MatchmakingStats {
            connected_clients: self.message_pusher.count_clients().await,
            snapshot: self.repository.snapshot().await,
            generated_at: Timestamp::new(self.clock.now_millis()),
        }
    }
}
