//! Repository trait 定義
//!
//! ドメイン層が必要とするマッチング状態へのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    ChatKind, ConnectionId, ConnectionState, EndedSession, JoinResult, MatchmakingSnapshot,
    MessagePusher, OutboundEvent, Pair, SessionId,
};

/// セッション内中継の宛先
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayScope {
    /// 送信者を含むペアの両者
    BothMembers,
    /// 送信者の相手だけ
    PartnerOnly,
}

/// Matchmaking Repository trait
///
/// 各メソッドは一つの不可分なトランザクションとして実行される。
/// 実装は接続集合・待機キュー・セッション索引を一つのロックで守る。
/// 状態遷移に伴う通知はロック解放後に UseCase 層が行う。
/// セッション内中継だけは、検索と送信キューへの投入を同じロックの中で行う。
#[async_trait]
pub trait MatchmakingRepository: Send + Sync {
    /// 新しい接続を登録（Idle）
    ///
    /// 既に登録済みなら `false`
    async fn add_connection(&self, connection_id: ConnectionId) -> bool;

    /// 待機キューへの参加（マッチング or 待機）
    ///
    /// 登録されていない（切断済みの）接続なら `None`
    async fn join_waiting_room(
        &self,
        connection_id: ConnectionId,
        kind: ChatKind,
    ) -> Option<JoinResult>;

    /// セッションからの離脱
    async fn leave_session(
        &self,
        connection_id: &ConnectionId,
        session_id: &SessionId,
    ) -> Option<EndedSession>;

    /// 接続の痕跡をすべて削除
    async fn remove_connection(&self, connection_id: &ConnectionId) -> Option<EndedSession>;

    /// `connection_id` がメンバーである生きたセッションを取得
    async fn find_pair(&self, connection_id: &ConnectionId, session_id: &SessionId)
    -> Option<Pair>;

    /// 生きたセッション内で `event` を中継
    ///
    /// セッションの検索と送信キューへの投入の間に終了処理が割り込まない。
    /// 投入はブロックしないため、ロック中に行っても遅い相手に引きずられない。
    ///
    /// # Returns
    ///
    /// * `Some(Vec<ConnectionId>)` - 投入した宛先
    /// * `None` - セッションが無い、または `connection_id` がメンバーでない
    async fn relay_in_session(
        &self,
        connection_id: &ConnectionId,
        session_id: &SessionId,
        scope: RelayScope,
        event: &OutboundEvent,
        message_pusher: &dyn MessagePusher,
    ) -> Option<Vec<ConnectionId>>;

    /// 接続の現在の状態を取得
    async fn connection_state(&self, connection_id: &ConnectionId) -> ConnectionState;

    /// 待機数・セッション数のスナップショットを取得
    async fn snapshot(&self) -> MatchmakingSnapshot;
}
