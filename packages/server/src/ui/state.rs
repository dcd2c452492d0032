//! Shared application state.

use std::sync::Arc;

use crate::usecase::{
    ConnectParticipantUseCase, DisconnectParticipantUseCase, GetMatchmakingStatsUseCase,
    JoinWaitingRoomUseCase, LeaveChatUseCase, RelaySignalUseCase, SendMessageUseCase,
};

/// Shared application state
pub struct AppState {
    /// ConnectParticipantUseCase（接続受付のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（接続切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// JoinWaitingRoomUseCase（待機キュー参加のユースケース）
    pub join_waiting_room_usecase: Arc<JoinWaitingRoomUseCase>,
    /// LeaveChatUseCase（セッション離脱のユースケース）
    pub leave_chat_usecase: Arc<LeaveChatUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// RelaySignalUseCase（シグナリング中継のユースケース）
    pub relay_signal_usecase: Arc<RelaySignalUseCase>,
    /// GetMatchmakingStatsUseCase（マッチング状況取得のユースケース）
    pub get_stats_usecase: Arc<GetMatchmakingStatsUseCase>,
}
