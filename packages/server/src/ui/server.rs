//! Server execution logic.

use std::{collections::HashMap, sync::Arc};

use axum::{Router, routing::get};
use pairchat_shared::time::{Clock, SystemClock};
use tokio::{net::TcpListener, sync::Mutex};
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    domain::Matchmaker,
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryMatchmakingRepository,
    },
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, GetMatchmakingStatsUseCase,
        JoinWaitingRoomUseCase, LeaveChatUseCase, RelaySignalUseCase, SendMessageUseCase,
    },
};

use super::{
    handler::{get_stats, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket matchmaking server
///
/// # Example
///
/// ```ignore
/// let server = Server::from_config(&config);
/// server.run(&config).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Create a new Server instance from already wired use cases
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Wire the in-memory engine and every use case
    pub fn from_config(config: &ServerConfig) -> Self {
        // Initialize dependencies in order:
        // 1. Repository
        // 2. MessagePusher
        // 3. UseCases
        // 4. Server

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        // 1. Create Repository (in-memory matchmaking engine)
        let repository = Arc::new(InMemoryMatchmakingRepository::new(
            Arc::new(Mutex::new(Matchmaker::new())),
            clock.clone(),
        ));

        // 2. Create MessagePusher (WebSocket implementation)
        let message_pusher_clients = Arc::new(Mutex::new(HashMap::new()));
        let message_pusher = Arc::new(WebSocketMessagePusher::new(
            message_pusher_clients,
            config.max_connections,
        ));

        // 3. Create UseCases (held by AppState)
        let state = AppState {
            connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            join_waiting_room_usecase: Arc::new(JoinWaitingRoomUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            leave_chat_usecase: Arc::new(LeaveChatUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                config.max_message_chars,
            )),
            relay_signal_usecase: Arc::new(RelaySignalUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            get_stats_usecase: Arc::new(GetMatchmakingStatsUseCase::new(
                repository,
                message_pusher,
                clock,
            )),
        };

        // 4. Create the server
        Self::new(state)
    }

    /// Build the axum router
    pub fn into_router(self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/stats", get(get_stats))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state)
    }

    /// Run the matchmaking server
    ///
    /// # Arguments
    ///
    /// * `config` - Supplies the host and port to bind to
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(config.bind_addr()).await?;
        tracing::info!("Connect to: ws://{}/ws", listener.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener).await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve on an already bound listener until a shutdown signal arrives
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        tracing::info!(
            "Matchmaking server listening on {}",
            listener.local_addr()?
        );
        axum::serve(listener, self.into_router())
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}
