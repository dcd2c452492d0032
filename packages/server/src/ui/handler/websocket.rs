//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{ChatKind, ConnectionId, SessionId, SignalPayload, ValueObjectError},
    infrastructure::dto::{
        conversion::parse_room,
        websocket::{ClientMessage, SendMessageRequest},
    },
    ui::state::AppState,
    usecase::ConnectError,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, StatusCode> {
    let connection_id = ConnectionId::generate();

    // Create a channel for this client to receive events
    let (tx, rx) = mpsc::unbounded_channel();

    // Use ConnectParticipantUseCase to handle connection
    // (register_client is called inside the UseCase)
    match state
        .connect_participant_usecase
        .execute(connection_id.clone(), tx)
        .await
    {
        Ok(()) => {
            tracing::info!("Client '{}' connected", connection_id);
            let state_for_failure = state.clone();
            let connection_id_for_failure = connection_id.clone();
            Ok(ws
                .on_failed_upgrade(move |e| {
                    tracing::warn!(
                        "WebSocket upgrade failed for '{}': {}",
                        connection_id_for_failure,
                        e
                    );
                    tokio::spawn(async move {
                        state_for_failure
                            .disconnect_participant_usecase
                            .execute(connection_id_for_failure)
                            .await;
                    });
                })
                .on_upgrade(move |socket| handle_socket(socket, state, connection_id, rx)))
        }
        Err(ConnectError::CapacityExceeded(max)) => {
            tracing::warn!(
                "Connection limit of {} reached. Rejecting '{}'",
                max,
                connection_id
            );
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
        Err(e) => {
            tracing::error!("Failed to register '{}': {}", connection_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Spawns a task that drains the client's outbound queue into its WebSocket sink.
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

/// Waits for the first task to finish, aborts the other and waits for it too.
///
/// `abort` only requests cancellation: a task that is mid-poll on another
/// worker keeps running until its next await point.
async fn stop_when_either_finishes(
    mut recv_task: tokio::task::JoinHandle<()>,
    mut send_task: tokio::task::JoinHandle<()>,
) {
    // 完了済みの JoinHandle は再度 poll できないため、中断した側だけを待つ
    let recv_finished = tokio::select! {
        _ = &mut recv_task => true,
        _ = &mut send_task => false,
    };
    let aborted = if recv_finished { send_task } else { recv_task };
    aborted.abort();
    let _ = aborted.await;
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (sender, mut receiver) = socket.split();

    let connection_id_clone = connection_id.clone();
    let state_clone = state.clone();

    // Spawn a task to receive events from this client
    let recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::debug!("WebSocket error from '{}': {}", connection_id_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientMessage>(text.as_str()) {
                    Ok(event) => {
                        dispatch(&state_clone, &connection_id_clone, event).await;
                    }
                    Err(e) => {
                        tracing::debug!(
                            "Dropping unparseable frame from '{}': {}",
                            connection_id_clone,
                            e
                        );
                    }
                },
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", connection_id_clone);
                    break;
                }
                // Ping/pong is handled by the WebSocket protocol; binary frames are ignored
                _ => {}
            }
        }
    });

    // Spawn a task to push queued events to this client
    let send_task = pusher_loop(rx, sender);

    // Both tasks have fully stopped once this returns, so no request from
    // this client can reach the engine after the cleanup below
    stop_when_either_finishes(recv_task, send_task).await;

    // Use DisconnectParticipantUseCase to clean up pool, session and queue
    state
        .disconnect_participant_usecase
        .execute(connection_id.clone())
        .await;
    tracing::info!("Client '{}' disconnected", connection_id);
}

/// Route one parsed client event to its use case.
///
/// Requests that fail conversion to domain types are dropped silently.
async fn dispatch(state: &AppState, connection_id: &ConnectionId, event: ClientMessage) {
    match event {
        ClientMessage::JoinWaitingRoom(request) => {
            let kind = match ChatKind::try_from(&request) {
                Ok(kind) => kind,
                Err(e) => return drop_request(connection_id, "join_waiting_room", e),
            };
            state
                .join_waiting_room_usecase
                .execute(connection_id.clone(), kind)
                .await;
        }
        ClientMessage::LeaveChat(request) => {
            let session_id = match parse_room(request.room) {
                Ok(session_id) => session_id,
                Err(e) => return drop_request(connection_id, "leave_chat", e),
            };
            state
                .leave_chat_usecase
                .execute(connection_id.clone(), session_id)
                .await;
        }
        ClientMessage::SendMessage(SendMessageRequest { room, message }) => {
            let session_id = match parse_room(room) {
                Ok(session_id) => session_id,
                Err(e) => return drop_request(connection_id, "send_message", e),
            };
            state
                .send_message_usecase
                .execute(
                    connection_id.clone(),
                    session_id,
                    message.as_deref().unwrap_or_default(),
                )
                .await;
        }
        ClientMessage::WebrtcSignal(request) => {
            let (session_id, payload) = match <(SessionId, SignalPayload)>::try_from(request) {
                Ok(parsed) => parsed,
                Err(e) => return drop_request(connection_id, "webrtc_signal", e),
            };
            state
                .relay_signal_usecase
                .execute(connection_id.clone(), session_id, payload)
                .await;
        }
    }
}

fn drop_request(connection_id: &ConnectionId, event: &str, reason: ValueObjectError) {
    tracing::debug!("Dropping {} from '{}': {}", event, connection_id, reason);
}
