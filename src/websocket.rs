use axum::{
    extract::{ws::Message, State, WebSocketUpgrade},
    response::Response,
};
use axum::extract::ws::WebSocket;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::handlers;
use crate::state::AppState;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let client_uid = state.generate_client_uid();
    info!("New WebSocket connection: {}", client_uid);

    let session = state.create_session(&client_uid);

    let (mut sink, mut receiver) = socket.split();

    // Spawned translation tasks push through this channel, so the sink is
    // bridged rather than handed around.
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let forward_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if sink.send(Message::Text(message)).await.is_err() {
                break;
            }
        }
    });

    // Handshake: confirmation, picker data, initial snapshot.
    let initial_messages = vec![
        json!({
            "type": "connection-established",
            "client_uid": client_uid,
        })
        .to_string(),
        handlers::languages_message(),
        handlers::view_state_message(&*session.read().await),
    ];
    for msg in initial_messages {
        if tx.send(msg).is_err() {
            error!("Failed to send initial message to {}", client_uid);
            state.remove_session(&client_uid);
            forward_task.abort();
            return;
        }
    }

    // Handle incoming messages
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                if let Err(e) = handlers::handle_message(&state, &client_uid, &text, &tx).await {
                    error!("Error handling message: {}", e);
                }
            }
            Ok(Message::Close(_)) => {
                info!("Client {} disconnected", client_uid);
                break;
            }
            Err(e) => {
                error!("WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }

    // Cleanup: view state is transient, nothing survives the socket.
    state.remove_session(&client_uid);
    forward_task.abort();
    info!("Cleaned up client {}", client_uid);
}
