//! WebSocket feed for seat occupancy.
//!
//! The tablet subscribes once and receives a full seat snapshot on connect
//! and after every sensor report. Snapshots are small (a handful of seats),
//! so there is no incremental diffing.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::seats::{SeatStatus, SeatStore, SeatUpdateSender};

#[derive(Clone)]
pub struct WsState {
    pub seat_store: SeatStore,
    pub seat_updates_tx: SeatUpdateSender,
}

/// Server message sent to clients
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
enum ServerMessage {
    /// Initial connection acknowledgment
    Connected { message: String },
    /// Full seat snapshot
    Seats {
        timestamp: String,
        seats: Vec<SeatStatus>,
    },
}

/// WebSocket endpoint for seat updates
pub async fn ws_seats(ws: WebSocketUpgrade, State(state): State<WsState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: WsState) {
    let (mut sender, mut receiver) = socket.split();
    let mut updates_rx = state.seat_updates_tx.subscribe();

    let connected_msg = ServerMessage::Connected {
        message: "Connected to seat updates.".to_string(),
    };
    if let Ok(json) = serde_json::to_string(&connected_msg) {
        let _ = sender.send(Message::Text(json.into())).await;
    }

    // Initial snapshot
    let snapshot = ServerMessage::Seats {
        timestamp: chrono::Utc::now().to_rfc3339(),
        seats: state.seat_store.read().await.clone(),
    };
    if let Ok(json) = serde_json::to_string(&snapshot) {
        if sender.send(Message::Text(json.into())).await.is_err() {
            return;
        }
    }

    // Forward broadcast updates to the socket
    let forward_task = tokio::spawn(async move {
        loop {
            match updates_rx.recv().await {
                Ok(update) => {
                    let msg = ServerMessage::Seats {
                        timestamp: update.timestamp,
                        seats: update.seats,
                    };
                    if let Ok(json) = serde_json::to_string(&msg) {
                        if sender.send(Message::Text(json.into())).await.is_err() {
                            break;
                        }
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
            }
        }
    });

    // Drain client messages until the connection closes
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Ping(_)) => {
                // Axum handles pong automatically
            }
            Ok(Message::Close(_)) => break,
            Err(_) => break,
            _ => {}
        }
    }

    forward_task.abort();
}
