//! Monitor (proctor) feed.
//!
//! Streams every presence change and signaling event to the monitoring
//! console. On connect the current presence snapshot is sent first so
//! the console can render immediately, then changes follow in delivery
//! order.

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::state::AppState;
use crate::ws::HEARTBEAT_INTERVAL;

/// GET /api/v1/proctor/ws -- upgrade to the monitor feed.
pub async fn monitor_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Manage one monitor connection after upgrade.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "Monitor feed connected");

    let mut presence_events = state.presence.subscribe();
    let mut signaling_events = state.signaling.subscribe();
    let (mut sink, mut stream) = socket.split();
    let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);

    // Initial snapshot so the console renders without waiting for churn.
    let snapshot = serde_json::json!({
        "type": "snapshot",
        "entries": state.presence.list(),
    });
    if sink
        .send(Message::Text(snapshot.to_string().into()))
        .await
        .is_err()
    {
        return;
    }

    loop {
        tokio::select! {
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(Message::Pong(_))) => {
                    tracing::trace!(conn_id = %conn_id, "Pong received");
                }
                Some(Ok(_)) => {
                    // Push-only channel; the answer goes through HTTP.
                }
                Some(Err(e)) => {
                    tracing::debug!(conn_id = %conn_id, error = %e, "Monitor receive error");
                    break;
                }
            },
            event = presence_events.recv() => match event {
                Ok(change) => {
                    let payload = serde_json::json!({ "type": "presence", "event": change });
                    if sink.send(Message::Text(payload.to_string().into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(conn_id = %conn_id, skipped, "Monitor presence feed lagged");
                }
                Err(RecvError::Closed) => break,
            },
            event = signaling_events.recv() => match event {
                Ok(ev) => {
                    let payload = serde_json::json!({ "type": "signaling", "event": ev });
                    if sink.send(Message::Text(payload.to_string().into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(conn_id = %conn_id, skipped, "Monitor signaling feed lagged");
                }
                Err(RecvError::Closed) => break,
            },
            _ = heartbeat.tick() => {
                if sink.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
        }
    }

    tracing::info!(conn_id = %conn_id, "Monitor feed disconnected");
}
