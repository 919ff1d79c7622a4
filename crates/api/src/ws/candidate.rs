//! Candidate live channel.
//!
//! Connecting announces the candidate's camera session: the socket task
//! registers presence and holds the guard for the life of the
//! connection, so an abrupt disconnect (tab close, network loss)
//! removes the entry without any explicit teardown call. The socket
//! pushes the session's signaling changes (the monitor's answer and
//! connectivity candidates) down to the candidate.

use axum::body::Bytes;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use invigil_core::error::CoreError;
use invigil_core::types::DbId;
use invigil_db::models::exam_session::ExamSession;
use invigil_db::repositories::ExamSessionRepo;
use invigil_presence::SignalingEvent;
use tokio::sync::broadcast::error::RecvError;

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::ws::HEARTBEAT_INTERVAL;

/// GET /api/v1/sessions/{id}/live -- upgrade to the candidate channel.
///
/// Rejected for unknown sessions and for sessions that already
/// submitted (their live state is torn down, not re-announced).
pub async fn candidate_ws(
    Path(id): Path<DbId>,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> AppResult<impl IntoResponse> {
    let session = ExamSessionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id,
        }))?;
    if session.submitted {
        return Err(AppError::Core(CoreError::AlreadySubmitted(id)));
    }

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, session)))
}

/// Manage one candidate connection after upgrade.
async fn handle_socket(socket: WebSocket, state: AppState, session: ExamSession) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(
        conn_id = %conn_id,
        session_id = session.id,
        safe_name = %session.safe_name,
        "Candidate channel connected"
    );

    // Presence lives exactly as long as this task holds the guard.
    let _guard = state
        .presence
        .register(&session.safe_name, &session.display_name);

    let mut events = state.signaling.subscribe();
    let (mut sink, mut stream) = socket.split();
    let mut heartbeat = tokio::time::interval(HEARTBEAT_INTERVAL);

    loop {
        tokio::select! {
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(Message::Pong(_))) => {
                    tracing::trace!(conn_id = %conn_id, "Pong received");
                }
                Some(Ok(_)) => {
                    // Push-only channel; writes go through HTTP.
                }
                Some(Err(e)) => {
                    tracing::debug!(conn_id = %conn_id, error = %e, "Candidate receive error");
                    break;
                }
            },
            event = events.recv() => match event {
                Ok(ev) if ev.safe_name() == session.safe_name && forwards_to_candidate(&ev) => {
                    let payload = serde_json::json!({ "type": "signaling", "event": ev });
                    if sink.send(Message::Text(payload.to_string().into())).await.is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(conn_id = %conn_id, skipped, "Candidate event feed lagged");
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

    tracing::info!(conn_id = %conn_id, session_id = session.id, "Candidate channel disconnected");
    // _guard drops here: presence is removed even on abrupt disconnect.
}

/// The candidate cares about the monitor's side of the exchange, not
/// its own offer echoing back.
fn forwards_to_candidate(event: &SignalingEvent) -> bool {
    matches!(
        event,
        SignalingEvent::AnswerPublished { .. }
            | SignalingEvent::CandidateAdded { .. }
            | SignalingEvent::Cleared { .. }
    )
}
