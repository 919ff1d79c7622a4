//! Handlers for the signaling exchange.
//!
//! The candidate (sender) publishes an offer and connectivity
//! candidates; the monitor (receiver) publishes the answer. Writes go
//! through these endpoints; interested parties observe changes over the
//! WebSocket push channels.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use invigil_core::error::CoreError;
use invigil_presence::{Exchange, IceCandidate, SessionDescription, SignalingError};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/signaling/{safeName}/offer
///
/// Publish the candidate's offer. A re-offer replaces the whole
/// exchange (fresh peer connection, fresh state).
pub async fn publish_offer(
    State(state): State<AppState>,
    Path(safe_name): Path<String>,
    Json(offer): Json<SessionDescription>,
) -> AppResult<impl IntoResponse> {
    state.signaling.publish_offer(&safe_name, offer);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/signaling/{safeName}/answer
///
/// Publish the monitor's answer. Valid only after an offer exists and
/// at most once per exchange.
pub async fn publish_answer(
    State(state): State<AppState>,
    Path(safe_name): Path<String>,
    Json(answer): Json<SessionDescription>,
) -> AppResult<impl IntoResponse> {
    state
        .signaling
        .publish_answer(&safe_name, answer)
        .map_err(|e| match e {
            SignalingError::NoOffer(_) | SignalingError::AnswerAlreadySet(_) => {
                AppError::Core(CoreError::Conflict(e.to_string()))
            }
        })?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/signaling/{safeName}/candidates
///
/// Append one connectivity candidate (either side). Duplicates and
/// reordering are fine by contract.
pub async fn add_candidate(
    State(state): State<AppState>,
    Path(safe_name): Path<String>,
    Json(candidate): Json<IceCandidate>,
) -> AppResult<impl IntoResponse> {
    state.signaling.add_candidate(&safe_name, candidate);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/signaling/{safeName}
///
/// Snapshot of the exchange, for late joiners catching up before
/// following the change feed. An identifier with no exchange yet reads
/// as an empty one.
pub async fn get_exchange(
    State(state): State<AppState>,
    Path(safe_name): Path<String>,
) -> AppResult<Json<DataResponse<Exchange>>> {
    let exchange = state.signaling.snapshot(&safe_name).unwrap_or_default();
    Ok(Json(DataResponse { data: exchange }))
}
