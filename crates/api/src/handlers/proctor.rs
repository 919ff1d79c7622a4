//! Handlers for the monitor (proctor) view.

use axum::extract::State;
use axum::Json;
use invigil_presence::PresenceEntry;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/proctor/presence
///
/// Snapshot of all currently live candidate sessions. The WebSocket
/// channel delivers subsequent joins and leaves.
pub async fn list_presence(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PresenceEntry>>>> {
    Ok(Json(DataResponse {
        data: state.presence.list(),
    }))
}
