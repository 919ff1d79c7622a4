//! Route definitions for the exam session resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;
use crate::ws;

/// Routes mounted at `/sessions`.
///
/// ```text
/// POST   /                           -> start_session
/// GET    /{id}                       -> get_session
/// PUT    /{id}/answers/{question}    -> save_answer
/// POST   /{id}/camera                -> set_camera
/// POST   /{id}/submit                -> submit_session
/// GET    /{id}/live                  -> candidate WebSocket
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(sessions::start_session))
        .route("/{id}", get(sessions::get_session))
        .route("/{id}/answers/{question}", put(sessions::save_answer))
        .route("/{id}/camera", post(sessions::set_camera))
        .route("/{id}/submit", post(sessions::submit_session))
        .route("/{id}/live", get(ws::candidate_ws))
}
