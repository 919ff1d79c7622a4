//! Route definitions for the signaling exchange.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::signaling;
use crate::state::AppState;

/// Routes mounted at `/signaling`.
///
/// ```text
/// GET    /{safeName}             -> get_exchange
/// POST   /{safeName}/offer       -> publish_offer
/// POST   /{safeName}/answer      -> publish_answer
/// POST   /{safeName}/candidates  -> add_candidate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{safe_name}", get(signaling::get_exchange))
        .route("/{safe_name}/offer", post(signaling::publish_offer))
        .route("/{safe_name}/answer", post(signaling::publish_answer))
        .route("/{safe_name}/candidates", post(signaling::add_candidate))
}
