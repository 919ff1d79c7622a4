//! Route definitions for the monitor (proctor) view.

use axum::routing::get;
use axum::Router;

use crate::handlers::proctor;
use crate::state::AppState;
use crate::ws;

/// Routes mounted at `/proctor`.
///
/// ```text
/// GET    /presence  -> list_presence
/// GET    /ws        -> monitor WebSocket feed
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/presence", get(proctor::list_presence))
        .route("/ws", get(ws::monitor_ws))
}
