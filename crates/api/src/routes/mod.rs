pub mod bookings;
pub mod health;
pub mod proctor;
pub mod sessions;
pub mod signaling;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /bookings                          reserve a slot (POST)
/// /bookings/slots                    booked slots for a date (GET)
///
/// /sessions                          start or resume a session (POST)
/// /sessions/{id}                     session state (GET)
/// /sessions/{id}/answers/{question}  save one draft answer (PUT)
/// /sessions/{id}/camera              report camera state (POST)
/// /sessions/{id}/submit              manual submission (POST)
/// /sessions/{id}/live                candidate WebSocket channel
///
/// /signaling/{safeName}              exchange snapshot (GET)
/// /signaling/{safeName}/offer        publish offer (POST)
/// /signaling/{safeName}/answer       publish answer (POST)
/// /signaling/{safeName}/candidates   append candidate (POST)
///
/// /proctor/presence                  live presence snapshot (GET)
/// /proctor/ws                        monitor WebSocket feed
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/bookings", bookings::router())
        .nest("/sessions", sessions::router())
        .nest("/signaling", signaling::router())
        .nest("/proctor", proctor::router())
}
