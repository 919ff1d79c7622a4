//! Route definitions for the booking resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::bookings;
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// POST   /        -> book_slot
/// GET    /slots   -> get_booked_slots
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(bookings::book_slot))
        .route("/slots", get(bookings::get_booked_slots))
}
