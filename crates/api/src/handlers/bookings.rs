//! Handlers for the interview slot booking surface.
//!
//! The reservation guarantee lives in [`BookingRepo::reserve`]; this
//! layer validates input before any store access, maps the conflict
//! outcome to the published 409 contract, and fires the best-effort
//! confirmation emails after a successful commit.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use invigil_core::error::CoreError;
use invigil_core::slots::is_valid_time_slot;
use invigil_db::models::booking::{Booking, CreateBooking};
use invigil_db::repositories::{BookingRepo, ReserveError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Candidate contact details carried on the booking request.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CandidateProfile {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    pub phone: Option<String>,
}

/// Body of `POST /api/v1/bookings`.
///
/// All fields are required; anything missing or blank is rejected with
/// the contract's `"Missing data"` message before the store is touched.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookSlotRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub candidate_id: String,
    #[serde(default)]
    #[validate(nested)]
    pub candidate: CandidateProfile,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub date: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub time_slot: String,
}

/// Response body for a confirmed reservation.
#[derive(Debug, Serialize)]
pub struct BookingConfirmed {
    pub success: bool,
    pub data: Booking,
}

/// Query parameters for `GET /api/v1/bookings/slots`.
#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/bookings
///
/// Reserve an interview slot. Outcomes:
/// - 200 `{success: true, data}` -- the unique reservation for the pair
/// - 400 `"Missing data"` -- validation failed, nothing was written
/// - 409 `"Slot already booked"` -- lost to an earlier or concurrent booking
/// - 500 `"Booking failed"` -- store failure, retryable
pub async fn book_slot(
    State(state): State<AppState>,
    Json(req): Json<BookSlotRequest>,
) -> AppResult<Json<BookingConfirmed>> {
    req.validate()
        .map_err(|_| AppError::BadRequest("Missing data".into()))?;

    let slot_date = parse_date(&req.date)?;
    if !is_valid_time_slot(&req.time_slot) {
        return Err(AppError::BadRequest(format!(
            "Unknown time slot: {}",
            req.time_slot
        )));
    }

    let input = CreateBooking {
        candidate_id: req.candidate_id,
        candidate_name: req.candidate.name,
        candidate_email: req.candidate.email,
        candidate_phone: req.candidate.phone,
        slot_date,
        time_slot: req.time_slot,
    };

    let booking = BookingRepo::reserve(&state.pool, &input)
        .await
        .map_err(|e| match e {
            ReserveError::SlotTaken => {
                AppError::Core(CoreError::Conflict("Slot already booked".into()))
            }
            ReserveError::Database(err) => {
                tracing::error!(error = %err, "Slot reservation failed");
                AppError::OperationFailed("Booking failed")
            }
        })?;

    // Notifications are best-effort and decoupled from the guarantee:
    // the reservation stands whether or not either email goes out.
    let notifier = Arc::clone(&state.notifier);
    let for_email = booking.clone();
    tokio::spawn(async move {
        notifier.notify_booking(&for_email).await;
    });

    Ok(Json(BookingConfirmed {
        success: true,
        data: booking,
    }))
}

/// GET /api/v1/bookings/slots?date=YYYY-MM-DD
///
/// Time slots already booked on a date, for rendering the slot picker.
pub async fn get_booked_slots(
    State(state): State<AppState>,
    Query(params): Query<SlotsQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let date = parse_date(&params.date)?;
    let slots = BookingRepo::list_booked_slots(&state.pool, date).await?;
    Ok(Json(json!({ "bookedSlots": slots })))
}

/// Parse an ISO `YYYY-MM-DD` date or reject with the contract message.
fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("Missing data".into()))
}
