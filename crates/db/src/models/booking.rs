//! Slot lock and booking models.

use chrono::NaiveDate;
use invigil_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `slot_locks` table.
///
/// One row per (date, slot) pair; its existence IS the reservation's
/// exclusivity. Never updated or deleted once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SlotLock {
    pub slot_key: String,
    pub slot_date: NaiveDate,
    pub time_slot: String,
    pub booked_by: String,
    pub created_at: Timestamp,
}

/// A row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: DbId,
    pub candidate_id: String,
    pub candidate_name: String,
    pub candidate_email: String,
    pub candidate_phone: Option<String>,
    #[serde(rename = "date")]
    pub slot_date: NaiveDate,
    pub time_slot: String,
    pub created_at: Timestamp,
}

/// DTO for creating a booking (and its slot lock) in one transaction.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub candidate_id: String,
    pub candidate_name: String,
    pub candidate_email: String,
    pub candidate_phone: Option<String>,
    pub slot_date: NaiveDate,
    pub time_slot: String,
}
