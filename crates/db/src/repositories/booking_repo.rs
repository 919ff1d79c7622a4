//! Repository for the `slot_locks` and `bookings` tables.
//!
//! The reservation write is the one place in the system that needs a
//! real concurrency guarantee. It is delegated entirely to Postgres:
//! the lock row is read and written inside a single transaction, and
//! the `uq_slot_locks_date_slot` unique constraint resolves the race
//! when two transactions both observe the slot as free. Exactly one
//! commits; the other surfaces [`ReserveError::SlotTaken`].

use chrono::NaiveDate;
use invigil_core::slots::slot_key;
use sqlx::PgPool;

use crate::models::booking::{Booking, CreateBooking};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, candidate_id, candidate_name, candidate_email, \
                       candidate_phone, slot_date, time_slot, created_at";

/// PostgreSQL unique violation error code.
const UNIQUE_VIOLATION: &str = "23505";

/// Outcome of a failed reservation attempt.
#[derive(Debug, thiserror::Error)]
pub enum ReserveError {
    /// The (date, slot) pair already has a lock. Expected under
    /// contention; the caller should offer another slot.
    #[error("slot already booked")]
    SlotTaken,

    /// Transport or store failure; retryable.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Reservation and booked-slot queries.
pub struct BookingRepo;

impl BookingRepo {
    /// Atomically reserve a slot and record the booking.
    ///
    /// Inside one transaction: read the slot lock by its composite key;
    /// if present, abort with [`ReserveError::SlotTaken`]; otherwise
    /// insert the lock and the booking together and commit. A unique
    /// violation on either insert (a concurrent winner committed
    /// between our read and write) also maps to `SlotTaken`, so no
    /// partial write ever survives a conflict.
    pub async fn reserve(pool: &PgPool, input: &CreateBooking) -> Result<Booking, ReserveError> {
        let key = slot_key(input.slot_date, &input.time_slot);

        let mut tx = pool.begin().await?;

        let existing: Option<(String,)> =
            sqlx::query_as("SELECT slot_key FROM slot_locks WHERE slot_key = $1")
                .bind(&key)
                .fetch_optional(&mut *tx)
                .await?;

        if existing.is_some() {
            // Dropping the transaction rolls it back.
            return Err(ReserveError::SlotTaken);
        }

        sqlx::query(
            "INSERT INTO slot_locks (slot_key, slot_date, time_slot, booked_by)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&key)
        .bind(input.slot_date)
        .bind(&input.time_slot)
        .bind(&input.candidate_id)
        .execute(&mut *tx)
        .await
        .map_err(classify_conflict)?;

        let query = format!(
            "INSERT INTO bookings (candidate_id, candidate_name, candidate_email, \
                                   candidate_phone, slot_date, time_slot)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let booking = sqlx::query_as::<_, Booking>(&query)
            .bind(&input.candidate_id)
            .bind(&input.candidate_name)
            .bind(&input.candidate_email)
            .bind(&input.candidate_phone)
            .bind(input.slot_date)
            .bind(&input.time_slot)
            .fetch_one(&mut *tx)
            .await
            .map_err(classify_conflict)?;

        tx.commit().await?;
        Ok(booking)
    }

    /// List the time slots already booked on a date.
    ///
    /// Plain query, no special consistency requirement; used to render
    /// the slot picker.
    pub async fn list_booked_slots(
        pool: &PgPool,
        date: NaiveDate,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT time_slot FROM slot_locks WHERE slot_date = $1")
                .bind(date)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(slot,)| slot).collect())
    }

    /// Fetch the booking for a (date, slot) pair, if any.
    pub async fn find_by_date_slot(
        pool: &PgPool,
        date: NaiveDate,
        time_slot: &str,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM bookings WHERE slot_date = $1 AND time_slot = $2");
        sqlx::query_as::<_, Booking>(&query)
            .bind(date)
            .bind(time_slot)
            .fetch_optional(pool)
            .await
    }
}

/// Map a unique violation to `SlotTaken`; pass other errors through.
fn classify_conflict(err: sqlx::Error) -> ReserveError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return ReserveError::SlotTaken;
        }
    }
    ReserveError::Database(err)
}
