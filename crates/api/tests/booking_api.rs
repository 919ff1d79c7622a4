//! Integration tests for the slot booking endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json};
use serde_json::json;
use sqlx::PgPool;

/// A complete, valid booking payload for the given slot.
fn booking_payload(candidate_id: &str, date: &str, time_slot: &str) -> serde_json::Value {
    json!({
        "candidateId": candidate_id,
        "candidate": {
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "phone": "+1 555 0100"
        },
        "date": date,
        "timeSlot": time_slot
    })
}

// ---------------------------------------------------------------------------
// Test: a valid booking succeeds and echoes the reservation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn book_slot_succeeds(pool: PgPool) {
    let app = common::build_test_app(pool);
    let payload = booking_payload("cand-1", "2026-09-15", "10:00 AM - 10:30 AM");

    let response = post_json(app, "/api/v1/bookings", payload).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["candidateId"], "cand-1");
    assert_eq!(json["data"]["date"], "2026-09-15");
    assert_eq!(json["data"]["timeSlot"], "10:00 AM - 10:30 AM");
}

// ---------------------------------------------------------------------------
// Test: incomplete payload is rejected and nothing is written
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_data_rejected_before_any_write(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    // Candidate email is missing.
    let payload = json!({
        "candidateId": "cand-1",
        "candidate": { "name": "Ada Lovelace" },
        "date": "2026-09-15",
        "timeSlot": "10:00 AM - 10:30 AM"
    });

    let response = post_json(app, "/api/v1/bookings", payload).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Missing data");

    // The slot must still be free: no booking and no lock row.
    let (bookings,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings")
        .fetch_one(&pool)
        .await
        .unwrap();
    let (locks,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM slot_locks")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(bookings, 0);
    assert_eq!(locks, 0);
}

// ---------------------------------------------------------------------------
// Test: second booking for the same (date, slot) pair gets 409
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_slot_returns_conflict(pool: PgPool) {
    let first = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/bookings",
        booking_payload("cand-1", "2026-09-15", "10:00 AM - 10:30 AM"),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_json(
        common::build_test_app(pool),
        "/api/v1/bookings",
        booking_payload("cand-2", "2026-09-15", "10:00 AM - 10:30 AM"),
    )
    .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);

    let json = body_json(second).await;
    assert_eq!(json["error"], "Slot already booked");
}

// ---------------------------------------------------------------------------
// Test: same slot on a different date is independent
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn same_slot_different_date_is_free(pool: PgPool) {
    let first = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/bookings",
        booking_payload("cand-1", "2026-09-15", "10:00 AM - 10:30 AM"),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_json(
        common::build_test_app(pool),
        "/api/v1/bookings",
        booking_payload("cand-2", "2026-09-16", "10:00 AM - 10:30 AM"),
    )
    .await;
    assert_eq!(second.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Test: a time slot outside the published grid is rejected
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_time_slot_rejected(pool: PgPool) {
    let app = common::build_test_app(pool);
    let payload = booking_payload("cand-1", "2026-09-15", "3:00 AM - 3:30 AM");

    let response = post_json(app, "/api/v1/bookings", payload).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: a store failure surfaces as 500 "Booking failed"
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn store_failure_returns_booking_failed(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    // Closing the pool makes every reservation attempt fail at the store.
    pool.close().await;

    let payload = booking_payload("cand-1", "2026-09-15", "10:00 AM - 10:30 AM");
    let response = post_json(app, "/api/v1/bookings", payload).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Booking failed");
}

// ---------------------------------------------------------------------------
// Test: booked slots listing reflects confirmed reservations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn booked_slots_reflect_reservations(pool: PgPool) {
    // Fresh date reads as empty.
    let response = get(
        common::build_test_app(pool.clone()),
        "/api/v1/bookings/slots?date=2026-09-15",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["bookedSlots"], json!([]));

    // Book two slots on the date.
    for (id, slot) in [
        ("cand-1", "10:00 AM - 10:30 AM"),
        ("cand-2", "11:00 AM - 11:30 AM"),
    ] {
        let response = post_json(
            common::build_test_app(pool.clone()),
            "/api/v1/bookings",
            booking_payload(id, "2026-09-15", slot),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/v1/bookings/slots?date=2026-09-15",
    )
    .await;
    let json = body_json(response).await;
    let slots = json["bookedSlots"].as_array().unwrap();
    assert_eq!(slots.len(), 2);
    assert!(slots.contains(&json!("10:00 AM - 10:30 AM")));
    assert!(slots.contains(&json!("11:00 AM - 11:30 AM")));

    // A different date is unaffected.
    let response = get(
        common::build_test_app(pool),
        "/api/v1/bookings/slots?date=2026-09-16",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["bookedSlots"], json!([]));
}
