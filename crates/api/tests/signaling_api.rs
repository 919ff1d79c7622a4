//! Integration tests for the signaling exchange endpoints.
//!
//! Signaling state is in-process, not in the database, so each test
//! builds the app once and clones the router per request; the exchange
//! must survive across the request sequence.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json};
use serde_json::json;
use sqlx::PgPool;

fn offer() -> serde_json::Value {
    json!({ "type": "offer", "sdp": "v=0 offer-sdp" })
}

fn answer() -> serde_json::Value {
    json!({ "type": "answer", "sdp": "v=0 answer-sdp" })
}

// ---------------------------------------------------------------------------
// Test: full offer/answer/candidate exchange round trip
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn full_exchange_round_trip(pool: PgPool) {
    let app = common::build_test_app(pool);
    let base = "/api/v1/signaling/ada_lovelace";

    let response = post_json(app.clone(), &format!("{base}/offer"), offer()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(app.clone(), &format!("{base}/answer"), answer()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(
        app.clone(),
        &format!("{base}/candidates"),
        json!({ "candidate": "candidate:1 1 udp 2122260223 192.0.2.1 54400 typ host" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(app, base).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["offer"]["sdp"], "v=0 offer-sdp");
    assert_eq!(json["data"]["answer"]["sdp"], "v=0 answer-sdp");
    assert_eq!(json["data"]["candidates"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: an answer with no offer on the table conflicts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn answer_without_offer_conflicts(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/signaling/ada_lovelace/answer",
        answer(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Test: a fresh app instance has no exchange state
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn state_does_not_leak_across_app_instances(pool: PgPool) {
    let base = "/api/v1/signaling/ada_lovelace";

    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("{base}/offer"),
        offer(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // A separate app holds a separate table: the offer is not there,
    // so the answer is rejected.
    let response = post_json(
        common::build_test_app(pool),
        &format!("{base}/answer"),
        answer(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Test: the answer slot is write-once per exchange
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_answer_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let base = "/api/v1/signaling/ada_lovelace";

    let response = post_json(app.clone(), &format!("{base}/offer"), offer()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(app.clone(), &format!("{base}/answer"), answer()).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_json(app, &format!("{base}/answer"), answer()).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Test: an identifier with no exchange reads as empty
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_exchange_reads_empty(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/signaling/nobody").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["offer"], serde_json::Value::Null);
    assert_eq!(json["data"]["answer"], serde_json::Value::Null);
    assert_eq!(json["data"]["candidates"], json!([]));
}
