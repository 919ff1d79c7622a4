//! Handlers for proctored exam sessions.
//!
//! A session's source of truth is its database row: the deadline anchor
//! is written once at start, drafts are upserted per question, and the
//! `submitted` flag is the gate both submission paths must win inside a
//! transaction. [`finalize_submission`] is shared with the deadline
//! sweeper so the manual and automatic paths cannot diverge.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use invigil_core::error::CoreError;
use invigil_core::exam::{check_manual_submit, session_phase, SessionPhase};
use invigil_core::naming::safe_name;
use invigil_core::types::DbId;
use invigil_db::models::exam_session::{ExamSession, StartSession};
use invigil_db::models::submission::{CreateSubmission, Submission};
use invigil_db::repositories::{DraftRepo, ExamSessionRepo, SubmissionRepo};
use invigil_db::DbPool;
use invigil_presence::{PresenceRegistry, SignalingTable};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `POST /api/v1/sessions`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub display_name: String,
}

/// Full session view returned to the candidate client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    #[serde(flatten)]
    pub session: ExamSession,
    pub phase: SessionPhase,
    /// Question key to drafted answer mapping, restored on reload.
    pub answers: serde_json::Value,
    /// Whether this call resumed an existing session (same deadline
    /// anchor) instead of starting a fresh one.
    pub resumed: bool,
}

/// Body of `PUT /api/v1/sessions/{id}/answers/{question}`.
#[derive(Debug, Deserialize)]
pub struct SaveAnswerRequest {
    #[serde(default)]
    pub answer: String,
}

/// Body of `POST /api/v1/sessions/{id}/camera`.
#[derive(Debug, Deserialize)]
pub struct CameraRequest {
    pub verified: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/sessions
///
/// Start or resume an exam session for a display name. An unsubmitted
/// session for the same normalized identifier is resumed with its
/// original absolute deadline -- a reload never extends the clock. A
/// fresh attempt (no active session) gets a fresh deadline anchored at
/// now and starts with no drafts.
pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> AppResult<Json<SessionView>> {
    req.validate()
        .map_err(|_| AppError::Core(CoreError::Validation("display name is required".into())))?;

    let key = safe_name(&req.display_name);
    if key.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "display name must contain letters or digits".into(),
        )));
    }

    if let Some(session) = ExamSessionRepo::find_active_by_safe_name(&state.pool, &key).await? {
        let answers = DraftRepo::answers_map(&state.pool, session.id).await?;
        let phase = session_phase(session.camera_verified, session.submitted);
        return Ok(Json(SessionView {
            session,
            phase,
            answers,
            resumed: true,
        }));
    }

    let deadline_at = state.config.exam_policy().deadline_from(Utc::now());
    let session = ExamSessionRepo::start(
        &state.pool,
        &StartSession {
            safe_name: key,
            display_name: req.display_name.trim().to_string(),
            deadline_at,
        },
    )
    .await?;

    let phase = session_phase(session.camera_verified, session.submitted);
    Ok(Json(SessionView {
        session,
        phase,
        answers: serde_json::json!({}),
        resumed: false,
    }))
}

/// GET /api/v1/sessions/{id}
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<SessionView>> {
    let session = find_session(&state.pool, id).await?;
    let answers = DraftRepo::answers_map(&state.pool, id).await?;
    let phase = session_phase(session.camera_verified, session.submitted);
    Ok(Json(SessionView {
        session,
        phase,
        answers,
        resumed: false,
    }))
}

/// PUT /api/v1/sessions/{id}/answers/{question}
///
/// Persist one drafted answer. Rejected once the session has submitted
/// (by either path); a closed attempt is immutable.
pub async fn save_answer(
    State(state): State<AppState>,
    Path((id, question)): Path<(DbId, String)>,
    Json(req): Json<SaveAnswerRequest>,
) -> AppResult<Json<DataResponse<invigil_db::models::draft::AnswerDraft>>> {
    let session = find_session(&state.pool, id).await?;
    if session.submitted {
        return Err(AppError::Core(CoreError::AlreadySubmitted(id)));
    }

    let draft = DraftRepo::upsert(&state.pool, id, &question, &req.answer).await?;
    Ok(Json(DataResponse { data: draft }))
}

/// POST /api/v1/sessions/{id}/camera
///
/// Record the camera state reported by the client. Verification is what
/// unlocks manual submission; losing the camera re-locks it, while the
/// deadline keeps running either way. Rejected once the session has
/// submitted; a closed attempt is immutable.
pub async fn set_camera(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(req): Json<CameraRequest>,
) -> AppResult<Json<DataResponse<ExamSession>>> {
    let session = find_session(&state.pool, id).await?;
    if session.submitted {
        return Err(AppError::Core(CoreError::AlreadySubmitted(id)));
    }

    let session = ExamSessionRepo::set_camera_verified(&state.pool, id, req.verified)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id,
        }))?;
    Ok(Json(DataResponse { data: session }))
}

/// POST /api/v1/sessions/{id}/submit
///
/// Manual submission path. Requires a verified camera; rejected after
/// any prior submission. On success the drafted answers become the
/// write-once submission record and the session's presence and
/// signaling state are torn down.
pub async fn submit_session(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let session = find_session(&state.pool, id).await?;

    check_manual_submit(
        &session.display_name,
        session.camera_verified,
        session.submitted,
    )?;

    let submission = finalize_submission(
        &state.pool,
        &state.presence,
        &state.signaling,
        &session,
        false,
    )
    .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": submission,
    })))
}

// ---------------------------------------------------------------------------
// Shared submission path
// ---------------------------------------------------------------------------

/// Write the final submission for a session and tear down its live state.
///
/// Snapshot the drafts, then inside one transaction win the submitted
/// gate and insert the submission row. If the gate was already claimed
/// the whole transaction rolls back and `AlreadySubmitted` surfaces --
/// this is the mutual exclusion between the manual handler and the
/// deadline sweeper. Presence removal, signaling teardown, and draft
/// cleanup happen after commit; their failure cannot undo a submission.
pub async fn finalize_submission(
    pool: &DbPool,
    presence: &PresenceRegistry,
    signaling: &SignalingTable,
    session: &ExamSession,
    auto_submitted: bool,
) -> Result<Submission, AppError> {
    let answers = DraftRepo::answers_map(pool, session.id).await?;

    let mut tx = pool.begin().await?;
    if !ExamSessionRepo::mark_submitted(&mut tx, session.id).await? {
        return Err(AppError::Core(CoreError::AlreadySubmitted(session.id)));
    }
    let submission = SubmissionRepo::create(
        &mut tx,
        &CreateSubmission {
            session_id: session.id,
            display_name: session.display_name.clone(),
            safe_name: session.safe_name.clone(),
            answers,
            camera_verified: session.camera_verified,
            auto_submitted,
        },
    )
    .await?;
    tx.commit().await?;

    presence.remove(&session.safe_name);
    signaling.clear(&session.safe_name);
    if let Err(e) = DraftRepo::clear_for_session(pool, session.id).await {
        tracing::warn!(session_id = session.id, error = %e, "Draft cleanup failed");
    }

    tracing::info!(
        session_id = session.id,
        safe_name = %session.safe_name,
        auto_submitted,
        "Submission recorded"
    );
    Ok(submission)
}

/// Fetch a session or map its absence to 404.
async fn find_session(pool: &DbPool, id: DbId) -> Result<ExamSession, AppError> {
    ExamSessionRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id,
        }))
}
