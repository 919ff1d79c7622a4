//! Exam session model and DTOs.

use invigil_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `exam_sessions` table.
///
/// `deadline_at` is the absolute deadline anchor, set once at session
/// start and never re-derived. `submitted` is the mutual-exclusion
/// gate between the manual and automatic submission paths.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamSession {
    pub id: DbId,
    pub safe_name: String,
    pub display_name: String,
    pub deadline_at: Timestamp,
    pub camera_verified: bool,
    pub submitted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for starting a new exam session.
pub struct StartSession {
    pub safe_name: String,
    pub display_name: String,
    pub deadline_at: Timestamp,
}
