//! Final submission model and DTO.

use invigil_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `submissions` table.
///
/// Exactly one per exam attempt (unique on `session_id`), written by
/// either the manual or the automatic path and never mutated after.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: DbId,
    pub session_id: DbId,
    #[serde(rename = "name")]
    pub display_name: String,
    pub safe_name: String,
    /// Question key to free-text answer mapping.
    pub answers: serde_json::Value,
    pub camera_verified: bool,
    pub auto_submitted: bool,
    pub submitted_at: Timestamp,
}

/// DTO for inserting a submission.
pub struct CreateSubmission {
    pub session_id: DbId,
    pub display_name: String,
    pub safe_name: String,
    pub answers: serde_json::Value,
    pub camera_verified: bool,
    pub auto_submitted: bool,
}
