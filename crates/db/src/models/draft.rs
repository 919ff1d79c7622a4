//! Answer draft model.

use invigil_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `answer_drafts` table: one in-progress answer for one
/// question of one session. Upserted on every edit so a reload restores
/// drafted work.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDraft {
    pub id: DbId,
    pub session_id: DbId,
    pub question_key: String,
    pub answer: String,
    pub updated_at: Timestamp,
}
