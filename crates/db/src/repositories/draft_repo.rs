//! Repository for the `answer_drafts` table.

use invigil_core::types::DbId;
use sqlx::PgPool;

use crate::models::draft::AnswerDraft;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, session_id, question_key, answer, updated_at";

/// Draft persistence: every answer edit is upserted keyed by question
/// so a reload restores in-progress work.
pub struct DraftRepo;

impl DraftRepo {
    /// Insert or update the draft for one question of one session.
    pub async fn upsert(
        pool: &PgPool,
        session_id: DbId,
        question_key: &str,
        answer: &str,
    ) -> Result<AnswerDraft, sqlx::Error> {
        let query = format!(
            "INSERT INTO answer_drafts (session_id, question_key, answer)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_answer_drafts_session_question
             DO UPDATE SET answer = EXCLUDED.answer, updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AnswerDraft>(&query)
            .bind(session_id)
            .bind(question_key)
            .bind(answer)
            .fetch_one(pool)
            .await
    }

    /// List all drafts for a session.
    pub async fn list_for_session(
        pool: &PgPool,
        session_id: DbId,
    ) -> Result<Vec<AnswerDraft>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM answer_drafts
             WHERE session_id = $1
             ORDER BY question_key"
        );
        sqlx::query_as::<_, AnswerDraft>(&query)
            .bind(session_id)
            .fetch_all(pool)
            .await
    }

    /// Assemble the question-to-answer map for a session, as stored on
    /// the final submission record.
    pub async fn answers_map(
        pool: &PgPool,
        session_id: DbId,
    ) -> Result<serde_json::Value, sqlx::Error> {
        let drafts = Self::list_for_session(pool, session_id).await?;
        let map: serde_json::Map<String, serde_json::Value> = drafts
            .into_iter()
            .map(|d| (d.question_key, serde_json::Value::String(d.answer)))
            .collect();
        Ok(serde_json::Value::Object(map))
    }

    /// Delete all drafts for a session. Returns the count removed.
    pub async fn clear_for_session(pool: &PgPool, session_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM answer_drafts WHERE session_id = $1")
            .bind(session_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
