//! Repository for the `exam_sessions` table.

use invigil_core::types::{DbId, Timestamp};
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::exam_session::{ExamSession, StartSession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, safe_name, display_name, deadline_at, camera_verified, \
                       submitted, created_at, updated_at";

/// Session lifecycle operations.
pub struct ExamSessionRepo;

impl ExamSessionRepo {
    /// Insert a new session with its deadline anchor, returning the row.
    pub async fn start(pool: &PgPool, input: &StartSession) -> Result<ExamSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO exam_sessions (safe_name, display_name, deadline_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ExamSession>(&query)
            .bind(&input.safe_name)
            .bind(&input.display_name)
            .bind(input.deadline_at)
            .fetch_one(pool)
            .await
    }

    /// Find the newest unsubmitted session for a candidate identifier.
    ///
    /// This is the resume path: a reload re-attaches to the existing
    /// session and inherits its original deadline anchor.
    pub async fn find_active_by_safe_name(
        pool: &PgPool,
        safe_name: &str,
    ) -> Result<Option<ExamSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM exam_sessions
             WHERE safe_name = $1 AND submitted = FALSE
             ORDER BY created_at DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, ExamSession>(&query)
            .bind(safe_name)
            .fetch_optional(pool)
            .await
    }

    /// Fetch a session by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ExamSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM exam_sessions WHERE id = $1");
        sqlx::query_as::<_, ExamSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Record the current camera state. Returns the updated row, or
    /// `None` if the session does not exist or has already submitted;
    /// a closed attempt is immutable.
    pub async fn set_camera_verified(
        pool: &PgPool,
        id: DbId,
        verified: bool,
    ) -> Result<Option<ExamSession>, sqlx::Error> {
        let query = format!(
            "UPDATE exam_sessions
             SET camera_verified = $2, updated_at = NOW()
             WHERE id = $1 AND submitted = FALSE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ExamSession>(&query)
            .bind(id)
            .bind(verified)
            .fetch_optional(pool)
            .await
    }

    /// Flip the submitted gate for a session.
    ///
    /// Returns `true` if this call won the gate (the row was still
    /// unsubmitted), `false` if some other path already claimed it.
    /// Both the manual handler and the deadline sweeper go through this
    /// update inside their submission transaction, which is what makes
    /// the two paths mutually exclusive.
    pub async fn mark_submitted(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE exam_sessions
             SET submitted = TRUE, updated_at = NOW()
             WHERE id = $1 AND submitted = FALSE",
        )
        .bind(id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List sessions whose deadline has passed without a submission.
    pub async fn list_expired_unsubmitted(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<Vec<ExamSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM exam_sessions
             WHERE submitted = FALSE AND deadline_at <= $1
             ORDER BY deadline_at"
        );
        sqlx::query_as::<_, ExamSession>(&query)
            .bind(now)
            .fetch_all(pool)
            .await
    }
}
