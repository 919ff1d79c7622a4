//! Repository for the `submissions` table.

use invigil_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::submission::{CreateSubmission, Submission};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, session_id, display_name, safe_name, answers, \
                       camera_verified, auto_submitted, submitted_at";

/// Final submission writes and reads. One row per attempt, enforced by
/// `uq_submissions_session`.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Insert the submission row inside the caller's transaction.
    ///
    /// Callers must have won the session's submitted gate in the same
    /// transaction; the unique constraint on `session_id` is the
    /// backstop against a double write.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateSubmission,
    ) -> Result<Submission, sqlx::Error> {
        let query = format!(
            "INSERT INTO submissions (session_id, display_name, safe_name, answers, \
                                      camera_verified, auto_submitted)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(input.session_id)
            .bind(&input.display_name)
            .bind(&input.safe_name)
            .bind(&input.answers)
            .bind(input.camera_verified)
            .bind(input.auto_submitted)
            .fetch_one(&mut **tx)
            .await
    }

    /// Fetch the submission for a session, if one was written.
    pub async fn find_by_session(
        pool: &PgPool,
        session_id: DbId,
    ) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM submissions WHERE session_id = $1");
        sqlx::query_as::<_, Submission>(&query)
            .bind(session_id)
            .fetch_optional(pool)
            .await
    }
}
