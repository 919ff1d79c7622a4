//! Deadline enforcement for proctored sessions.
//!
//! The deadline is an absolute timestamp on the session row; this task
//! is what makes it bite. On a fixed interval it collects sessions past
//! their deadline that have not submitted and runs each through the
//! same transactional submission path the manual handler uses, flagged
//! as auto-submitted. The shared gate means a manual submit landing
//! between the query and the sweep simply wins; the sweeper's attempt
//! rolls back and is skipped.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use invigil_core::error::CoreError;
use invigil_db::repositories::ExamSessionRepo;
use invigil_db::DbPool;
use invigil_presence::{PresenceRegistry, SignalingTable};
use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::handlers::sessions::finalize_submission;

/// How often expired sessions are swept.
const SWEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Run the deadline sweep loop until `cancel` is triggered.
pub async fn run(
    pool: DbPool,
    presence: Arc<PresenceRegistry>,
    signaling: Arc<SignalingTable>,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Deadline sweeper started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Deadline sweeper stopping");
                break;
            }
            _ = interval.tick() => {
                match sweep_once(&pool, &presence, &signaling).await {
                    Ok(submitted) if submitted > 0 => {
                        tracing::info!(submitted, "Deadline sweep: auto-submitted sessions");
                    }
                    Ok(_) => {
                        tracing::trace!("Deadline sweep: nothing due");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Deadline sweep failed");
                    }
                }
            }
        }
    }
}

/// One sweep pass: auto-submit every expired, unsubmitted session.
///
/// Returns how many sessions this pass submitted. Per-session failures
/// are logged and skipped so one bad row cannot stall the rest; a
/// session that lost the gate to a concurrent manual submit is not an
/// error.
pub async fn sweep_once(
    pool: &DbPool,
    presence: &PresenceRegistry,
    signaling: &SignalingTable,
) -> Result<usize, AppError> {
    let due = ExamSessionRepo::list_expired_unsubmitted(pool, Utc::now()).await?;

    let mut submitted = 0;
    for session in due {
        match finalize_submission(pool, presence, signaling, &session, true).await {
            Ok(_) => submitted += 1,
            Err(AppError::Core(CoreError::AlreadySubmitted(_))) => {
                tracing::debug!(
                    session_id = session.id,
                    "Deadline sweep: manual submit won the race"
                );
            }
            Err(e) => {
                tracing::error!(
                    session_id = session.id,
                    error = %e,
                    "Deadline sweep: auto-submit failed"
                );
            }
        }
    }
    Ok(submitted)
}
