//! Exam session policy and submission gating.
//!
//! The deadline is an absolute timestamp anchored once when a session
//! starts; resuming a session never re-derives it, so a page reload
//! cannot extend the clock. The submission gate decides which of the
//! two mutually exclusive paths (manual or automatic) a session may
//! still take.

use chrono::Duration;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Default exam duration in minutes.
pub const DEFAULT_DURATION_MINS: i64 = 30;

/// Fixed-duration exam policy.
#[derive(Debug, Clone, Copy)]
pub struct ExamPolicy {
    /// Session length from start to deadline.
    pub duration: Duration,
}

impl ExamPolicy {
    /// Policy with an explicit duration in minutes.
    pub fn with_duration_mins(mins: i64) -> Self {
        Self {
            duration: Duration::minutes(mins),
        }
    }

    /// Compute the absolute deadline anchor for a session started at
    /// `started_at`.
    pub fn deadline_from(&self, started_at: Timestamp) -> Timestamp {
        started_at + self.duration
    }
}

impl Default for ExamPolicy {
    fn default() -> Self {
        Self::with_duration_mins(DEFAULT_DURATION_MINS)
    }
}

/// Observable phase of an exam session, derived from its persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Session exists but camera access has not been verified.
    CameraPending,
    /// Camera verified, deadline running, no submission yet.
    Live,
    /// Submission written (either path); the session is closed.
    Closed,
}

/// Derive the session phase from row state.
pub fn session_phase(camera_verified: bool, submitted: bool) -> SessionPhase {
    if submitted {
        SessionPhase::Closed
    } else if camera_verified {
        SessionPhase::Live
    } else {
        SessionPhase::CameraPending
    }
}

/// Check whether a manual submission may proceed.
///
/// Manual submission requires a non-empty display name and a verified
/// camera; a session that already submitted (by either path) may not
/// submit again. The deadline is deliberately NOT checked here: a
/// manual submit that lands before the sweeper claims the session is
/// honoured, and the database gate resolves the race.
pub fn check_manual_submit(
    display_name: &str,
    camera_verified: bool,
    submitted: bool,
) -> Result<(), CoreError> {
    if display_name.trim().is_empty() {
        return Err(CoreError::Validation("display name is required".into()));
    }
    if !camera_verified {
        return Err(CoreError::CameraRequired(
            "manual submission requires an active camera".into(),
        ));
    }
    if submitted {
        return Err(CoreError::Conflict("session already submitted".into()));
    }
    Ok(())
}

/// Whether a session is past its deadline and still eligible for the
/// automatic submission path.
pub fn auto_submit_due(deadline_at: Timestamp, submitted: bool, now: Timestamp) -> bool {
    !submitted && now >= deadline_at
}
