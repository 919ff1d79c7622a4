//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` (or an open transaction) as the first argument.

pub mod booking_repo;
pub mod draft_repo;
pub mod exam_session_repo;
pub mod submission_repo;

pub use booking_repo::{BookingRepo, ReserveError};
pub use draft_repo::DraftRepo;
pub use exam_session_repo::ExamSessionRepo;
pub use submission_repo::SubmissionRepo;
