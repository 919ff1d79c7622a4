//! Row models and DTOs.

pub mod booking;
pub mod draft;
pub mod exam_session;
pub mod submission;
