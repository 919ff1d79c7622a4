//! Invigil domain core.
//!
//! Pure domain logic shared by the database and API layers: shared
//! identifier types, the domain error taxonomy, candidate identifier
//! normalization, the interview time-slot enumeration, and exam
//! session policy (deadline anchoring and submission gating).
//!
//! This crate has no I/O; everything here is synchronous and testable
//! without a database or server.

pub mod error;
pub mod exam;
pub mod naming;
pub mod slots;
pub mod types;
