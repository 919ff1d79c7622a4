//! HTTP handler implementations, grouped by resource.

pub mod bookings;
pub mod health;
pub mod proctor;
pub mod sessions;
pub mod signaling;
