//! Invigil presence and signaling infrastructure.
//!
//! This crate is the low-latency broadcast side of the proctoring
//! system:
//!
//! - [`PresenceRegistry`]: ephemeral "this candidate's camera session
//!   is live" records, removed automatically when the owning connection
//!   ends via [`PresenceGuard`].
//! - [`SignalingTable`]: per-candidate offer/answer/candidate exchange
//!   used to establish the monitor's one-way video pull.
//! - [`Subscription`]: cancellable change-feed handle shared by both.
//!
//! Both structures are in-process maps with `tokio::sync::broadcast`
//! fan-out of change events; WebSocket handlers in the API crate turn
//! those events into client push.

pub mod registry;
pub mod signaling;
pub mod subscription;

pub use registry::{PresenceChange, PresenceEntry, PresenceGuard, PresenceRegistry};
pub use signaling::{
    Exchange, IceCandidate, SessionDescription, SignalingError, SignalingEvent, SignalingTable,
};
pub use subscription::Subscription;
