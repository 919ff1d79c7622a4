//! WebSocket infrastructure for real-time proctoring.
//!
//! Two socket surfaces, both push-only (writes go through HTTP):
//!
//! - the candidate live channel, which owns the session's
//!   `PresenceGuard` so presence self-heals when the connection ends;
//! - the monitor feed, which streams presence and signaling changes.

mod candidate;
mod monitor;

pub use candidate::candidate_ws;
pub use monitor::monitor_ws;

use std::time::Duration;

/// Interval between heartbeat pings on every socket.
pub(crate) const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
