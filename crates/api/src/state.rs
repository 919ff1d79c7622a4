use std::sync::Arc;

use invigil_presence::{PresenceRegistry, SignalingTable};

use crate::config::ServerConfig;
use crate::notifier::Notifier;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// All shared services are explicit handles constructed once in
/// `main.rs` and carried here; nothing reaches for module-level
/// globals. This is cheaply cloneable (inner data is behind `Arc` or is
/// already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: invigil_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Live presence registry (candidate camera sessions).
    pub presence: Arc<PresenceRegistry>,
    /// Signaling exchange table (monitor video pull setup).
    pub signaling: Arc<SignalingTable>,
    /// Best-effort email notifier.
    pub notifier: Arc<Notifier>,
}
