//! Live presence registry.
//!
//! A presence entry exists exactly while a candidate's camera session
//! is active. Registration hands back a [`PresenceGuard`]; whoever owns
//! the candidate's connection holds the guard, and the entry is removed
//! when the guard drops, whether by orderly teardown or because the
//! connection task died with the socket. No explicit deregistration
//! call is required from the candidate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;

use crate::subscription::Subscription;

/// Buffer capacity for the presence change channel.
const CHANGE_CAPACITY: usize = 256;

/// An active candidate camera session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceEntry {
    /// Normalized candidate identifier (the cross-system join key).
    pub safe_name: String,
    /// Candidate display name as entered.
    pub name: String,
    /// Session status; currently always `"live"`.
    pub status: String,
    /// When the camera session became active (UTC).
    pub started_at: DateTime<Utc>,
    /// Registration generation, used so a stale guard cannot remove a
    /// replacement entry for the same identifier.
    #[serde(skip)]
    token: u64,
}

/// A change observed on the registry.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PresenceChange {
    Joined { entry: PresenceEntry },
    Left { safe_name: String },
}

type Entries = Arc<RwLock<HashMap<String, PresenceEntry>>>;

/// Registry of all currently live candidate sessions.
///
/// Interior locking uses `std::sync::RwLock`: map operations are brief,
/// never held across an `.await`, and must be callable from `Drop`.
pub struct PresenceRegistry {
    entries: Entries,
    changes: broadcast::Sender<PresenceChange>,
    next_token: AtomicU64,
}

impl PresenceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            changes,
            next_token: AtomicU64::new(1),
        }
    }

    /// Announce a live session and return its removal guard.
    ///
    /// Registering an identifier that is already present replaces the
    /// prior entry (the two-tabs-same-name case); the replaced entry's
    /// guard becomes inert rather than removing the newcomer.
    pub fn register(&self, safe_name: &str, display_name: &str) -> PresenceGuard {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let entry = PresenceEntry {
            safe_name: safe_name.to_string(),
            name: display_name.to_string(),
            status: "live".to_string(),
            started_at: Utc::now(),
            token,
        };

        {
            let mut entries = self.entries.write().expect("presence lock poisoned");
            entries.insert(safe_name.to_string(), entry.clone());
        }
        // A SendError only means there are zero receivers right now.
        let _ = self.changes.send(PresenceChange::Joined { entry });
        tracing::debug!(safe_name, "Presence registered");

        PresenceGuard {
            entries: Arc::clone(&self.entries),
            changes: self.changes.clone(),
            safe_name: safe_name.to_string(),
            token,
        }
    }

    /// Explicitly remove an entry (orderly teardown, e.g. submission).
    ///
    /// Returns `true` if an entry was removed. The session's guard is
    /// left inert afterwards, so no duplicate `Left` event is emitted
    /// when it later drops.
    pub fn remove(&self, safe_name: &str) -> bool {
        let removed = {
            let mut entries = self.entries.write().expect("presence lock poisoned");
            entries.remove(safe_name).is_some()
        };
        if removed {
            let _ = self.changes.send(PresenceChange::Left {
                safe_name: safe_name.to_string(),
            });
            tracing::debug!(safe_name, "Presence removed");
        }
        removed
    }

    /// Whether an identifier is currently live.
    pub fn contains(&self, safe_name: &str) -> bool {
        self.entries
            .read()
            .expect("presence lock poisoned")
            .contains_key(safe_name)
    }

    /// Snapshot of all live entries.
    pub fn list(&self) -> Vec<PresenceEntry> {
        let mut entries: Vec<_> = self
            .entries
            .read()
            .expect("presence lock poisoned")
            .values()
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.safe_name.cmp(&b.safe_name));
        entries
    }

    /// Subscribe to registry changes.
    pub fn subscribe(&self) -> Subscription<PresenceChange> {
        Subscription::new(self.changes.subscribe())
    }
}

impl Default for PresenceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Removal guard for one registration.
///
/// Dropping the guard removes the entry it created (if it is still the
/// current one) and emits `PresenceChange::Left`. This is what makes
/// presence self-heal on abrupt disconnects: the connection task owns
/// the guard, so the entry cannot outlive the connection.
pub struct PresenceGuard {
    entries: Entries,
    changes: broadcast::Sender<PresenceChange>,
    safe_name: String,
    token: u64,
}

impl PresenceGuard {
    /// The identifier this guard covers.
    pub fn safe_name(&self) -> &str {
        &self.safe_name
    }
}

impl Drop for PresenceGuard {
    fn drop(&mut self) {
        let removed = {
            let mut entries = self.entries.write().expect("presence lock poisoned");
            match entries.get(&self.safe_name) {
                Some(entry) if entry.token == self.token => {
                    entries.remove(&self.safe_name);
                    true
                }
                _ => false,
            }
        };
        if removed {
            let _ = self.changes.send(PresenceChange::Left {
                safe_name: self.safe_name.clone(),
            });
            tracing::debug!(safe_name = %self.safe_name, "Presence dropped with connection");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn register_and_list() {
        let registry = PresenceRegistry::new();
        let _guard = registry.register("john_doe", "John Doe");

        let entries = registry.list();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].safe_name, "john_doe");
        assert_eq!(entries[0].name, "John Doe");
        assert_eq!(entries[0].status, "live");
    }

    #[test]
    fn dropping_guard_removes_entry() {
        let registry = PresenceRegistry::new();
        {
            let _guard = registry.register("john_doe", "John Doe");
            assert!(registry.contains("john_doe"));
        }
        // Guard dropped: entry must be gone without any explicit call.
        assert!(!registry.contains("john_doe"));
        assert!(registry.list().is_empty());
    }

    #[test]
    fn replacement_survives_stale_guard_drop() {
        let registry = PresenceRegistry::new();
        let first = registry.register("jane", "Jane");
        let second = registry.register("jane", "Jane");

        // The first tab's guard dropping must not evict the second tab.
        drop(first);
        assert!(registry.contains("jane"));

        drop(second);
        assert!(!registry.contains("jane"));
    }

    #[test]
    fn explicit_remove_makes_guard_inert() {
        let registry = PresenceRegistry::new();
        let mut sub = registry.subscribe();
        let guard = registry.register("jane", "Jane");

        assert!(registry.remove("jane"));
        drop(guard);

        // Exactly one Joined and one Left, no duplicate from the drop.
        assert_matches!(sub.try_recv(), Ok(PresenceChange::Joined { .. }));
        assert_matches!(sub.try_recv(), Ok(PresenceChange::Left { .. }));
        assert!(sub.try_recv().is_err());
    }

    #[tokio::test]
    async fn subscription_observes_join_and_leave() {
        let registry = PresenceRegistry::new();
        let mut sub = registry.subscribe();

        let guard = registry.register("ada", "Ada Lovelace");
        drop(guard);

        assert_matches!(
            sub.recv().await.unwrap(),
            PresenceChange::Joined { entry } if entry.safe_name == "ada"
        );
        assert_matches!(
            sub.recv().await.unwrap(),
            PresenceChange::Left { safe_name } if safe_name == "ada"
        );
    }
}
