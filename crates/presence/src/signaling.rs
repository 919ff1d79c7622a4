//! Offer/answer/candidate signaling exchange.
//!
//! One [`Exchange`] per candidate identifier, used by the monitor to
//! establish a one-way inbound video stream. The sender (candidate)
//! publishes an offer and connectivity candidates; the receiver
//! (monitor) publishes a single answer after observing the offer.
//!
//! There is no expiry: an exchange lives until `clear` is called at
//! session teardown. A session that never submits leaves its exchange
//! behind.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::subscription::Subscription;

/// Buffer capacity for the signaling change channel.
const CHANGE_CAPACITY: usize = 256;

/// A WebRTC-style session description (offer or answer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDescription {
    /// `"offer"` or `"answer"`.
    #[serde(rename = "type")]
    pub kind: String,
    pub sdp: String,
}

/// A connectivity hint discovered by the sender or receiver.
///
/// Candidates may arrive in any order and may repeat; consumers must
/// treat the list as an unordered multiset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub candidate: String,
    pub sdp_mid: Option<String>,
    pub sdp_m_line_index: Option<u32>,
}

/// The full signaling state for one candidate identifier.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exchange {
    pub offer: Option<SessionDescription>,
    pub answer: Option<SessionDescription>,
    pub candidates: Vec<IceCandidate>,
}

/// A change observed on the signaling table.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SignalingEvent {
    OfferPublished {
        safe_name: String,
        offer: SessionDescription,
    },
    AnswerPublished {
        safe_name: String,
        answer: SessionDescription,
    },
    CandidateAdded {
        safe_name: String,
        candidate: IceCandidate,
    },
    Cleared {
        safe_name: String,
    },
}

impl SignalingEvent {
    /// The candidate identifier the event concerns.
    pub fn safe_name(&self) -> &str {
        match self {
            SignalingEvent::OfferPublished { safe_name, .. }
            | SignalingEvent::AnswerPublished { safe_name, .. }
            | SignalingEvent::CandidateAdded { safe_name, .. }
            | SignalingEvent::Cleared { safe_name } => safe_name,
        }
    }
}

/// Errors from exchange writes.
#[derive(Debug, thiserror::Error)]
pub enum SignalingError {
    /// An answer was published before any offer existed.
    #[error("no offer published for {0}")]
    NoOffer(String),

    /// The exchange already has an answer; it is write-once.
    #[error("answer already published for {0}")]
    AnswerAlreadySet(String),
}

/// Table of all signaling exchanges, keyed by candidate identifier.
pub struct SignalingTable {
    exchanges: RwLock<HashMap<String, Exchange>>,
    changes: broadcast::Sender<SignalingEvent>,
}

impl SignalingTable {
    /// Create an empty table.
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            exchanges: RwLock::new(HashMap::new()),
            changes,
        }
    }

    /// Publish the sender's offer, installing a fresh exchange.
    ///
    /// A re-offer for the same identifier replaces the whole exchange
    /// (answer and candidates included): a new peer connection replaces,
    /// never duplicates, prior state.
    pub fn publish_offer(&self, safe_name: &str, offer: SessionDescription) {
        {
            let mut exchanges = self.exchanges.write().expect("signaling lock poisoned");
            exchanges.insert(
                safe_name.to_string(),
                Exchange {
                    offer: Some(offer.clone()),
                    answer: None,
                    candidates: Vec::new(),
                },
            );
        }
        let _ = self.changes.send(SignalingEvent::OfferPublished {
            safe_name: safe_name.to_string(),
            offer,
        });
        tracing::debug!(safe_name, "Signaling offer published");
    }

    /// Publish the receiver's answer.
    ///
    /// Requires an existing offer and rejects a second answer; the
    /// answer is written at most once per exchange.
    pub fn publish_answer(
        &self,
        safe_name: &str,
        answer: SessionDescription,
    ) -> Result<(), SignalingError> {
        {
            let mut exchanges = self.exchanges.write().expect("signaling lock poisoned");
            let exchange = exchanges
                .get_mut(safe_name)
                .filter(|e| e.offer.is_some())
                .ok_or_else(|| SignalingError::NoOffer(safe_name.to_string()))?;
            if exchange.answer.is_some() {
                return Err(SignalingError::AnswerAlreadySet(safe_name.to_string()));
            }
            exchange.answer = Some(answer.clone());
        }
        let _ = self.changes.send(SignalingEvent::AnswerPublished {
            safe_name: safe_name.to_string(),
            answer,
        });
        tracing::debug!(safe_name, "Signaling answer published");
        Ok(())
    }

    /// Append a connectivity candidate.
    ///
    /// Append-only and duplicate-tolerant; an exchange is created on
    /// demand so candidates racing ahead of the offer are not lost.
    pub fn add_candidate(&self, safe_name: &str, candidate: IceCandidate) {
        {
            let mut exchanges = self.exchanges.write().expect("signaling lock poisoned");
            exchanges
                .entry(safe_name.to_string())
                .or_default()
                .candidates
                .push(candidate.clone());
        }
        let _ = self.changes.send(SignalingEvent::CandidateAdded {
            safe_name: safe_name.to_string(),
            candidate,
        });
    }

    /// Current state of one exchange, if any.
    pub fn snapshot(&self, safe_name: &str) -> Option<Exchange> {
        self.exchanges
            .read()
            .expect("signaling lock poisoned")
            .get(safe_name)
            .cloned()
    }

    /// Remove an exchange at session teardown. Returns `true` if one
    /// existed.
    pub fn clear(&self, safe_name: &str) -> bool {
        let removed = {
            let mut exchanges = self.exchanges.write().expect("signaling lock poisoned");
            exchanges.remove(safe_name).is_some()
        };
        if removed {
            let _ = self.changes.send(SignalingEvent::Cleared {
                safe_name: safe_name.to_string(),
            });
            tracing::debug!(safe_name, "Signaling exchange cleared");
        }
        removed
    }

    /// Subscribe to table changes (all keys).
    pub fn subscribe(&self) -> Subscription<SignalingEvent> {
        Subscription::new(self.changes.subscribe())
    }
}

impl Default for SignalingTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn offer() -> SessionDescription {
        SessionDescription {
            kind: "offer".into(),
            sdp: "v=0 offer".into(),
        }
    }

    fn answer() -> SessionDescription {
        SessionDescription {
            kind: "answer".into(),
            sdp: "v=0 answer".into(),
        }
    }

    fn candidate(n: u32) -> IceCandidate {
        IceCandidate {
            candidate: format!("candidate:{n}"),
            sdp_mid: Some("0".into()),
            sdp_m_line_index: Some(0),
        }
    }

    #[test]
    fn answer_requires_offer() {
        let table = SignalingTable::new();
        assert_matches!(
            table.publish_answer("jane", answer()),
            Err(SignalingError::NoOffer(_))
        );
    }

    #[test]
    fn answer_is_write_once() {
        let table = SignalingTable::new();
        table.publish_offer("jane", offer());
        assert!(table.publish_answer("jane", answer()).is_ok());
        assert_matches!(
            table.publish_answer("jane", answer()),
            Err(SignalingError::AnswerAlreadySet(_))
        );
    }

    #[test]
    fn reoffer_replaces_exchange() {
        let table = SignalingTable::new();
        table.publish_offer("jane", offer());
        table.publish_answer("jane", answer()).unwrap();
        table.add_candidate("jane", candidate(1));

        // A fresh offer resets answer and candidates.
        table.publish_offer("jane", offer());
        let exchange = table.snapshot("jane").unwrap();
        assert!(exchange.answer.is_none());
        assert!(exchange.candidates.is_empty());
        // And the replacement exchange accepts a new answer.
        assert!(table.publish_answer("jane", answer()).is_ok());
    }

    #[test]
    fn candidates_append_and_tolerate_duplicates() {
        let table = SignalingTable::new();
        table.publish_offer("jane", offer());
        table.add_candidate("jane", candidate(1));
        table.add_candidate("jane", candidate(1));
        table.add_candidate("jane", candidate(2));

        let exchange = table.snapshot("jane").unwrap();
        assert_eq!(exchange.candidates.len(), 3);
    }

    #[test]
    fn fresh_offer_drops_early_candidates() {
        let table = SignalingTable::new();
        table.add_candidate("jane", candidate(1));
        table.publish_offer("jane", offer());

        // The offer replaces the exchange; the early candidate belongs
        // to the replaced peer connection and is intentionally dropped.
        let exchange = table.snapshot("jane").unwrap();
        assert!(exchange.candidates.is_empty());
    }

    #[test]
    fn clear_removes_exchange() {
        let table = SignalingTable::new();
        table.publish_offer("jane", offer());
        assert!(table.clear("jane"));
        assert!(table.snapshot("jane").is_none());
        assert!(!table.clear("jane"));
    }

    #[tokio::test]
    async fn subscription_sees_events_in_order() {
        let table = SignalingTable::new();
        let mut sub = table.subscribe();

        table.publish_offer("jane", offer());
        table.publish_answer("jane", answer()).unwrap();
        table.add_candidate("jane", candidate(1));
        table.clear("jane");

        assert_matches!(
            sub.recv().await.unwrap(),
            SignalingEvent::OfferPublished { .. }
        );
        assert_matches!(
            sub.recv().await.unwrap(),
            SignalingEvent::AnswerPublished { .. }
        );
        assert_matches!(
            sub.recv().await.unwrap(),
            SignalingEvent::CandidateAdded { .. }
        );
        assert_matches!(sub.recv().await.unwrap(), SignalingEvent::Cleared { .. });
    }
}
