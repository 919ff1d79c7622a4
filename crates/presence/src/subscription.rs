//! Cancellable change-feed subscriptions.

use tokio::sync::broadcast;

/// A live subscription to a change feed.
///
/// Wraps a `broadcast::Receiver`; events arrive in the order the
/// underlying channel delivers them, with no ordering guarantee across
/// independent keys. Dropping the subscription (or calling
/// [`cancel`](Subscription::cancel)) detaches it; the publisher is
/// never blocked by a slow or abandoned subscriber, which instead
/// observes [`broadcast::error::RecvError::Lagged`].
pub struct Subscription<T> {
    rx: broadcast::Receiver<T>,
}

impl<T: Clone> Subscription<T> {
    pub(crate) fn new(rx: broadcast::Receiver<T>) -> Self {
        Self { rx }
    }

    /// Receive the next change event.
    pub async fn recv(&mut self) -> Result<T, broadcast::error::RecvError> {
        self.rx.recv().await
    }

    /// Receive a change event if one is already buffered.
    pub fn try_recv(&mut self) -> Result<T, broadcast::error::TryRecvError> {
        self.rx.try_recv()
    }

    /// Explicitly end the subscription.
    ///
    /// Equivalent to dropping it; provided so call sites can make the
    /// teardown visible.
    pub fn cancel(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_in_publish_order() {
        let (tx, rx) = broadcast::channel(8);
        let mut sub = Subscription::new(rx);

        tx.send(1).unwrap();
        tx.send(2).unwrap();

        assert_eq!(sub.recv().await.unwrap(), 1);
        assert_eq!(sub.recv().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn cancel_detaches_receiver() {
        let (tx, rx) = broadcast::channel::<u8>(8);
        let sub = Subscription::new(rx);
        sub.cancel();
        // No receivers left: send reports zero deliveries.
        assert!(tx.send(1).is_err());
    }
}
