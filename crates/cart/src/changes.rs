//! Cart change notifications (pub/sub).
//!
//! The store owns a [`ChangeFeed`]; views call `CartStore::subscribe` and
//! re-render when a [`CartChange`] arrives. Delivery is in publish order and
//! in-process only; a dropped subscription is pruned on the next publish.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;
use std::time::Duration;

use atlantmetal_core::{CartItemId, CatalogItemId};

/// What changed in the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartChange {
    Added {
        id: CartItemId,
        catalog_id: CatalogItemId,
    },
    Removed {
        id: CartItemId,
    },
    QuantityChanged {
        id: CartItemId,
        tons: f64,
    },
    Cleared,
    /// The cart was re-read from storage.
    Restored {
        lines: usize,
    },
}

/// A subscription to cart changes.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Everything published since the last call, without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Fan-out publisher.
#[derive(Debug)]
pub struct ChangeFeed<M> {
    subscribers: Mutex<Vec<Sender<M>>>,
}

impl<M> Default for ChangeFeed<M> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<M: Clone> ChangeFeed<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, message: M) {
        match self.subscribers.lock() {
            // Drop any dead subscribers while publishing.
            Ok(mut subs) => subs.retain(|tx| tx.send(message.clone()).is_ok()),
            Err(_) => tracing::warn!("cart change feed lock poisoned; notification dropped"),
        }
    }

    pub fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();

        // If the lock is poisoned we still hand out a subscription;
        // it just never receives anything.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_gets_every_message() {
        let feed = ChangeFeed::new();
        let a = feed.subscribe();
        let b = feed.subscribe();

        feed.publish(CartChange::Cleared);
        feed.publish(CartChange::Restored { lines: 2 });

        assert_eq!(a.drain(), vec![CartChange::Cleared, CartChange::Restored { lines: 2 }]);
        assert_eq!(b.drain(), vec![CartChange::Cleared, CartChange::Restored { lines: 2 }]);
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let feed: ChangeFeed<CartChange> = ChangeFeed::new();
        let kept = feed.subscribe();
        drop(feed.subscribe());
        assert_eq!(feed.subscriber_count(), 2);

        feed.publish(CartChange::Cleared);
        assert_eq!(feed.subscriber_count(), 1);
        assert_eq!(kept.try_recv().unwrap(), CartChange::Cleared);
    }

    #[test]
    fn blocking_receive_waits_for_another_thread() {
        let feed = std::sync::Arc::new(ChangeFeed::new());
        let sub = feed.subscribe();

        assert_eq!(
            sub.recv_timeout(Duration::from_millis(10)),
            Err(mpsc::RecvTimeoutError::Timeout)
        );

        let publisher = std::sync::Arc::clone(&feed);
        let handle = std::thread::spawn(move || {
            publisher.publish(CartChange::Restored { lines: 1 });
            publisher.publish(CartChange::Cleared);
        });

        assert_eq!(sub.recv().unwrap(), CartChange::Restored { lines: 1 });
        assert_eq!(
            sub.recv_timeout(Duration::from_secs(5)).unwrap(),
            CartChange::Cleared
        );
        handle.join().unwrap();

        drop(feed);
        assert!(sub.recv().is_err());
    }

    #[test]
    fn late_subscriber_misses_earlier_messages() {
        let feed = ChangeFeed::new();
        feed.publish(CartChange::Cleared);
        let late = feed.subscribe();
        assert!(late.try_recv().is_err());
    }
}
