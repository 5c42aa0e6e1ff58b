//! In-memory subscription store
//!
//! Insertion-ordered set of subscriptions with copy-on-read snapshots.
//! Mutations take the write lock, so concurrent register/unregister calls
//! are mutually exclusive; a dispatch iterating a snapshot never observes
//! a half-mutated set.

use parking_lot::RwLock;
use relay_common::Subscription;

/// Holds the current set of subscriptions.
///
/// Duplicate urls are accepted as independent entries; removal is by url
/// and takes out every matching entry.
#[derive(Debug, Default)]
pub struct SubscriptionStore {
    inner: RwLock<Vec<Subscription>>,
}

impl SubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a subscription. Never rejects on duplicate url.
    pub fn add(&self, subscription: Subscription) {
        self.inner.write().push(subscription);
    }

    /// Remove every subscription whose url equals `url`.
    ///
    /// Returns the number of entries removed; 0 is a valid outcome.
    pub fn remove_by_url(&self, url: &str) -> usize {
        let mut entries = self.inner.write();
        let before = entries.len();
        entries.retain(|s| s.url != url);
        before - entries.len()
    }

    /// Immutable insertion-ordered view of the current set.
    pub fn snapshot(&self) -> Vec<Subscription> {
        self.inner.read().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
