//! Registry - validated mutations over the subscription store

use std::sync::Arc;

use relay_common::{RelayError, Result, Subscription};
use tracing::info;

use crate::SubscriptionStore;

/// Translates external register/unregister requests into store mutations.
///
/// Validation happens here, before any mutation: a rejected request leaves
/// the store untouched.
#[derive(Clone)]
pub struct Registry {
    store: Arc<SubscriptionStore>,
}

impl Registry {
    pub fn new(store: Arc<SubscriptionStore>) -> Self {
        Self { store }
    }

    /// Register a webhook for the given events.
    ///
    /// `url` must be present and non-empty. `events` must be present, but an
    /// empty list is valid and means "no event filter" (deliver once per
    /// dispatch, unconditionally). Duplicate urls append a second
    /// independent entry.
    pub fn register(
        &self,
        url: Option<String>,
        events: Option<Vec<String>>,
        description: Option<String>,
    ) -> Result<Subscription> {
        let url = url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| RelayError::validation("Invalid input: URL and events are required"))?;
        let events = events
            .ok_or_else(|| RelayError::validation("Invalid input: URL and events are required"))?;

        let subscription = Subscription::new(url, events, description);

        info!(
            url = %subscription.url,
            events = ?subscription.events,
            subscription_id = %subscription.id,
            "Webhook registered"
        );

        self.store.add(subscription.clone());
        Ok(subscription)
    }

    /// Unregister every webhook matching `url`.
    ///
    /// Idempotent: a url that was never registered removes nothing and still
    /// succeeds with a count of 0.
    pub fn unregister(&self, url: Option<String>) -> Result<usize> {
        let url = url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| RelayError::validation("URL is required"))?;

        let removed = self.store.remove_by_url(&url);

        info!(url = %url, removed = removed, "Webhook unregistered");
        Ok(removed)
    }

    /// Current subscriptions in insertion order.
    pub fn list(&self) -> Vec<Subscription> {
        self.store.snapshot()
    }
}
