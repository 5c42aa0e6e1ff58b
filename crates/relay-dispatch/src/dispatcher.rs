//! Dispatcher - concurrent fan-out delivery with settle-all aggregation
//!
//! Each dispatch is a one-shot fan-out/fan-in over a snapshot of the
//! subscription store: one delivery attempt per (subscription, event) pair,
//! or exactly one attempt with no event when the subscription has no event
//! filter. Attempts run concurrently and every one of them resolves to an
//! outcome value; a failing or hanging endpoint never cancels, delays, or
//! drops a sibling attempt. No retries, no carry-over state between
//! dispatches.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use relay_common::{DeliveryOutcome, RelayError, Result};
use relay_registry::SubscriptionStore;
use serde_json::json;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::Transport;

/// Payload sent when the ping query carries no testPayload
pub const DEFAULT_PING_PAYLOAD: &str = "Default Ping Payload";

/// Dispatcher configuration
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Upper bound on a single delivery attempt. Layered over the transport
    /// so a hung endpoint cannot stall the whole dispatch.
    pub attempt_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(10),
        }
    }
}

/// One planned delivery attempt
struct Attempt {
    url: String,
    event: Option<String>,
    payload: serde_json::Value,
}

/// Fans out deliveries to every registered subscription.
pub struct Dispatcher {
    store: Arc<SubscriptionStore>,
    transport: Arc<dyn Transport>,
    config: DispatcherConfig,
}

impl Dispatcher {
    pub fn new(store: Arc<SubscriptionStore>, transport: Arc<dyn Transport>) -> Self {
        Self::with_config(store, transport, DispatcherConfig::default())
    }

    pub fn with_config(
        store: Arc<SubscriptionStore>,
        transport: Arc<dyn Transport>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            store,
            transport,
            config,
        }
    }

    /// Deliver a notification message to every subscription.
    ///
    /// Fails with a validation error on an empty or absent message before
    /// any delivery is attempted. Individual delivery failures are captured
    /// in the returned outcomes, never propagated.
    pub async fn notify(&self, message: Option<&str>) -> Result<Vec<DeliveryOutcome>> {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| RelayError::validation("Message is required"))?;

        let outcomes = self
            .dispatch(|event| match event {
                Some(event) => json!({ "message": message, "event": event }),
                None => json!({ "message": message }),
            })
            .await;

        info!(
            attempts = outcomes.len(),
            delivered = outcomes.iter().filter(|o| o.is_success()).count(),
            "Notification dispatched"
        );
        Ok(outcomes)
    }

    /// Ping every subscription with a test payload to check liveness.
    pub async fn ping(&self, test_payload: &str) -> Vec<DeliveryOutcome> {
        let outcomes = self
            .dispatch(|event| match event {
                Some(event) => json!({ "ping": test_payload, "event": event }),
                None => json!({ "ping": test_payload }),
            })
            .await;

        info!(
            attempts = outcomes.len(),
            delivered = outcomes.iter().filter(|o| o.is_success()).count(),
            "Ping dispatched"
        );
        outcomes
    }

    /// Fan out one attempt per (subscription, event) pair and settle all.
    async fn dispatch(
        &self,
        build_payload: impl Fn(Option<&str>) -> serde_json::Value,
    ) -> Vec<DeliveryOutcome> {
        // Snapshot first: concurrent register/unregister calls must not be
        // observed mid-dispatch.
        let snapshot = self.store.snapshot();

        let attempts: Vec<Attempt> = snapshot
            .iter()
            .flat_map(|sub| {
                sub.delivery_events().into_iter().map(|event| Attempt {
                    url: sub.url.clone(),
                    event: event.map(str::to_string),
                    payload: build_payload(event),
                })
            })
            .collect();

        debug!(
            subscriptions = snapshot.len(),
            attempts = attempts.len(),
            "Fanning out delivery attempts"
        );

        let futures = attempts.into_iter().map(|attempt| self.settle(attempt));
        join_all(futures).await
    }

    /// Run one attempt to completion, converting every failure into an
    /// outcome value.
    async fn settle(&self, attempt: Attempt) -> DeliveryOutcome {
        let Attempt { url, event, payload } = attempt;

        match timeout(
            self.config.attempt_timeout,
            self.transport.deliver(&url, &payload),
        )
        .await
        {
            Ok(Ok(status)) => {
                debug!(url = %url, event = ?event, status = status, "Delivery attempt completed");
                DeliveryOutcome::response(url, event, status)
            }
            Ok(Err(e)) => {
                warn!(url = %url, event = ?event, error = %e, "Delivery attempt failed");
                DeliveryOutcome::failure(url, event, e.to_string())
            }
            Err(_) => {
                warn!(
                    url = %url,
                    event = ?event,
                    timeout_secs = self.config.attempt_timeout.as_secs(),
                    "Delivery attempt timed out"
                );
                DeliveryOutcome::failure(url, event, "Delivery attempt timed out")
            }
        }
    }
}
