//! Webhook subscription registry
//!
//! Holds the in-process set of registered webhooks and the validated
//! mutation operations over it. The store is deliberately not durable:
//! its lifetime is the process lifetime.

mod registry;
mod store;

pub use registry::Registry;
pub use store::SubscriptionStore;
