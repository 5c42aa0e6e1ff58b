//! Webhook delivery engine
//!
//! Fans out concurrent delivery attempts to every registered subscription
//! and settles every attempt into an outcome value, success or failure,
//! without letting one attempt affect its siblings. Also hosts the HTTP
//! API surface over the registry and dispatcher.

pub mod api;
mod dispatcher;
mod transport;

pub use dispatcher::{Dispatcher, DispatcherConfig, DEFAULT_PING_PAYLOAD};
pub use transport::{HttpTransport, HttpTransportConfig, Transport, TransportError};
