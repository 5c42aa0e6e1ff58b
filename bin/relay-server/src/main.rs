//! Relay Webhook Server
//!
//! Registers webhook subscriptions and fans out notification and ping
//! deliveries to every subscriber. Serves the REST API plus Swagger UI
//! at /swagger-ui.
//!
//! Configuration comes from config.toml / relay.toml (see relay-config)
//! with RELAY_* environment variable overrides.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use relay_config::ConfigLoader;
use relay_dispatch::{
    api::create_router, Dispatcher, DispatcherConfig, HttpTransport, HttpTransportConfig,
};
use relay_registry::{Registry, SubscriptionStore};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for local development)
    let _ = dotenvy::dotenv();

    relay_common::logging::init_logging("relay-server");

    info!("Starting Relay Webhook Server");

    let config = ConfigLoader::new().load()?;

    // Subscription store + registry
    let store = Arc::new(SubscriptionStore::new());
    let registry = Registry::new(store.clone());

    // Delivery engine
    let transport = Arc::new(HttpTransport::with_config(HttpTransportConfig {
        timeout: Duration::from_secs(config.dispatch.request_timeout_seconds),
        connect_timeout: Duration::from_secs(config.dispatch.connect_timeout_seconds),
    }));
    let dispatcher = Arc::new(Dispatcher::with_config(
        store,
        transport,
        DispatcherConfig {
            attempt_timeout: Duration::from_secs(config.dispatch.attempt_timeout_seconds),
        },
    ));

    let app = create_router(registry, dispatcher)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr = format!("{}:{}", config.http.host, config.http.port);
    info!(addr = %addr, "Starting HTTP API server");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Relay Webhook Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received...");
}
