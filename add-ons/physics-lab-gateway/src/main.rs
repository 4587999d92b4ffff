//! Physics Lab Gateway: serves the AI tutor chat relay.
//! The upstream API key stays here; the browser only ever talks to this process.

use std::sync::Arc;

use physics_lab_core::config::API_KEY_ENV;
use physics_lab_core::GatewayConfig;
use physics_lab_relay::{router, RelayState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Shipped config next to this crate's manifest, so `cargo run` works from any directory.
const DEFAULT_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/config/gateway");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[physics-lab-gateway] .env not loaded: {} (using system environment)", e);
    }

    // Keep the guard alive for the process lifetime so buffered file logs are flushed.
    let _log_guard = init_tracing();

    let config = GatewayConfig::load(DEFAULT_CONFIG)?;
    let api_key = GatewayConfig::api_key_from_env();
    if api_key.is_none() {
        tracing::warn!(
            target: "physics_lab::gateway",
            "{} is not set; chat requests will fail with a configuration error",
            API_KEY_ENV
        );
    }

    let state = Arc::new(RelayState::from_gateway(&config, api_key));
    let app = router(state, &config.route);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(
        target: "physics_lab::gateway",
        addr = %config.bind_addr,
        route = %config.route,
        model = %config.model,
        version = physics_lab_core::version(),
        "Physics Lab gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Console logging filtered by `RUST_LOG` (default `info`); daily-rolling file logs
/// when `PHYSICS_LAB_LOG_DIR` is set.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let (file_layer, guard) = match std::env::var("PHYSICS_LAB_LOG_DIR") {
        Ok(dir) if !dir.trim().is_empty() => {
            let appender = tracing_appender::rolling::daily(dir.trim(), "physics-lab-gateway.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    guard
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(target: "physics_lab::gateway", error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!(target: "physics_lab::gateway", "shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_config_resolves_independent_of_working_dir() {
        let file = std::path::Path::new(DEFAULT_CONFIG).with_extension("toml");
        assert!(file.is_absolute());
        assert!(file.exists(), "{} missing", file.display());

        let cfg = GatewayConfig::load_from(DEFAULT_CONFIG).unwrap();
        assert_eq!(cfg.route, physics_lab_core::config::DEFAULT_ROUTE);
        assert_eq!(cfg.model, physics_lab_core::config::DEFAULT_MODEL);
    }
}
