//! loginsentry -- live dashboard for simulated login security alerts.
//!
//! This crate holds the alert model, the dashboard state machine, the
//! synthetic alert generator, and the HTTP layer that presents them.

pub mod alerts;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod generator;

use anyhow::{Context, Result};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::SentryConfig;
use crate::dashboard::{Dashboard, SharedDashboard};

/// Build the session's dashboard from the configured seed.
pub fn build_dashboard(config: &SentryConfig) -> Dashboard {
    let seed = alerts::seed::load(config.feed.seed_path.as_deref());
    Dashboard::from_seed(seed, config.feed.total_logins_baseline)
}

/// Start loginsentry: alert generator plus HTTP server, until Ctrl-C.
pub async fn serve(config: SentryConfig) -> Result<()> {
    config.validate()?;
    let dashboard = SharedDashboard::new(build_dashboard(&config));
    let period = config.generator.period();

    // Dropped on every exit path below, which stops the generator.
    let ticker = config
        .generator
        .enabled
        .then(|| generator::spawn(dashboard.clone(), period));

    let addr: std::net::SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.server.bind))?;
    let app = api::router(api::state::AppState {
        dashboard,
        refresh: period,
    })
    .layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%addr, "loginsentry listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(ticker) = ticker {
        let ticks = ticker.shutdown().await;
        tracing::info!(ticks, "generator shut down");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        // Without a signal handler, keep serving rather than exiting at once.
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
