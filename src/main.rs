//! newswatch — binary entrypoint.
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newswatch::api::{self, AppState};
use newswatch::config::DashboardConfig;
use newswatch::metrics::init_metrics;
use newswatch::source_weights::SourceWeights;
use newswatch::store::FileStore;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("newswatch=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = DashboardConfig::load_default();
    let weights = SourceWeights::load_from_file("config/source_weights.json");
    let store = Arc::new(FileStore::new(config.state_dir.clone()));

    let metrics_routes = init_metrics();

    let bind = config.bind_addr.clone();
    let state = AppState::new(config, weights, store);
    let app = api::router(state).merge(metrics_routes);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("binding {bind}"))?;
    tracing::info!(addr = %bind, "newswatch listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
