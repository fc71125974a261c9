//! One-shot fetch pass: run the pipeline with the current config and print
//! the digest to stdout. Useful from cron or a shell, no HTTP involved.

use newswatch::config::DashboardConfig;
use newswatch::ingest::{self, rss::RssProvider, types::FeedProvider, FetchConfig};
use newswatch::source_weights::SourceWeights;
use newswatch::store::FileStore;
use newswatch::summary;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("newswatch=info,warn")),
        )
        .compact()
        .init();

    let config = DashboardConfig::load_default();
    let weights = SourceWeights::load_from_file("config/source_weights.json");
    let store = FileStore::new(config.state_dir.clone());

    let fetch_cfg = FetchConfig::from_dashboard(&config);
    let providers: Vec<Box<dyn FeedProvider>> = config
        .feed_urls()
        .into_iter()
        .map(|u| Box::new(RssProvider::from_url(u)) as Box<dyn FeedProvider>)
        .collect();

    let report = ingest::run_pass(&providers, &fetch_cfg, &weights, &store).await;
    tracing::info!(
        feeds_ok = report.feeds_ok,
        feeds_failed = report.feeds_failed,
        kept = report.items.len(),
        "fetch pass finished"
    );

    println!("{}", summary::build_summary(&report.items));
    Ok(())
}
