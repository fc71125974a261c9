// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

/// Raw feed entry before scoring. Entries without a link are dropped at the
/// ingestion boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedEntry {
    pub title: String,
    pub summary: String,
    pub link: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

/// Transport seam: owns HTTP, TLS, and malformed-feed concerns. A provider
/// error covers one feed only; the pass isolates it.
#[async_trait::async_trait]
pub trait FeedProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<FeedEntry>>;
    /// Feed URL; doubles as the item `source` attribution.
    fn url(&self) -> &str;
}
