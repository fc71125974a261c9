// src/ingest/mod.rs
pub mod rss;
pub mod types;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::rank;
use crate::scoring::{self, ScoredItem};
use crate::source_weights::SourceWeights;
use crate::store::seen::SeenSet;
use crate::store::StateStore;
use types::{FeedEntry, FeedProvider};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("fetch_feeds_total", "Feeds attempted across all passes.");
        describe_counter!("fetch_feed_errors_total", "Feed fetch/parse errors.");
        describe_counter!("fetch_entries_total", "Entries parsed from feeds.");
        describe_counter!("fetch_kept_total", "Items kept after scoring and threshold.");
        describe_counter!("fetch_seen_skipped_total", "Entries suppressed by the seen set.");
        describe_histogram!("fetch_parse_ms", "Feed parse time in milliseconds.");
        describe_gauge!("fetch_last_run_ts", "Unix ts when a fetch pass last ran.");
    });
}

/// Knobs for one fetch pass.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub watchlist: Vec<String>,
    pub score_threshold: i32,
    pub per_feed_cap: usize,
    pub incremental: bool,
}

impl FetchConfig {
    pub fn from_dashboard(cfg: &DashboardConfig) -> Self {
        Self {
            watchlist: cfg.watchlist_terms(),
            score_threshold: cfg.score_threshold,
            per_feed_cap: cfg.per_feed_cap,
            incremental: cfg.incremental,
        }
    }
}

/// Result of one pass: the ranked items plus skip accounting.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct FetchReport {
    pub items: Vec<ScoredItem>,
    pub feeds_ok: usize,
    pub feeds_failed: usize,
    pub inspected: usize,
    pub seen_skipped: usize,
    pub below_threshold: usize,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EntryCounts {
    pub inspected: usize,
    pub seen_skipped: usize,
    pub below_threshold: usize,
}

/// Score one feed's entries. Pure over its inputs; the seen set records
/// every inspected link when incremental mode is on, whether or not the
/// item clears the threshold.
pub fn process_entries(
    entries: Vec<FeedEntry>,
    source: &str,
    weight: f32,
    cfg: &FetchConfig,
    seen: &mut SeenSet,
) -> (Vec<ScoredItem>, EntryCounts) {
    let mut counts = EntryCounts::default();
    let mut kept = Vec::new();

    for entry in entries.into_iter().take(cfg.per_feed_cap) {
        // Malformed entry without an identity: skipped silently.
        let Some(link) = entry.link else { continue };
        counts.inspected += 1;

        if cfg.incremental {
            if seen.contains(&link) {
                counts.seen_skipped += 1;
                continue;
            }
            seen.add(&link);
        }

        let text = format!("{} {}", entry.title, entry.summary);
        let (raw, hits) = scoring::score_text(&text, &cfg.watchlist);
        let score = scoring::apply_weight(raw, weight);
        if score < cfg.score_threshold {
            counts.below_threshold += 1;
            continue;
        }

        kept.push(ScoredItem {
            title: entry.title,
            link,
            summary: entry.summary,
            published: entry.published,
            score,
            hits,
            source: source.to_string(),
        });
    }

    (kept, counts)
}

/// Run one fetch pass over the given providers. Feeds are processed
/// sequentially; a failing feed is logged and skipped without aborting the
/// rest. The caller owns persistence of the seen set.
pub async fn run_fetch(
    providers: &[Box<dyn FeedProvider>],
    cfg: &FetchConfig,
    weights: &SourceWeights,
    seen: &mut SeenSet,
) -> FetchReport {
    ensure_metrics_described();

    let mut report = FetchReport::default();
    let mut items = Vec::new();

    for p in providers {
        counter!("fetch_feeds_total").increment(1);
        let entries = match p.fetch_latest().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = ?e, feed = p.url(), "feed fetch failed, skipping");
                counter!("fetch_feed_errors_total").increment(1);
                report.feeds_failed += 1;
                continue;
            }
        };
        report.feeds_ok += 1;

        let weight = weights.weight_for_url(p.url());
        let (kept, counts) = process_entries(entries, p.url(), weight, cfg, seen);
        report.inspected += counts.inspected;
        report.seen_skipped += counts.seen_skipped;
        report.below_threshold += counts.below_threshold;
        items.extend(kept);
    }

    counter!("fetch_kept_total").increment(items.len() as u64);
    counter!("fetch_seen_skipped_total").increment(report.seen_skipped as u64);
    gauge!("fetch_last_run_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

    rank::rank(&mut items);
    report.items = items;
    report
}

/// Full pass including seen-set persistence. With incremental mode off the
/// tracker is bypassed entirely and prior seen state is left untouched.
pub async fn run_pass(
    providers: &[Box<dyn FeedProvider>],
    cfg: &FetchConfig,
    weights: &SourceWeights,
    store: &dyn StateStore,
) -> FetchReport {
    let mut seen = if cfg.incremental {
        SeenSet::load(store)
    } else {
        SeenSet::default()
    };

    let report = run_fetch(providers, cfg, weights, &mut seen).await;

    if cfg.incremental {
        if let Err(e) = seen.save(store) {
            tracing::warn!(error = ?e, "seen-set save failed; previous state left intact");
        }
    }
    report
}
