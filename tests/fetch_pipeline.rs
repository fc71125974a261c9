// tests/fetch_pipeline.rs
//
// End-to-end fetch passes over mock providers: scoring, ranking, per-feed
// failure isolation, and seen-set behavior across runs.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use newswatch::ingest::types::{FeedEntry, FeedProvider};
use newswatch::ingest::{run_pass, FetchConfig};
use newswatch::source_weights::SourceWeights;
use newswatch::store::seen::{SeenSet, SEEN_DOC};
use newswatch::store::{MemoryStore, StateStore};

struct MockFeed {
    url: String,
    entries: Vec<FeedEntry>,
    fail: bool,
}

impl MockFeed {
    fn ok(url: &str, entries: Vec<FeedEntry>) -> Box<dyn FeedProvider> {
        Box::new(Self {
            url: url.to_string(),
            entries,
            fail: false,
        })
    }

    fn broken(url: &str) -> Box<dyn FeedProvider> {
        Box::new(Self {
            url: url.to_string(),
            entries: vec![],
            fail: true,
        })
    }
}

#[async_trait]
impl FeedProvider for MockFeed {
    async fn fetch_latest(&self) -> Result<Vec<FeedEntry>> {
        if self.fail {
            return Err(anyhow!("connection refused"));
        }
        Ok(self.entries.clone())
    }

    fn url(&self) -> &str {
        &self.url
    }
}

fn entry(title: &str, link: &str, ts: i64) -> FeedEntry {
    FeedEntry {
        title: title.to_string(),
        summary: String::new(),
        link: Some(link.to_string()),
        published: Some(Utc.timestamp_opt(ts, 0).unwrap()),
    }
}

fn cfg(threshold: i32, incremental: bool) -> FetchConfig {
    FetchConfig {
        watchlist: vec!["rust".to_string(), "kernel".to_string()],
        score_threshold: threshold,
        per_feed_cap: 25,
        incremental,
    }
}

fn flat_weights() -> SourceWeights {
    SourceWeights {
        default_weight: 1.0,
        domains: Default::default(),
    }
}

#[tokio::test]
async fn pass_scores_and_ranks_items() {
    let store = MemoryStore::new();
    let providers = vec![MockFeed::ok(
        "https://a.example/rss",
        vec![
            entry("plain story", "https://a.example/1", 100),
            entry("rust release", "https://a.example/2", 200),
            entry("rust kernel driver", "https://a.example/3", 300),
        ],
    )];

    let report = run_pass(&providers, &cfg(10, false), &flat_weights(), &store).await;

    assert_eq!(report.feeds_ok, 1);
    assert_eq!(report.inspected, 3);
    assert_eq!(report.below_threshold, 1);
    let titles: Vec<&str> = report.items.iter().map(|it| it.title.as_str()).collect();
    assert_eq!(titles, vec!["rust kernel driver", "rust release"]);
    assert_eq!(report.items[0].score, 30);
    assert_eq!(report.items[0].source, "https://a.example/rss");
}

#[tokio::test]
async fn failing_feed_does_not_abort_the_pass() {
    let store = MemoryStore::new();
    let providers = vec![
        MockFeed::ok(
            "https://a.example/rss",
            vec![entry("rust a", "https://a.example/1", 100)],
        ),
        MockFeed::broken("https://down.example/rss"),
        MockFeed::ok(
            "https://b.example/rss",
            vec![entry("rust b", "https://b.example/1", 200)],
        ),
    ];

    let report = run_pass(&providers, &cfg(0, false), &flat_weights(), &store).await;

    assert_eq!(report.feeds_ok, 2);
    assert_eq!(report.feeds_failed, 1);
    assert_eq!(report.items.len(), 2);
}

#[tokio::test]
async fn incremental_pass_suppresses_links_on_rerun() {
    let store = MemoryStore::new();
    let providers = vec![MockFeed::ok(
        "https://a.example/rss",
        vec![
            entry("rust one", "https://a.example/1", 100),
            entry("rust two", "https://a.example/2", 200),
        ],
    )];
    let c = cfg(0, true);

    let first = run_pass(&providers, &c, &flat_weights(), &store).await;
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.seen_skipped, 0);

    let second = run_pass(&providers, &c, &flat_weights(), &store).await;
    assert!(second.items.is_empty());
    assert_eq!(second.seen_skipped, 2);
}

#[tokio::test]
async fn threshold_change_does_not_resurrect_inspected_links() {
    let store = MemoryStore::new();
    let providers = vec![MockFeed::ok(
        "https://a.example/rss",
        vec![entry("rust story", "https://a.example/1", 100)],
    )];

    // First pass with an unreachable threshold: item filtered, link recorded.
    let strict = run_pass(&providers, &cfg(100, true), &flat_weights(), &store).await;
    assert!(strict.items.is_empty());
    assert_eq!(strict.below_threshold, 1);

    // Lowering the threshold later does not bring the link back.
    let lenient = run_pass(&providers, &cfg(0, true), &flat_weights(), &store).await;
    assert!(lenient.items.is_empty());
    assert_eq!(lenient.seen_skipped, 1);
}

#[tokio::test]
async fn reset_makes_all_links_new_again() {
    let store = MemoryStore::new();
    let providers = vec![MockFeed::ok(
        "https://a.example/rss",
        vec![entry("rust story", "https://a.example/1", 100)],
    )];
    let c = cfg(0, true);

    run_pass(&providers, &c, &flat_weights(), &store).await;
    SeenSet::reset(&store).unwrap();

    let after_reset = run_pass(&providers, &c, &flat_weights(), &store).await;
    assert_eq!(after_reset.items.len(), 1);
    assert_eq!(after_reset.seen_skipped, 0);
}

#[tokio::test]
async fn non_incremental_pass_leaves_seen_state_alone() {
    let store = MemoryStore::new();

    // Pre-existing seen state from an earlier incremental run.
    let mut prior = SeenSet::default();
    prior.add("https://old.example/1");
    prior.save(&store).unwrap();
    let before = store.read(SEEN_DOC).unwrap().unwrap();

    let providers = vec![MockFeed::ok(
        "https://a.example/rss",
        vec![entry("rust story", "https://old.example/1", 100)],
    )];

    // Disabled incremental mode: the tracker is bypassed, not consulted...
    let report = run_pass(&providers, &cfg(0, false), &flat_weights(), &store).await;
    assert_eq!(report.items.len(), 1);
    assert_eq!(report.seen_skipped, 0);

    // ...and the persisted state is not touched.
    let after = store.read(SEEN_DOC).unwrap().unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn source_weight_scales_scores_per_feed() {
    let store = MemoryStore::new();
    let mut weights = flat_weights();
    weights.domains.insert("trusted.example".to_string(), 3.0);

    let providers = vec![
        MockFeed::ok(
            "https://trusted.example/rss",
            vec![entry("rust kernel news", "https://trusted.example/1", 100)],
        ),
        MockFeed::ok(
            "https://plain.example/rss",
            vec![entry("rust kernel news", "https://plain.example/1", 100)],
        ),
    ];

    let report = run_pass(&providers, &cfg(0, false), &flat_weights(), &store).await;
    assert!(report.items.iter().all(|it| it.score == 30));

    let weighted = run_pass(&providers, &cfg(0, false), &weights, &store).await;
    let trusted = weighted
        .items
        .iter()
        .find(|it| it.source.contains("trusted"))
        .unwrap();
    let plain = weighted
        .items
        .iter()
        .find(|it| it.source.contains("plain"))
        .unwrap();
    // raw 30 with weight 3.0 lands at 90, uncapped.
    assert_eq!(trusted.score, 90);
    assert_eq!(plain.score, 30);
    // And the weighted item ranks first.
    assert_eq!(weighted.items[0].source, "https://trusted.example/rss");
}
