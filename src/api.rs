//! HTTP surface over the pipeline. Any interactive frontend talks to these
//! routes; the core stays pure behind them.

use std::sync::{Arc, RwLock};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::config::DashboardConfig;
use crate::ingest::{self, rss::RssProvider, types::FeedProvider, FetchConfig, FetchReport};
use crate::rank::{self, ViewFilter};
use crate::scoring::ScoredItem;
use crate::source_weights::SourceWeights;
use crate::store::archive::{Archive, ArchiveEntry};
use crate::store::seen::SeenSet;
use crate::store::StateStore;
use crate::summary;

#[derive(Clone)]
pub struct AppState {
    config: Arc<RwLock<DashboardConfig>>,
    weights: Arc<RwLock<SourceWeights>>,
    store: Arc<dyn StateStore>,
    /// Result of the most recent fetch pass, served to the view routes.
    last: Arc<RwLock<Vec<ScoredItem>>>,
}

impl AppState {
    pub fn new(config: DashboardConfig, weights: SourceWeights, store: Arc<dyn StateStore>) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            weights: Arc::new(RwLock::new(weights)),
            store,
            last: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Seed the cached view directly. Embedders driving the pipeline
    /// themselves (and tests) use this instead of POST /fetch.
    pub fn replace_view(&self, items: Vec<ScoredItem>) {
        *self.last.write().expect("view rwlock poisoned") = items;
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/fetch", post(run_fetch_pass))
        .route("/items", get(list_items))
        .route("/summary", get(get_summary))
        .route("/archive", get(list_archive).post(archive_items))
        .route("/archive/clear", post(clear_archive))
        .route("/seen/reset", post(reset_seen))
        .route("/config", get(get_config).put(update_config))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn run_fetch_pass(State(state): State<AppState>) -> Json<FetchReport> {
    // Snapshot config and weights before awaiting; std locks must not be
    // held across await points.
    let (urls, fetch_cfg) = {
        let c = state.config.read().expect("config rwlock poisoned");
        (c.feed_urls(), FetchConfig::from_dashboard(&c))
    };
    let weights = state.weights.read().expect("weights rwlock poisoned").clone();

    let providers: Vec<Box<dyn FeedProvider>> = urls
        .into_iter()
        .map(|u| Box::new(RssProvider::from_url(u)) as Box<dyn FeedProvider>)
        .collect();

    let report = ingest::run_pass(&providers, &fetch_cfg, &weights, state.store.as_ref()).await;
    state.replace_view(report.items.clone());
    Json(report)
}

#[derive(Debug, Default, Deserialize)]
struct ViewQuery {
    #[serde(default)]
    min_score: i32,
    /// Comma-separated feed URLs.
    sources: Option<String>,
    q: Option<String>,
}

impl ViewQuery {
    fn to_filter(&self) -> ViewFilter {
        ViewFilter {
            min_score: self.min_score,
            sources: self
                .sources
                .as_deref()
                .map(|s| {
                    s.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            query: self.q.clone(),
        }
    }
}

async fn list_items(
    State(state): State<AppState>,
    Query(q): Query<ViewQuery>,
) -> Json<Vec<ScoredItem>> {
    let view = state.last.read().expect("view rwlock poisoned");
    Json(rank::apply_view_filter(&view, &q.to_filter()))
}

async fn get_summary(State(state): State<AppState>, Query(q): Query<ViewQuery>) -> String {
    let filtered = {
        let view = state.last.read().expect("view rwlock poisoned");
        rank::apply_view_filter(&view, &q.to_filter())
    };
    summary::build_summary(&filtered)
}

#[derive(Deserialize)]
struct ArchiveReq {
    links: Vec<String>,
}

#[derive(Serialize)]
struct ArchiveResp {
    added: usize,
    total: usize,
}

async fn archive_items(
    State(state): State<AppState>,
    Json(req): Json<ArchiveReq>,
) -> Result<Json<ArchiveResp>, (StatusCode, String)> {
    let selected: Vec<ScoredItem> = {
        let view = state.last.read().expect("view rwlock poisoned");
        view.iter()
            .filter(|it| req.links.iter().any(|l| l == &it.link))
            .cloned()
            .collect()
    };

    let mut archive = Archive::load(state.store.as_ref());
    let added = archive.append(&selected, chrono::Utc::now());
    archive.save(state.store.as_ref()).map_err(internal)?;

    Ok(Json(ArchiveResp {
        added,
        total: archive.entries().len(),
    }))
}

async fn list_archive(State(state): State<AppState>) -> Json<Vec<ArchiveEntry>> {
    Json(Archive::load(state.store.as_ref()).entries().to_vec())
}

async fn clear_archive(State(state): State<AppState>) -> Result<StatusCode, (StatusCode, String)> {
    Archive::clear(state.store.as_ref()).map_err(internal)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reset_seen(State(state): State<AppState>) -> Result<StatusCode, (StatusCode, String)> {
    SeenSet::reset(state.store.as_ref()).map_err(internal)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_config(State(state): State<AppState>) -> Json<DashboardConfig> {
    Json(state.config.read().expect("config rwlock poisoned").clone())
}

/// The editable subset; state paths and bind address stay boot-time only.
#[derive(Deserialize)]
struct ConfigUpdate {
    feeds: String,
    watchlist: String,
    score_threshold: i32,
    per_feed_cap: usize,
    incremental: bool,
}

async fn update_config(
    State(state): State<AppState>,
    Json(upd): Json<ConfigUpdate>,
) -> Json<DashboardConfig> {
    let mut c = state.config.write().expect("config rwlock poisoned");
    c.feeds = upd.feeds;
    c.watchlist = upd.watchlist;
    c.score_threshold = upd.score_threshold;
    c.per_feed_cap = upd.per_feed_cap;
    c.incremental = upd.incremental;
    Json(c.clone())
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))
}
