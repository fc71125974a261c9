//! Watchlist scorer: containment hits become a raw score, then the source
//! weight is applied. Pure functions, deterministic for identical input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Points contributed by each matching watchlist term.
pub const HIT_POINTS: i32 = 15;
/// Upper bound for both the raw and the weighted score.
pub const SCORE_CAP: i32 = 100;

/// A feed entry that survived scoring. `link` doubles as the identity used
/// by the seen set and the archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub title: String,
    pub link: String,
    pub summary: String,
    pub published: Option<DateTime<Utc>>,
    pub score: i32,
    /// Matched watchlist terms, in watchlist order.
    pub hits: Vec<String>,
    /// Originating feed URL.
    pub source: String,
}

/// Case-insensitive containment test of each watchlist term against the text.
/// Unicode lowercasing keeps the folding stable across locales.
pub fn score_text(text: &str, watchlist: &[String]) -> (i32, Vec<String>) {
    let haystack = text.to_lowercase();
    let mut hits = Vec::new();
    for term in watchlist {
        let t = term.trim();
        if t.is_empty() {
            continue;
        }
        if haystack.contains(&t.to_lowercase()) {
            hits.push(term.clone());
        }
    }
    let raw = (hits.len() as i32 * HIT_POINTS).min(SCORE_CAP);
    (raw, hits)
}

/// `min(cap, round(raw * weight))`, floored at zero.
pub fn apply_weight(raw: i32, weight: f32) -> i32 {
    ((raw as f32 * weight).round() as i32).clamp(0, SCORE_CAP)
}
