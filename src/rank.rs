//! Threshold filtering, ranking, and post-fetch view narrowing.

use std::cmp::Reverse;

use serde::Deserialize;

use crate::scoring::ScoredItem;

/// Sort by `(score desc, published desc)`. Items without a timestamp rank
/// least-recent. Stable, so equal keys keep their incoming order.
pub fn rank(items: &mut [ScoredItem]) {
    items.sort_by_key(|it| (Reverse(it.score), Reverse(it.published)));
}

/// Drop items below the threshold, then rank the rest.
pub fn filter_and_rank(mut items: Vec<ScoredItem>, threshold: i32) -> Vec<ScoredItem> {
    items.retain(|it| it.score >= threshold);
    rank(&mut items);
    items
}

/// User-side narrowing of an already-ranked view.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewFilter {
    /// Minimum weighted score.
    #[serde(default)]
    pub min_score: i32,
    /// Exact feed-URL subset; empty keeps all sources.
    #[serde(default)]
    pub sources: Vec<String>,
    /// Case-insensitive free-text match over title and hits.
    #[serde(default)]
    pub query: Option<String>,
}

pub fn apply_view_filter(items: &[ScoredItem], filter: &ViewFilter) -> Vec<ScoredItem> {
    let needle = filter
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    items
        .iter()
        .filter(|it| {
            if it.score < filter.min_score {
                return false;
            }
            if !filter.sources.is_empty() && !filter.sources.iter().any(|s| s == &it.source) {
                return false;
            }
            if let Some(q) = &needle {
                let in_title = it.title.to_lowercase().contains(q);
                let in_hits = it.hits.iter().any(|h| h.to_lowercase().contains(q));
                if !in_title && !in_hits {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect()
}
