//! Condensed digest of a ranked view: top items, dominant themes, one-line
//! excerpts.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::rank;
use crate::scoring::ScoredItem;
use crate::text;

pub const NO_ITEMS_MESSAGE: &str = "No items to summarize.";
pub const TOP_ITEMS: usize = 10;
pub const TOP_THEMES: usize = 6;

/// Build the digest. The caller passes an already-filtered view; ordering is
/// re-derived here so the digest never depends on caller sort state.
pub fn build_summary(view: &[ScoredItem]) -> String {
    if view.is_empty() {
        return NO_ITEMS_MESSAGE.to_string();
    }

    let mut items: Vec<ScoredItem> = view.to_vec();
    rank::rank(&mut items);
    items.truncate(TOP_ITEMS);

    let themes = top_themes(&items);

    let mut out = String::new();
    let _ = writeln!(out, "Top 10 digest: {} of {} items", items.len(), view.len());
    if !themes.is_empty() {
        let line = themes
            .iter()
            .map(|(t, n)| format!("{t} ({n})"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "Themes: {line}");
    }
    out.push('\n');

    for (idx, it) in items.iter().enumerate() {
        let when = it
            .published
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "undated".to_string());
        let _ = writeln!(out, "{:2}. [{:3}] {} ({when}) <{}>", idx + 1, it.score, it.title, it.source);
        let excerpt = text::excerpt(&it.summary, text::EXCERPT_MAX_CHARS);
        if !excerpt.is_empty() {
            let _ = writeln!(out, "     {excerpt}");
        }
    }

    out
}

/// Hit-term frequencies across the top items; count desc, ties keep first
/// appearance order. At most `TOP_THEMES` entries.
fn top_themes(items: &[ScoredItem]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for it in items {
        for hit in &it.hits {
            let term = hit.trim();
            if term.is_empty() {
                continue;
            }
            let c = counts.entry(term).or_insert(0);
            if *c == 0 {
                order.push(term);
            }
            *c += 1;
        }
    }

    let mut themes: Vec<(String, usize)> = order
        .into_iter()
        .map(|t| (t.to_string(), counts[t]))
        .collect();
    // Stable sort keeps first-appearance order among equal counts.
    themes.sort_by(|a, b| b.1.cmp(&a.1));
    themes.truncate(TOP_THEMES);
    themes
}
