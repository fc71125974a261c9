//! # Source Weights
//!
//! Maps a feed URL to a trust multiplier via domain substring match.
//!
//! - Loads from JSON config (`default_weight` + `domains` table).
//! - Longest matching domain substring wins; ties break lexicographically,
//!   so resolution never depends on map iteration order.
//! - No match falls back to `default_weight` (1.0).
//! - Includes a built-in `default_seed()` with common news domains.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::Path};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceWeights {
    /// Weight applied when no domain matches.
    #[serde(default = "default_default_weight")]
    pub default_weight: f32,
    /// Domain substring (lowercase) to multiplier.
    #[serde(default)]
    pub domains: HashMap<String, f32>,
}

fn default_default_weight() -> f32 {
    1.0
}

impl SourceWeights {
    /// Load from a JSON file, falling back to `default_seed()` on any error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|_| Self::default_seed()),
            Err(_) => Self::default_seed(),
        }
    }

    /// Weight for a feed URL. Longest domain substring found in the URL wins;
    /// equal lengths break by lexicographic order of the domain key.
    pub fn weight_for_url(&self, url: &str) -> f32 {
        let u = url.trim().to_ascii_lowercase();

        let mut best: Option<(&str, f32)> = None;
        for (domain, &w) in &self.domains {
            let d = domain.as_str();
            if d.is_empty() || !u.contains(&d.to_ascii_lowercase()) {
                continue;
            }
            let better = match best {
                None => true,
                Some((b, _)) => d.len() > b.len() || (d.len() == b.len() && d < b),
            };
            if better {
                best = Some((d, w));
            }
        }

        clamp_weight(best.map(|(_, w)| w).unwrap_or(self.default_weight))
    }

    /// Built-in seed with common wire services, papers, and aggregators.
    pub(crate) fn default_seed() -> Self {
        let mut domains = HashMap::new();
        for (k, v) in [
            ("reuters.com", 1.3),
            ("apnews.com", 1.3),
            ("bbc.co.uk", 1.25),
            ("bbc.com", 1.25),
            ("ft.com", 1.2),
            ("bloomberg.com", 1.2),
            ("wsj.com", 1.2),
            ("economist.com", 1.2),
            ("nytimes.com", 1.15),
            ("theguardian.com", 1.1),
            ("arstechnica.com", 1.05),
            ("news.ycombinator.com", 1.0),
            ("theverge.com", 1.0),
            ("techcrunch.com", 0.95),
            ("substack.com", 0.85),
            ("medium.com", 0.8),
            ("wordpress.com", 0.75),
            ("blogspot.com", 0.7),
            ("reddit.com", 0.7),
        ] {
            domains.insert(k.to_string(), v);
        }

        Self {
            default_weight: 1.0,
            domains,
        }
    }
}

impl Default for SourceWeights {
    fn default() -> Self {
        Self::default_seed()
    }
}

/// Negative weights make no sense; anything above 1.0 is a legal trust boost.
fn clamp_weight(x: f32) -> f32 {
    if x < 0.0 {
        0.0
    } else {
        x
    }
}
