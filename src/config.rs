//! Dashboard configuration: feed/watchlist text blocks plus fetch knobs.
//!
//! Loaded from TOML with an env-var path override, falling back to built-in
//! defaults so a bare checkout still boots.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const ENV_CONFIG_PATH: &str = "NEWSWATCH_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/newswatch.toml";

pub const DEFAULT_SCORE_THRESHOLD: i32 = 30;
pub const DEFAULT_PER_FEED_CAP: usize = 25;

/// Strip each line; drop blanks and `#` comments; preserve order.
pub fn parse_lines(block: &str) -> Vec<String> {
    block
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// One feed URL per line; `#` comments allowed.
    pub feeds: String,
    /// One watchlist keyword per line; `#` comments allowed.
    pub watchlist: String,
    /// Minimum weighted score an item needs to enter the view.
    pub score_threshold: i32,
    /// Entries inspected per feed in one pass.
    pub per_feed_cap: usize,
    /// Suppress links already inspected in previous passes.
    pub incremental: bool,
    /// Directory holding the seen/archive state files.
    pub state_dir: PathBuf,
    pub bind_addr: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            feeds: String::new(),
            watchlist: String::new(),
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            per_feed_cap: DEFAULT_PER_FEED_CAP,
            incremental: true,
            state_dir: PathBuf::from("state"),
            bind_addr: "127.0.0.1:8000".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn feed_urls(&self) -> Vec<String> {
        parse_lines(&self.feeds)
    }

    pub fn watchlist_terms(&self) -> Vec<String> {
        parse_lines(&self.watchlist)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config from {}", path.display()))
    }

    /// Load order: $NEWSWATCH_CONFIG_PATH, then `config/newswatch.toml`,
    /// then built-in defaults. An unreadable file degrades to defaults.
    pub fn load_default() -> Self {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            match Self::load_from(Path::new(&p)) {
                Ok(c) => return c,
                Err(e) => {
                    warn!(error = ?e, path = %p, "config from env path unusable, using defaults");
                    return Self::default();
                }
            }
        }
        let fallback = Path::new(DEFAULT_CONFIG_PATH);
        if fallback.exists() {
            match Self::load_from(fallback) {
                Ok(c) => return c,
                Err(e) => warn!(error = ?e, "default config file unusable, using defaults"),
            }
        }
        Self::default()
    }
}
