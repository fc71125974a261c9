//! Seen-link tracking across fetch passes.
//!
//! Persisted as a sorted, human-readable JSON array of link strings. A
//! missing or corrupt document loads as the empty set so the dashboard
//! stays usable.

use std::collections::BTreeSet;

use anyhow::Result;

use super::StateStore;

pub const SEEN_DOC: &str = "seen.json";

#[derive(Debug, Default, Clone)]
pub struct SeenSet {
    links: BTreeSet<String>,
}

impl SeenSet {
    pub fn load(store: &dyn StateStore) -> Self {
        let links = store
            .read(SEEN_DOC)
            .ok()
            .flatten()
            .and_then(|s| serde_json::from_str::<Vec<String>>(&s).ok())
            .unwrap_or_default();
        Self {
            links: links.into_iter().collect(),
        }
    }

    pub fn contains(&self, link: &str) -> bool {
        self.links.contains(link)
    }

    pub fn add(&mut self, link: &str) {
        self.links.insert(link.to_string());
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// BTreeSet iteration keeps the persisted array sorted and diff-stable.
    pub fn save(&self, store: &dyn StateStore) -> Result<()> {
        let links: Vec<&String> = self.links.iter().collect();
        let body = serde_json::to_string_pretty(&links)?;
        store.write(SEEN_DOC, &body)
    }

    /// Drop the persisted state entirely; the next pass treats every link
    /// as new.
    pub fn reset(store: &dyn StateStore) -> Result<()> {
        store.remove(SEEN_DOC)
    }
}
