//! Archived item snapshots, deduplicated by link.
//!
//! Append and clear are the only mutations; entries carry the moment of
//! archiving, not the original publish time.

use std::collections::HashSet;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::StateStore;
use crate::scoring::ScoredItem;

pub const ARCHIVE_DOC: &str = "archive.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveEntry {
    pub saved_at: DateTime<Utc>,
    pub title: String,
    pub link: String,
    pub hits: Vec<String>,
    pub published: Option<DateTime<Utc>>,
    pub score: i32,
    pub source: String,
}

impl ArchiveEntry {
    fn from_item(item: &ScoredItem, saved_at: DateTime<Utc>) -> Self {
        Self {
            saved_at,
            title: item.title.clone(),
            link: item.link.clone(),
            hits: item.hits.clone(),
            published: item.published,
            score: item.score,
            source: item.source.clone(),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
}

impl Archive {
    /// Missing or corrupt state loads as an empty archive.
    pub fn load(store: &dyn StateStore) -> Self {
        let entries = store
            .read(ARCHIVE_DOC)
            .ok()
            .flatten()
            .and_then(|s| serde_json::from_str::<Vec<ArchiveEntry>>(&s).ok())
            .unwrap_or_default();
        Self { entries }
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Append items not already present, stamped with `saved_at`. Existing
    /// links are never overwritten. Returns how many were added.
    pub fn append(&mut self, items: &[ScoredItem], saved_at: DateTime<Utc>) -> usize {
        let mut known: HashSet<String> = self.entries.iter().map(|e| e.link.clone()).collect();
        let mut added = 0;
        for item in items {
            if !known.insert(item.link.clone()) {
                continue;
            }
            self.entries.push(ArchiveEntry::from_item(item, saved_at));
            added += 1;
        }
        added
    }

    pub fn save(&self, store: &dyn StateStore) -> Result<()> {
        let body = serde_json::to_string_pretty(&self.entries)?;
        store.write(ARCHIVE_DOC, &body)
    }

    /// Drop all entries.
    pub fn clear(store: &dyn StateStore) -> Result<()> {
        store.remove(ARCHIVE_DOC)
    }
}
