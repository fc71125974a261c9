//! RSS 2.0 / Atom feed provider on top of quick-xml.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::{OffsetDateTime, UtcOffset};

use crate::ingest::types::{FeedEntry, FeedProvider};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}
#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}
#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entry: Vec<AtomEntry>,
}
#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<String>,
    summary: Option<String>,
    content: Option<String>,
    #[serde(rename = "link", default)]
    link: Vec<AtomLink>,
    published: Option<String>,
    updated: Option<String>,
}
#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
}

/// RFC 2822 (RSS) or RFC 3339 (Atom) to UTC, second precision.
fn parse_date(ts: &str) -> Option<DateTime<Utc>> {
    let t = ts.trim();
    let odt = OffsetDateTime::parse(t, &Rfc2822)
        .or_else(|_| OffsetDateTime::parse(t, &Rfc3339))
        .ok()?;
    let unix = odt.to_offset(UtcOffset::UTC).unix_timestamp();
    Utc.timestamp_opt(unix, 0).single()
}

fn non_empty(link: Option<String>) -> Option<String> {
    link.map(|l| l.trim().to_string()).filter(|l| !l.is_empty())
}

fn rss_entry(it: Item) -> FeedEntry {
    FeedEntry {
        title: it.title.unwrap_or_default(),
        summary: it.description.unwrap_or_default(),
        link: non_empty(it.link),
        published: it.pub_date.as_deref().and_then(parse_date),
    }
}

fn atom_entry(e: AtomEntry) -> FeedEntry {
    let link = non_empty(e.link.into_iter().find_map(|l| l.href));
    FeedEntry {
        title: e.title.unwrap_or_default(),
        summary: e.summary.or(e.content).unwrap_or_default(),
        link,
        // Atom prefers `published`; `updated` is the fallback.
        published: e.published.or(e.updated).as_deref().and_then(parse_date),
    }
}

pub struct RssProvider {
    url: String,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http(reqwest::Client),
}

impl RssProvider {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mode: Mode::Http(reqwest::Client::new()),
        }
    }

    /// Parse a canned XML body instead of fetching; the URL is kept for
    /// source attribution and weight resolution.
    pub fn from_fixture(url: impl Into<String>, xml: &str) -> Self {
        Self {
            url: url.into(),
            mode: Mode::Fixture(xml.to_string()),
        }
    }

    fn parse_entries(xml: &str) -> Result<Vec<FeedEntry>> {
        let t0 = std::time::Instant::now();
        let clean = scrub_html_entities_for_xml(xml);

        let entries: Vec<FeedEntry> = match from_str::<Rss>(&clean) {
            Ok(rss) => rss.channel.item.into_iter().map(rss_entry).collect(),
            Err(rss_err) => {
                let atom: AtomFeed = from_str(&clean)
                    .with_context(|| format!("parsing feed xml (rss error: {rss_err})"))?;
                atom.entry.into_iter().map(atom_entry).collect()
            }
        };

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("fetch_parse_ms").record(ms);
        counter!("fetch_entries_total").increment(entries.len() as u64);
        Ok(entries)
    }
}

#[async_trait]
impl FeedProvider for RssProvider {
    async fn fetch_latest(&self) -> Result<Vec<FeedEntry>> {
        match &self.mode {
            Mode::Fixture(xml) => Self::parse_entries(xml),
            Mode::Http(client) => {
                let body = client
                    .get(&self.url)
                    .send()
                    .await
                    .with_context(|| format!("fetching {}", self.url))?
                    .text()
                    .await
                    .with_context(|| format!("reading body from {}", self.url))?;
                Self::parse_entries(&body)
            }
        }
    }

    fn url(&self) -> &str {
        &self.url
    }
}

// Feeds in the wild carry bare HTML entities that are not valid XML.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
