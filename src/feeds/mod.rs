pub mod oauth;
pub mod twitter;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Maximum number of tweets requested per timeline page.
pub const PAGE_SIZE: u32 = 200;

/// Layout of `created_at` in timeline responses, e.g. `Mon Jan 02 15:04:05 +0000 2006`.
const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// A tweet as returned by the timeline endpoint, before normalisation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub id: u64,
    #[serde(alias = "full_text")]
    pub text: String,
    pub created_at: String,
    pub retweet_count: u64,
}

/// One fetched tweet with its timestamp normalised to UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub text: String,
    pub retweet_count: u64,
}

impl Record {
    pub fn from_raw(raw: RawRecord) -> Result<Self> {
        let timestamp = parse_created_at(&raw.created_at)
            .with_context(|| format!("tweet {} has an unreadable timestamp", raw.id))?;

        Ok(Self {
            id: raw.id,
            timestamp,
            text: raw.text,
            retweet_count: raw.retweet_count,
        })
    }
}

/// Parse a timeline `created_at` string into a UTC timestamp.
pub fn parse_created_at(value: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_str(value.trim(), CREATED_AT_FORMAT)
        .with_context(|| format!("invalid created_at {:?}", value))?;
    Ok(parsed.with_timezone(&Utc))
}

/// Source of timeline pages for one account.
///
/// `max_id` asks for tweets with an id less than or equal to it; the boundary
/// tweet itself is normally returned again.
#[async_trait]
pub trait TimelineFetcher: Send + Sync {
    async fn fetch_page(&self, identity: &str, max_id: Option<u64>) -> Result<Vec<RawRecord>>;
}
