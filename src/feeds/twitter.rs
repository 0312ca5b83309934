use super::oauth::OAuthCredentials;
use super::{RawRecord, TimelineFetcher, PAGE_SIZE};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.twitter.com/1.1";

/// Timeline client for the v1.1 `statuses/user_timeline` endpoint.
pub struct TwitterClient {
    credentials: OAuthCredentials,
    api_base: String,
    client: reqwest::Client,
}

impl TwitterClient {
    pub fn new(credentials: OAuthCredentials, api_base: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("retweet-analyser/0.1")
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            credentials,
            api_base: api_base
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            client,
        }
    }

    fn timeline_url(&self) -> String {
        format!("{}/statuses/user_timeline.json", self.api_base)
    }
}

/// Query parameters for one timeline page. Retweets are excluded so only the
/// account's own tweets are counted.
fn timeline_params(identity: &str, max_id: Option<u64>) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("screen_name", identity.to_string()),
        ("count", PAGE_SIZE.to_string()),
        ("include_rts", "false".to_string()),
        ("contributor_details", "false".to_string()),
        ("tweet_mode", "extended".to_string()),
    ];
    if let Some(max_id) = max_id {
        params.push(("max_id", max_id.to_string()));
    }
    params
}

#[async_trait]
impl TimelineFetcher for TwitterClient {
    async fn fetch_page(&self, identity: &str, max_id: Option<u64>) -> Result<Vec<RawRecord>> {
        let url = self.timeline_url();
        let params = timeline_params(identity, max_id);
        let authorization = self.credentials.authorization_header("GET", &url, &params)?;

        let response = self
            .client
            .get(&url)
            .query(&params)
            .header("Authorization", authorization)
            .send()
            .await
            .with_context(|| format!("Timeline request for @{} failed", identity))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!(
                "Twitter API error for @{}: {} {}",
                identity,
                status,
                body.trim()
            ));
        }

        let page: Vec<RawRecord> = response
            .json()
            .await
            .with_context(|| format!("Unexpected timeline response for @{}", identity))?;

        Ok(page)
    }
}
