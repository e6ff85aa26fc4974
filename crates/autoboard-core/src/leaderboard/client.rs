use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CACHE_CONTROL};
use reqwest::Client;
use url::Url;

use super::models::{LeaderboardResponse, LeaderboardSnapshot};
use crate::config::SourceConfig;
use crate::{Error, Result};

/// Something that can produce a fresh leaderboard snapshot
#[async_trait]
pub trait LeaderboardSource: Send + Sync {
    async fn fetch(&self) -> Result<LeaderboardSnapshot>;
}

/// HTTP client for the leaderboard endpoint
pub struct LeaderboardClient {
    client: Client,
    url: Url,
}

impl LeaderboardClient {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let url = Url::parse(&config.api_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "Unsupported leaderboard URL scheme: {}",
                url.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .default_headers(Self::build_headers())
            .gzip(true)
            .build()?;

        Ok(Self { client, url })
    }

    /// Every poll must hit the server, never an intermediate cache
    fn build_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        headers
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl LeaderboardSource for LeaderboardClient {
    async fn fetch(&self) -> Result<LeaderboardSnapshot> {
        let response = self.client.get(self.url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api(format!("HTTP {}", status.as_u16())));
        }

        let body = response.text().await?;
        let parsed: LeaderboardResponse = serde_json::from_str(&body)?;
        let snapshot = parsed.into_snapshot()?;

        tracing::debug!(rows = snapshot.total_rows(), "leaderboard fetched");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_url() {
        let config = SourceConfig {
            api_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(LeaderboardClient::new(&config), Err(Error::UrlParse(_))));
    }

    #[test]
    fn test_rejects_non_http_scheme() {
        let config = SourceConfig {
            api_url: "ftp://example.com/leaderboard".to_string(),
            ..Default::default()
        };
        assert!(matches!(LeaderboardClient::new(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_accepts_default_url() {
        let client = LeaderboardClient::new(&SourceConfig::default()).unwrap();
        assert_eq!(client.url().path(), "/api/leaderboard");
    }

    #[test]
    fn test_headers_disable_caching() {
        let headers = LeaderboardClient::build_headers();
        assert_eq!(headers.get(CACHE_CONTROL).unwrap(), "no-store");
    }
}
