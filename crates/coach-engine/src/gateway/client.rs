//! HTTP client for the match data provider.
//!
//! Every request first takes a rate limit token for its regional host.
//! A 429 response feeds its Retry-After back into the limiter so the
//! whole region backs off.

use crate::error::ProviderError;
use crate::gateway::limiter::RateLimiterRegistry;
use crate::gateway::regions::Platform;
use crate::models::{MatchSummary, Timeline};
use crate::observability::EngineMetrics;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};
use url::Url;

/// Fallback when a 429 carries no parseable Retry-After header.
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(10);

/// Paging and filtering options for match id listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchListOptions {
    pub start: Option<u32>,
    pub count: Option<u32>,
    pub queue: Option<u32>,
}

pub struct ProviderClient {
    http: reqwest::Client,
    api_key: String,
    limiter: Arc<RateLimiterRegistry>,
    metrics: EngineMetrics,
    /// Overrides the regional host, for tests against a local server.
    base_url_override: Option<String>,
}

impl ProviderClient {
    pub fn new(api_key: impl Into<String>, limiter: Arc<RateLimiterRegistry>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            limiter,
            metrics: EngineMetrics::new(),
            base_url_override: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    fn regional_base(&self, platform: Platform) -> String {
        self.base_url_override
            .clone()
            .unwrap_or_else(|| platform.regional_host())
    }

    /// Fetch one match summary.
    pub async fn get_match(
        &self,
        platform: Platform,
        match_id: &str,
    ) -> Result<MatchSummary, ProviderError> {
        let url = self.parse_url(&format!(
            "{}/lol/match/v5/matches/{match_id}",
            self.regional_base(platform)
        ))?;
        self.get_json(platform, url).await
    }

    /// Fetch one match timeline.
    pub async fn get_timeline(
        &self,
        platform: Platform,
        match_id: &str,
    ) -> Result<Timeline, ProviderError> {
        let url = self.parse_url(&format!(
            "{}/lol/match/v5/matches/{match_id}/timeline",
            self.regional_base(platform)
        ))?;
        self.get_json(platform, url).await
    }

    /// List recent match ids for a player.
    pub async fn get_match_ids(
        &self,
        platform: Platform,
        puuid: &str,
        options: MatchListOptions,
    ) -> Result<Vec<String>, ProviderError> {
        let mut url = self.parse_url(&format!(
            "{}/lol/match/v5/matches/by-puuid/{puuid}/ids",
            self.regional_base(platform)
        ))?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(start) = options.start {
                query.append_pair("start", &start.to_string());
            }
            if let Some(count) = options.count {
                query.append_pair("count", &count.to_string());
            }
            if let Some(queue) = options.queue {
                query.append_pair("queue", &queue.to_string());
            }
        }
        self.get_json(platform, url).await
    }

    fn parse_url(&self, raw: &str) -> Result<Url, ProviderError> {
        Url::parse(raw).map_err(|e| ProviderError::Validation(format!("bad url {raw}: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        platform: Platform,
        url: Url,
    ) -> Result<T, ProviderError> {
        let region = platform.region().as_str();

        let wait_start = Instant::now();
        self.limiter.acquire(region).await;
        self.metrics
            .observe_gateway_wait(region, wait_start.elapsed().as_secs_f64());

        debug!(region, url = %url, "provider request");
        let response = self
            .http
            .get(url.clone())
            .header("X-Riot-Token", &self.api_key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                self.metrics.inc_provider_request(region, "error");
                ProviderError::Unknown(format!("request to {url} failed: {e}"))
            })?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = parse_retry_after(response.headers());
                self.limiter.report_throttled(region, retry_after);
                self.metrics.inc_provider_request(region, "throttled");
                self.metrics.inc_throttle_event(region);
                warn!(region, retry_after_secs = retry_after.as_secs(), "provider throttled");
                Err(ProviderError::RateLimited { retry_after })
            }
            StatusCode::NOT_FOUND => {
                self.metrics.inc_provider_request(region, "not_found");
                Err(ProviderError::NotFound(url.path().to_string()))
            }
            status if status.is_success() => {
                let parsed = response.json::<T>().await.map_err(|e| {
                    self.metrics.inc_provider_request(region, "error");
                    ProviderError::Validation(format!("malformed response from {url}: {e}"))
                })?;
                self.metrics.inc_provider_request(region, "ok");
                Ok(parsed)
            }
            status => {
                self.metrics.inc_provider_request(region, "error");
                Err(ProviderError::Unknown(format!(
                    "provider returned {status} for {url}"
                )))
            }
        }
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Duration {
    headers
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn retry_after_header_is_parsed_as_seconds() {
        let mut headers = HeaderMap::new();
        headers.insert("Retry-After", HeaderValue::from_static("25"));
        assert_eq!(parse_retry_after(&headers), Duration::from_secs(25));
    }

    #[test]
    fn missing_or_garbled_retry_after_falls_back() {
        assert_eq!(parse_retry_after(&HeaderMap::new()), DEFAULT_RETRY_AFTER);

        let mut headers = HeaderMap::new();
        headers.insert("Retry-After", HeaderValue::from_static("soon"));
        assert_eq!(parse_retry_after(&headers), DEFAULT_RETRY_AFTER);
    }

    #[test]
    fn match_list_url_carries_query_options() {
        let client = ProviderClient::new("key", Arc::new(RateLimiterRegistry::default()));
        let mut url = client
            .parse_url(&format!(
                "{}/lol/match/v5/matches/by-puuid/abc/ids",
                Platform::Na1.regional_host()
            ))
            .unwrap();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("start", "0");
            query.append_pair("count", "20");
            query.append_pair("queue", "420");
        }
        assert_eq!(
            url.as_str(),
            "https://americas.api.riotgames.com/lol/match/v5/matches/by-puuid/abc/ids?start=0&count=20&queue=420"
        );
    }
}
