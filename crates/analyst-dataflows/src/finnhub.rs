//! Finnhub news client

use analyst_core::{Error, Result};
use async_trait::async_trait;
use chrono::DateTime;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::news::{ArticleSource, NewsArticle};
use crate::window::{DATE_FORMAT, TrailingWindow};

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Vendor name used in routing and errors
pub const VENDOR: &str = "finnhub";

const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";

const TOKEN_HEADER: &str = "X-Finnhub-Token";

/// Finnhub news article
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinnhubNewsArticle {
    /// Article category
    #[serde(default)]
    pub category: String,
    /// Publish time (UNIX timestamp)
    pub datetime: i64,
    /// News headline
    pub headline: String,
    /// News source
    #[serde(default)]
    pub source: String,
    /// Article summary
    #[serde(default)]
    pub summary: String,
    /// Article URL
    #[serde(default)]
    pub url: String,
}

impl FinnhubNewsArticle {
    /// Vendor-neutral form; `None` when the timestamp is out of range
    pub fn into_article(self) -> Option<NewsArticle> {
        let date = DateTime::from_timestamp(self.datetime, 0)?.date_naive();
        Some(NewsArticle {
            date,
            headline: self.headline,
            source: self.source,
            summary: self.summary,
        })
    }
}

/// Finnhub client for the news API, rate limited per minute
#[derive(Clone)]
pub struct FinnhubClient {
    client: Client,
    api_key: String,
    base_url: String,
    rate_limiter: SharedRateLimiter,
}

impl FinnhubClient {
    /// Create a new Finnhub client with rate limiting
    ///
    /// # Arguments
    /// * `api_key` - Finnhub API key
    /// * `rate_limit` - Requests per minute (free tier: 60, premium: 300+)
    /// * `timeout` - Per-request timeout
    pub fn new(api_key: impl Into<String>, rate_limit: u32, timeout: Duration) -> Result<Self> {
        let quota = Quota::per_minute(NonZeroU32::new(rate_limit).unwrap_or(NonZeroU32::MIN));
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    /// Point the client at another API root (proxies, tests)
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Get company news for a symbol between two dates (inclusive)
    pub async fn company_news(&self, symbol: &str, window: &TrailingWindow) -> Result<Vec<FinnhubNewsArticle>> {
        let from = window.start.format(DATE_FORMAT).to_string();
        let to = window.end.format(DATE_FORMAT).to_string();
        self.get(
            "company-news",
            &[("symbol", symbol), ("from", &from), ("to", &to)],
        )
        .await
    }

    /// Get general market news
    ///
    /// # Arguments
    /// * `category` - News category (general, forex, crypto, merger)
    pub async fn market_news(&self, category: &str) -> Result<Vec<FinnhubNewsArticle>> {
        self.get("news", &[("category", category)]).await
    }

    async fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Vec<FinnhubNewsArticle>> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/{endpoint}", self.base_url);
        debug!(endpoint = %endpoint, "Calling Finnhub");

        let response = self
            .client
            .get(&url)
            .query(query)
            .header(TOKEN_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| Error::transient(VENDOR, format!("request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(endpoint = %endpoint, status = %status, "Finnhub returned an error status");
            return Err(status_error(status, &body));
        }

        response
            .json::<Vec<FinnhubNewsArticle>>()
            .await
            .map_err(|e| Error::rejected(VENDOR, format!("failed to parse response: {}", e.without_url())))
    }
}

/// Throttling and server faults are worth retrying; anything else is not
fn status_error(status: StatusCode, body: &str) -> Error {
    let message = format!("API error {status}: {body}");
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        Error::transient(VENDOR, message)
    } else {
        Error::rejected(VENDOR, message)
    }
}

fn convert(articles: Vec<FinnhubNewsArticle>) -> Vec<NewsArticle> {
    articles
        .into_iter()
        .filter_map(FinnhubNewsArticle::into_article)
        .collect()
}

#[async_trait]
impl ArticleSource for FinnhubClient {
    async fn company(&self, ticker: &str, window: &TrailingWindow) -> Result<Vec<NewsArticle>> {
        Ok(convert(self.company_news(ticker, window).await?))
    }

    /// Finnhub only serves the latest general news; older windows come back empty
    async fn global(&self, window: &TrailingWindow) -> Result<Vec<NewsArticle>> {
        let articles = convert(self.market_news("general").await?);
        Ok(articles.into_iter().filter(|a| window.contains(a.date)).collect())
    }
}
