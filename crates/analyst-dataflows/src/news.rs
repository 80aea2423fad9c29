//! Company and global news windows
//!
//! Backends fetch raw articles through an [`ArticleSource`]; the
//! [`CompanyNews`] and [`GlobalNews`] adapters own argument parsing, window
//! arithmetic and rendering, so every source yields the same text for the
//! same articles.

use analyst_core::{Error, Result};
use analyst_tools::VendorBackend;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::window::{DATE_FORMAT, SENTIMENT_LOOKBACK_DAYS, TrailingWindow, parse_date};

/// Most articles rendered for one company window
pub const COMPANY_NEWS_LIMIT: usize = 20;

/// Default article count for global news
pub const GLOBAL_NEWS_LIMIT: usize = 5;

/// File holding market-wide articles in the local snapshot directory
pub const GLOBAL_NEWS_FILE: &str = "global.csv";

/// One news item, vendor-neutral
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub date: NaiveDate,
    pub headline: String,
    pub source: String,
    pub summary: String,
}

/// Where articles come from
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Articles about `ticker` published inside `window`
    async fn company(&self, ticker: &str, window: &TrailingWindow) -> Result<Vec<NewsArticle>>;

    /// Market-wide articles published inside `window`
    async fn global(&self, window: &TrailingWindow) -> Result<Vec<NewsArticle>>;
}

#[async_trait]
impl<T: ArticleSource + ?Sized> ArticleSource for Arc<T> {
    async fn company(&self, ticker: &str, window: &TrailingWindow) -> Result<Vec<NewsArticle>> {
        (**self).company(ticker, window).await
    }

    async fn global(&self, window: &TrailingWindow) -> Result<Vec<NewsArticle>> {
        (**self).global(window).await
    }
}

/// Tickers are used in file names and URLs, so only symbol characters pass
fn validate_ticker(raw: &str) -> Result<String> {
    let ticker = raw.trim().to_ascii_uppercase();
    let valid = !ticker.is_empty()
        && ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));
    if valid {
        Ok(ticker)
    } else {
        Err(Error::MalformedInput(format!("ticker '{raw}' is not a valid symbol")))
    }
}

/// Newest first, ties broken by headline so output is stable
fn newest_first(articles: &mut [NewsArticle]) {
    articles.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.headline.cmp(&b.headline)));
}

fn render(title: &str, articles: &[NewsArticle]) -> String {
    let mut out = format!("## {title}\n\n");
    for article in articles {
        let _ = writeln!(
            out,
            "### {} ({}, {})",
            article.headline,
            article.source,
            article.date.format(DATE_FORMAT)
        );
        if !article.summary.is_empty() {
            let _ = writeln!(out, "{}", article.summary);
        }
        out.push('\n');
    }
    out
}

#[derive(Debug, Deserialize)]
struct CompanyParams {
    ticker: String,
    start_date: String,
    end_date: String,
}

/// `get_news(ticker, start_date, end_date)` over any [`ArticleSource`]
pub struct CompanyNews<S> {
    source: S,
}

impl<S: ArticleSource> CompanyNews<S> {
    /// Adapter over `source`
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Render company news for `ticker` between two `YYYY-MM-DD` dates
    pub async fn retrieve(&self, ticker: &str, start_date: &str, end_date: &str) -> Result<String> {
        let ticker = validate_ticker(ticker)?;
        let start = parse_date(start_date, "start_date")?;
        let end = parse_date(end_date, "end_date")?;
        let window = TrailingWindow::between(start, end)?;

        let mut articles: Vec<NewsArticle> = self
            .source
            .company(&ticker, &window)
            .await?
            .into_iter()
            .filter(|a| window.contains(a.date))
            .collect();
        debug!(ticker = %ticker, window = %window, articles = articles.len(), "Fetched company news");

        if articles.is_empty() {
            return Ok(format!(
                "No news found for {ticker} between {} and {}.",
                window.start.format(DATE_FORMAT),
                window.end.format(DATE_FORMAT)
            ));
        }

        newest_first(&mut articles);
        articles.truncate(COMPANY_NEWS_LIMIT);
        Ok(render(&format!("{ticker} news, {window}"), &articles))
    }
}

#[async_trait]
impl<S: ArticleSource> VendorBackend for CompanyNews<S> {
    async fn call(&self, args: &Value) -> Result<String> {
        let params: CompanyParams = serde_json::from_value(args.clone())
            .map_err(|e| Error::MalformedInput(format!("Invalid parameters: {e}")))?;
        self.retrieve(&params.ticker, &params.start_date, &params.end_date)
            .await
    }
}

fn default_look_back() -> u64 {
    SENTIMENT_LOOKBACK_DAYS
}

fn default_limit() -> usize {
    GLOBAL_NEWS_LIMIT
}

#[derive(Debug, Deserialize)]
struct GlobalParams {
    curr_date: String,
    #[serde(default = "default_look_back")]
    look_back_days: u64,
    #[serde(default = "default_limit")]
    limit: usize,
}

/// `get_global_news(curr_date, look_back_days = 7, limit = 5)` over any [`ArticleSource`]
pub struct GlobalNews<S> {
    source: S,
}

impl<S: ArticleSource> GlobalNews<S> {
    /// Adapter over `source`
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Render up to `limit` market-wide articles from the `look_back_days` before `curr_date`
    pub async fn retrieve(&self, curr_date: &str, look_back_days: u64, limit: usize) -> Result<String> {
        let anchor = parse_date(curr_date, "curr_date")?;
        if limit == 0 {
            return Err(Error::MalformedInput("limit must be at least 1".to_string()));
        }
        let window = TrailingWindow::days(anchor, look_back_days)?;

        let mut articles: Vec<NewsArticle> = self
            .source
            .global(&window)
            .await?
            .into_iter()
            .filter(|a| window.contains(a.date))
            .collect();
        debug!(window = %window, articles = articles.len(), "Fetched global news");

        if articles.is_empty() {
            return Ok(format!(
                "No global news found between {} and {}.",
                window.start.format(DATE_FORMAT),
                window.end.format(DATE_FORMAT)
            ));
        }

        newest_first(&mut articles);
        articles.truncate(limit);
        Ok(render(&format!("Global news, {window}"), &articles))
    }
}

#[async_trait]
impl<S: ArticleSource> VendorBackend for GlobalNews<S> {
    async fn call(&self, args: &Value) -> Result<String> {
        let params: GlobalParams = serde_json::from_value(args.clone())
            .map_err(|e| Error::MalformedInput(format!("Invalid parameters: {e}")))?;
        self.retrieve(&params.curr_date, params.look_back_days, params.limit)
            .await
    }
}

#[derive(Debug, Deserialize)]
struct ArticleRow {
    date: String,
    headline: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    summary: String,
}

/// Local CSV news snapshots
///
/// Company files live at `<dir>/<TICKER>.csv`, market-wide news at
/// `<dir>/global.csv`. Both use the columns `date,headline,source,summary`.
#[derive(Debug, Clone)]
pub struct LocalNewsStore {
    dir: PathBuf,
}

impl LocalNewsStore {
    /// Store reading snapshots from `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn load(path: &Path) -> Result<Vec<NewsArticle>> {
        if !path.exists() {
            return Err(Error::ResourceUnavailable(format!(
                "News snapshot not found at {}",
                path.display()
            )));
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| Error::ResourceUnavailable(format!("Failed to open {}: {e}", path.display())))?;

        let mut articles = Vec::new();
        for (line, row) in reader.deserialize::<ArticleRow>().enumerate() {
            let row = row.map_err(|e| {
                Error::SchemaViolation(format!("{} row {}: {e}", path.display(), line + 2))
            })?;
            let date = NaiveDate::parse_from_str(&row.date, DATE_FORMAT).map_err(|_| {
                Error::SchemaViolation(format!(
                    "{} row {} has invalid date '{}'",
                    path.display(),
                    line + 2,
                    row.date
                ))
            })?;
            articles.push(NewsArticle {
                date,
                headline: row.headline,
                source: row.source,
                summary: row.summary,
            });
        }
        Ok(articles)
    }
}

#[async_trait]
impl ArticleSource for LocalNewsStore {
    async fn company(&self, ticker: &str, window: &TrailingWindow) -> Result<Vec<NewsArticle>> {
        let path = self.dir.join(format!("{ticker}.csv"));
        info!(ticker = %ticker, window = %window, path = %path.display(), "Reading local company news");
        Self::load(&path)
    }

    async fn global(&self, window: &TrailingWindow) -> Result<Vec<NewsArticle>> {
        let path = self.dir.join(GLOBAL_NEWS_FILE);
        info!(window = %window, path = %path.display(), "Reading local global news");
        Self::load(&path)
    }
}
