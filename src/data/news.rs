//! NewsAPI ingestion utilities.

use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::{Days, Local};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{info, instrument, warn};
use urlencoding::encode;

use crate::{
    config::Settings,
    error::{Error, Result},
};

/// Article as handed to the embedding and summarisation stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub author: Option<String>,
    pub source: Option<String>,
    pub url: String,
    pub published_at: Option<String>,
    pub description: Option<String>,
    /// Article body (NewsAPI truncates this to a preview).
    pub body: String,
}

impl Article {
    /// Text used for embedding: headline, byline, description and body.
    pub fn document_text(&self) -> String {
        format!(
            "Title: {}\n\nAuthor: {}\nSource: {}\n\nDescription: {}\n\nContent: {}",
            self.title,
            self.author.as_deref().unwrap_or("Unknown"),
            self.source.as_deref().unwrap_or("Unknown"),
            self.description.as_deref().unwrap_or_default(),
            self.body
        )
    }
}

/// Anything that can return articles for a topic.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_articles(&self, topic: &str) -> Result<Vec<Article>>;
}

/// Query options for the `/v2/everything` endpoint.
#[derive(Debug, Clone)]
pub struct NewsQuery {
    pub days_back: u32,
    pub language: String,
    pub sort_by: String,
    pub page_size: usize,
}

impl From<&Settings> for NewsQuery {
    fn from(settings: &Settings) -> Self {
        Self {
            days_back: settings.news_days_back,
            language: settings.news_language.clone(),
            sort_by: settings.news_sort_by.clone(),
            page_size: settings.news_page_size,
        }
    }
}

/// NewsAPI client with bounded exponential-backoff retries.
pub struct NewsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
    query: NewsQuery,
    max_attempts: u32,
    backoff_base: Duration,
    backoff_max: Duration,
}

impl NewsApiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        query: NewsQuery,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent("news-digest/0.1")
            .gzip(true)
            .brotli(true)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Retrieval(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            query,
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
            backoff_max: Duration::from_secs(10),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let (api_key, _) = settings.api_keys()?;
        Ok(Self::new(
            settings.newsapi_base_url.clone(),
            api_key,
            NewsQuery::from(settings),
            settings.http_timeout(),
        )?
        .with_retry(settings.news_max_attempts, Duration::from_secs(1)))
    }

    /// Override attempt count and the first backoff delay.
    pub fn with_retry(mut self, max_attempts: u32, backoff_base: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.backoff_base = backoff_base;
        self
    }

    fn backoff(&self, attempt: u32) -> Duration {
        // 2s, 4s, 8s... for a 1s base, capped at `backoff_max`.
        let delay = self.backoff_base.saturating_mul(2u32.saturating_pow(attempt));
        delay.min(self.backoff_max)
    }

    fn request_url(&self, topic: &str) -> Result<String> {
        let to = Local::now().date_naive();
        let from = to
            .checked_sub_days(Days::new(u64::from(self.query.days_back)))
            .ok_or_else(|| {
                Error::Retrieval(format!(
                    "a window of {} days reaches before the earliest supported date",
                    self.query.days_back
                ))
            })?;
        Ok(format!(
            "{base}/v2/everything?q={q}&from={from}&to={to}&language={lang}&sortBy={sort}&pageSize={size}&apiKey={key}",
            base = self.base_url,
            q = encode(topic),
            from = from.format("%Y-%m-%d"),
            to = to.format("%Y-%m-%d"),
            lang = encode(&self.query.language),
            sort = encode(&self.query.sort_by),
            size = self.query.page_size,
            key = encode(&self.api_key),
        ))
    }

    async fn fetch_once(&self, url: &str) -> anyhow::Result<Vec<Article>> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .context("newsapi request failed")?;
        let status = resp.status();
        let body = resp.text().await.context("reading newsapi response")?;
        if !status.is_success() {
            return Err(anyhow!("newsapi returned {status}: {}", api_message(&body)));
        }
        parse_everything(&body)
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    #[instrument(skip(self))]
    async fn fetch_articles(&self, topic: &str) -> Result<Vec<Article>> {
        if topic.trim().is_empty() {
            return Ok(Vec::new());
        }
        let url = self.request_url(topic)?;
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.fetch_once(&url).await {
                Ok(articles) => {
                    info!(%topic, count = articles.len(), attempt, "retrieved articles");
                    return Ok(articles);
                }
                Err(err) if attempt < self.max_attempts => {
                    let delay = self.backoff(attempt);
                    warn!(error = %format!("{err:#}"), attempt, ?delay, "retrying newsapi");
                    sleep(delay).await;
                }
                Err(err) => return Err(Error::Retrieval(format!("{err:#}"))),
            }
        }
    }
}

/// Parse an `/v2/everything` payload, dropping articles without title or content.
pub fn parse_everything(body: &str) -> anyhow::Result<Vec<Article>> {
    let payload: EverythingResponse =
        serde_json::from_str(body).context("decoding newsapi response")?;
    if payload.status != "ok" {
        return Err(anyhow!(
            "newsapi error: {}",
            payload.message.as_deref().unwrap_or("unknown error")
        ));
    }
    Ok(payload
        .articles
        .into_iter()
        .filter_map(RawArticle::into_article)
        .collect())
}

fn api_message(body: &str) -> String {
    serde_json::from_str::<EverythingResponse>(body)
        .ok()
        .and_then(|r| r.message)
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    #[serde(default)]
    source: Option<RawSource>,
    author: Option<String>,
    title: Option<String>,
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    published_at: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    name: Option<String>,
}

impl RawArticle {
    fn into_article(self) -> Option<Article> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        let body = self.content.filter(|c| !c.trim().is_empty())?;
        Some(Article {
            title,
            author: self.author,
            source: self.source.and_then(|s| s.name),
            url: self.url.unwrap_or_default(),
            published_at: self.published_at,
            description: self.description,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> NewsApiClient {
        NewsApiClient::new(
            "http://localhost/",
            "k",
            NewsQuery::from(&Settings::default()),
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn backoff_doubles_and_clamps() {
        let client = client();
        assert_eq!(client.backoff(1), Duration::from_secs(2));
        assert_eq!(client.backoff(2), Duration::from_secs(4));
        assert_eq!(client.backoff(5), Duration::from_secs(10));
    }

    #[test]
    fn request_url_encodes_topic() {
        let url = client().request_url("dental care").unwrap();
        assert!(url.starts_with("http://localhost/v2/everything?q=dental%20care&from="));
        assert!(url.contains("&pageSize=10&apiKey=k"));
    }

    #[test]
    fn oversized_date_window_is_an_error() {
        let mut client = client();
        client.query.days_back = u32::MAX;
        assert!(matches!(
            client.request_url("ai"),
            Err(Error::Retrieval(msg)) if msg.contains("4294967295 days")
        ));
    }
}
