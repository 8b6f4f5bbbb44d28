//! Runtime configuration utilities for news-digest.

use std::{
    env,
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Upper bound for `NEWS_DAYS_BACK`; larger values are clamped.
pub const MAX_NEWS_DAYS_BACK: u32 = 3650;

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// NewsAPI key; only needed by `search`.
    pub newsapi_key: Option<String>,
    /// Hugging Face token for the hosted summariser; only needed by `search`.
    pub huggingface_token: Option<String>,
    /// JSON document holding saved topics and search history.
    pub user_data_path: PathBuf,
    /// Root folder for per-topic vector indexes.
    pub vector_db_dir: PathBuf,
    /// NewsAPI host, overridable for tests and proxies.
    pub newsapi_base_url: String,
    /// How far back article searches reach.
    pub news_days_back: u32,
    pub news_language: String,
    pub news_sort_by: String,
    pub news_page_size: usize,
    /// Attempts per NewsAPI request before giving up.
    pub news_max_attempts: u32,
    /// Hugging Face inference endpoint prefix; the model id is appended.
    pub hf_inference_url: String,
    pub summary_model: String,
    pub summary_max_new_tokens: usize,
    pub http_timeout_secs: u64,
    /// Chunks pulled from the vector index per search.
    pub retrieval_top_k: usize,
    /// Optional cap on stored history entries; `None` keeps everything.
    pub history_retention: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            newsapi_key: None,
            huggingface_token: None,
            user_data_path: PathBuf::from("user_data.json"),
            vector_db_dir: PathBuf::from("./vector_db"),
            newsapi_base_url: "https://newsapi.org".to_string(),
            news_days_back: 7,
            news_language: "en".to_string(),
            news_sort_by: "relevancy".to_string(),
            news_page_size: 10,
            news_max_attempts: 3,
            hf_inference_url: "https://api-inference.huggingface.co/models".to_string(),
            summary_model: "mistralai/Mistral-7B-Instruct-v0.2".to_string(),
            summary_max_new_tokens: 512,
            http_timeout_secs: 30,
            retrieval_top_k: 5,
            history_retention: None,
        }
    }
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        Ok(Self {
            newsapi_key: non_empty_var("NEWSAPI_KEY"),
            huggingface_token: non_empty_var("HUGGINGFACEHUB_API_TOKEN"),
            user_data_path: env::var("USER_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.user_data_path),
            vector_db_dir: env::var("VECTOR_DB_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.vector_db_dir),
            newsapi_base_url: env::var("NEWSAPI_BASE_URL").unwrap_or(defaults.newsapi_base_url),
            news_days_back: parsed_var("NEWS_DAYS_BACK")
                .unwrap_or(defaults.news_days_back)
                .min(MAX_NEWS_DAYS_BACK),
            news_language: env::var("NEWS_LANGUAGE").unwrap_or(defaults.news_language),
            news_sort_by: env::var("NEWS_SORT_BY").unwrap_or(defaults.news_sort_by),
            news_page_size: parsed_var("NEWS_PAGE_SIZE").unwrap_or(defaults.news_page_size),
            news_max_attempts: parsed_var("NEWS_MAX_ATTEMPTS")
                .unwrap_or(defaults.news_max_attempts)
                .max(1),
            hf_inference_url: env::var("HF_INFERENCE_URL").unwrap_or(defaults.hf_inference_url),
            summary_model: env::var("SUMMARY_MODEL").unwrap_or(defaults.summary_model),
            summary_max_new_tokens: parsed_var("SUMMARY_MAX_NEW_TOKENS")
                .unwrap_or(defaults.summary_max_new_tokens),
            http_timeout_secs: parsed_var("HTTP_TIMEOUT_SECS").unwrap_or(defaults.http_timeout_secs),
            retrieval_top_k: parsed_var("RETRIEVAL_TOP_K").unwrap_or(defaults.retrieval_top_k),
            history_retention: parsed_var("HISTORY_RETENTION"),
        })
    }

    /// Both API credentials, or a `MissingConfig` naming every absent variable.
    pub fn api_keys(&self) -> Result<(&str, &str)> {
        match (self.newsapi_key.as_deref(), self.huggingface_token.as_deref()) {
            (Some(news), Some(hf)) => Ok((news, hf)),
            (news, hf) => {
                let mut missing = Vec::new();
                if news.is_none() {
                    missing.push("NEWSAPI_KEY".to_string());
                }
                if hf.is_none() {
                    missing.push("HUGGINGFACEHUB_API_TOKEN".to_string());
                }
                Err(Error::MissingConfig(missing))
            }
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
