//! Shared fixtures: in-memory collaborators and a temp-dir backed app.

#![allow(dead_code)]

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use news_digest::{
    cli::App,
    config::Settings,
    data::news::{Article, NewsSource},
    error::{Error, Result},
    nlp::{embeddings::HashingEmbedder, summarizer::Summarizer, Pipeline},
};
use tempfile::TempDir;

pub fn article(title: &str, description: &str, body: &str) -> Article {
    Article {
        title: title.to_string(),
        author: Some("Staff".to_string()),
        source: Some("Example Wire".to_string()),
        url: format!("https://news.example/{}", title.to_lowercase().replace(' ', "-")),
        published_at: Some("2025-01-01T00:00:00Z".to_string()),
        description: Some(description.to_string()),
        body: body.to_string(),
    }
}

pub fn sample_articles() -> Vec<Article> {
    vec![
        article(
            "AI models reach new benchmark",
            "Researchers report large language models passing exams.",
            "Artificial intelligence labs released AI models that...",
        ),
        article(
            "Dental care costs rise",
            "Dentists warn about rising prices for dental care.",
            "Dental care providers say patients are delaying checkups...",
        ),
        article(
            "Local football club wins cup",
            "Fans celebrate in the streets.",
            "The club lifted the trophy after extra time...",
        ),
    ]
}

/// Returns the same articles for every topic.
pub struct StaticNews(pub Vec<Article>);

#[async_trait]
impl NewsSource for StaticNews {
    async fn fetch_articles(&self, _topic: &str) -> Result<Vec<Article>> {
        Ok(self.0.clone())
    }
}

pub struct FailingNews;

#[async_trait]
impl NewsSource for FailingNews {
    async fn fetch_articles(&self, _topic: &str) -> Result<Vec<Article>> {
        Err(Error::Retrieval("429 Too Many Requests".into()))
    }
}

/// Records prompts and answers with a fixed summary.
#[derive(Clone, Default)]
pub struct CannedSummarizer {
    pub reply: String,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl CannedSummarizer {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Arc::default(),
        }
    }
}

#[async_trait]
impl Summarizer for CannedSummarizer {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

pub struct FailingSummarizer;

#[async_trait]
impl Summarizer for FailingSummarizer {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(Error::Summarization("model is loading".into()))
    }
}

pub fn pipeline(news: impl NewsSource + 'static, summarizer: impl Summarizer + 'static) -> Pipeline {
    Pipeline::new(
        Box::new(news),
        Box::new(HashingEmbedder::default()),
        Box::new(summarizer),
    )
}

/// Settings pointing every path into `dir`.
pub fn settings_in(dir: &TempDir) -> Settings {
    Settings {
        user_data_path: data_path(dir),
        vector_db_dir: dir.path().join("vector_db"),
        ..Settings::default()
    }
}

pub fn data_path(dir: &TempDir) -> PathBuf {
    dir.path().join("user_data.json")
}

pub fn app_with(dir: &TempDir, pipeline: Pipeline) -> App {
    App::new(settings_in(dir)).with_pipeline(pipeline)
}
