//! Search orchestration: fetch, embed, retrieve, summarise, record.

use std::path::PathBuf;

use tracing::{info, instrument, warn};

use crate::{
    config::Settings,
    data::{
        model::SummaryType,
        news::{Article, NewsApiClient, NewsSource},
        store::UserStore,
    },
    error::Result,
    nlp::{
        embeddings::{default_embedder, Embedder},
        index::VectorIndex,
        summarizer::{self, HuggingFaceSummarizer, Summarizer},
    },
};

/// Result of a completed search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The news source had nothing for the topic.
    NoArticles,
    Summarized(SearchReport),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchReport {
    pub topic: String,
    pub summary_type: SummaryType,
    pub summary: String,
    /// Articles in the order the news source returned them.
    pub articles: Vec<Article>,
    /// Number of chunks fed to the summariser.
    pub chunks_used: usize,
}

/// The three collaborators behind `search`.
pub struct Pipeline {
    news: Box<dyn NewsSource>,
    embedder: Box<dyn Embedder>,
    summarizer: Box<dyn Summarizer>,
    top_k: usize,
    index_dir: Option<PathBuf>,
}

impl Pipeline {
    pub fn new(
        news: Box<dyn NewsSource>,
        embedder: Box<dyn Embedder>,
        summarizer: Box<dyn Summarizer>,
    ) -> Self {
        Self {
            news,
            embedder,
            summarizer,
            top_k: 5,
            index_dir: None,
        }
    }

    /// Production wiring: NewsAPI, the default embedder and Hugging Face.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let news = NewsApiClient::from_settings(settings)?;
        let summarizer = HuggingFaceSummarizer::from_settings(settings)?;
        Ok(Self::new(Box::new(news), default_embedder(), Box::new(summarizer))
            .with_top_k(settings.retrieval_top_k)
            .with_index_dir(settings.vector_db_dir.clone()))
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Persist each topic's index under `dir`.
    pub fn with_index_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.index_dir = Some(dir.into());
        self
    }

    /// Run the pipeline without touching user data.
    #[instrument(skip(self))]
    pub async fn run(&self, topic: &str, kind: SummaryType) -> Result<SearchOutcome> {
        let articles = self.news.fetch_articles(topic).await?;
        if articles.is_empty() {
            info!(%topic, "no articles found");
            return Ok(SearchOutcome::NoArticles);
        }

        let index = VectorIndex::build(topic, &articles, self.embedder.as_ref())?;
        if let Some(dir) = &self.index_dir {
            if let Err(err) = index.save(dir) {
                warn!(error = %err, "could not persist vector index");
            }
        }

        let chunks = index.query(topic, self.top_k, self.embedder.as_ref())?;
        let summary = summarizer::summarize(self.summarizer.as_ref(), &chunks, topic, kind).await?;
        Ok(SearchOutcome::Summarized(SearchReport {
            topic: topic.to_string(),
            summary_type: kind,
            summary,
            articles,
            chunks_used: chunks.len(),
        }))
    }

    /// Search with the user's preferred summary type and record the search
    /// in history once a summary has been produced.
    pub async fn search(&self, store: &mut UserStore, topic: &str) -> Result<SearchOutcome> {
        let kind = store.summary_type();
        let outcome = self.run(topic, kind).await?;
        if let SearchOutcome::Summarized(report) = &outcome {
            store.record_search(&report.topic, report.summary_type)?;
        }
        Ok(outcome)
    }
}
