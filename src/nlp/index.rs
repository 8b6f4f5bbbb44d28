//! In-memory cosine index over article chunks, persisted per topic.

use std::{
    cmp::Ordering,
    fs,
    path::{Path, PathBuf},
};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    data::news::Article,
    error::{Error, Result},
    nlp::embeddings::{cosine, Embedder},
};

static INVALID_NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_-]").expect("static regex"));

/// Retrievable unit of text with the metadata needed to cite it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub title: String,
    pub url: String,
    pub source: Option<String>,
    pub published_at: Option<String>,
    pub description: Option<String>,
    pub text: String,
}

impl From<&Article> for Chunk {
    fn from(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            url: article.url.clone(),
            source: article.source.clone(),
            published_at: article.published_at.clone(),
            description: article.description.clone(),
            text: article.document_text(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    chunk: Chunk,
    vector: Vec<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    collection: String,
    model: String,
    entries: Vec<Entry>,
}

impl VectorIndex {
    /// Embed every article with usable text under the collection for `topic`.
    pub fn build(topic: &str, articles: &[Article], embedder: &dyn Embedder) -> Result<Self> {
        let chunks: Vec<Chunk> = articles
            .iter()
            .filter(|a| !a.title.trim().is_empty() || !a.body.trim().is_empty())
            .map(Chunk::from)
            .collect();
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let vectors = if texts.is_empty() {
            Vec::new()
        } else {
            embedder.embed(&texts)?
        };
        if vectors.len() != chunks.len() {
            return Err(Error::Embedding(format!(
                "expected {} vectors, got {}",
                chunks.len(),
                vectors.len()
            )));
        }
        let entries = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, vector)| Entry { chunk, vector })
            .collect::<Vec<_>>();
        let collection = collection_name(topic);
        debug!(%collection, chunks = entries.len(), "built vector index");
        Ok(Self {
            collection,
            model: embedder.model_name().to_string(),
            entries,
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `k` chunks most similar to `query`, best first.
    pub fn query(&self, query: &str, k: usize, embedder: &dyn Embedder) -> Result<Vec<ScoredChunk>> {
        if self.entries.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        if embedder.model_name() != self.model {
            return Err(Error::Embedding(format!(
                "index built with {} cannot be queried with {}",
                self.model,
                embedder.model_name()
            )));
        }
        let query_vec = embedder
            .embed(&[query.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("no vector returned for query".into()))?;
        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|e| ScoredChunk {
                chunk: e.chunk.clone(),
                score: cosine(&query_vec, &e.vector),
            })
            .collect();
        // Stable sort keeps fetch order among equal scores.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    /// Persist to `<dir>/<collection>/index.json`.
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        let path = index_path(dir, &self.collection);
        let io_err = |source: std::io::Error| Error::Storage {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_vec(self)
            .map_err(|e| Error::Embedding(format!("serialising index: {e}")))?;
        fs::write(&path, json).map_err(io_err)?;
        info!(path = %path.display(), chunks = self.entries.len(), "saved vector index");
        Ok(path)
    }

    /// Load the index a previous search saved for `topic`, if any. Searches
    /// always rebuild; this is for inspecting what was persisted.
    pub fn load(dir: &Path, topic: &str) -> Result<Option<Self>> {
        let path = index_path(dir, &collection_name(topic));
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read(&path).map_err(|source| Error::Storage {
            path: path.clone(),
            source,
        })?;
        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|source| Error::StorageCorruption { path, source })
    }
}

fn index_path(dir: &Path, collection: &str) -> PathBuf {
    dir.join(collection).join("index.json")
}

/// Directory-safe collection name for a topic.
///
/// Only `[A-Za-z0-9_-]` survive, the name starts with a letter, is at least
/// three characters long and at most 63.
pub fn collection_name(topic: &str) -> String {
    let replaced = INVALID_NAME_CHARS.replace_all(topic, "_");
    let mut name = replaced.trim_matches('_').to_string();
    if !name.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        name = format!("topic_{name}");
    }
    if name.len() < 3 {
        name.push_str("_collection");
    }
    name.truncate(63);
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_names_are_directory_safe() {
        assert_eq!(collection_name("dental care"), "dental_care");
        assert_eq!(collection_name("AI"), "AI_collection");
        assert_eq!(collection_name("5G rollout"), "topic_5G_rollout");
        assert_eq!(collection_name("!!!"), "topic_");
        assert_eq!(collection_name(&"x".repeat(80)).len(), 63);
    }
}
