//! Text embedding backends.
//!
//! With the `embeddings` feature the MiniLM model from `fastembed` is used.
//! Otherwise a hashed bag-of-words embedder keeps retrieval working offline.

use tracing::warn;

#[cfg(feature = "embeddings")]
use std::sync::Mutex;

#[cfg(feature = "embeddings")]
use fastembed::{InitOptions, TextEmbedding};

#[cfg(feature = "embeddings")]
use crate::error::Error;
use crate::error::Result;

/// Dimension shared by MiniLM-L6-v2 and the hashing fallback.
pub const EMBEDDING_DIM: usize = 384;

/// Maps texts to fixed-size vectors.
pub trait Embedder: Send + Sync {
    /// Identifier persisted next to indexes so stale vectors can be detected.
    fn model_name(&self) -> &str;
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// MiniLM sentence embeddings via fastembed.
#[cfg(feature = "embeddings")]
pub struct FastEmbedder {
    model: Mutex<TextEmbedding>,
}

#[cfg(feature = "embeddings")]
impl FastEmbedder {
    pub fn try_new() -> Result<Self> {
        let model = TextEmbedding::try_new(InitOptions::default())
            .map_err(|e| Error::Embedding(e.to_string()))?;
        Ok(Self {
            model: Mutex::new(model),
        })
    }
}

#[cfg(feature = "embeddings")]
impl Embedder for FastEmbedder {
    fn model_name(&self) -> &str {
        "all-MiniLM-L6-v2"
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut model = self
            .model
            .lock()
            .map_err(|_| Error::Embedding("embedding model lock poisoned".into()))?;
        let documents: Vec<&str> = texts.iter().map(String::as_str).collect();
        model
            .embed(documents, None)
            .map_err(|e| Error::Embedding(e.to_string()))
    }
}

/// Feature-hashed term frequencies, L2-normalised.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dim];
        for token in tokens(text) {
            let hash = fnv1a(token.as_bytes());
            let bucket = (hash % self.dim as u64) as usize;
            let sign = if (hash >> 63) == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(EMBEDDING_DIM)
    }
}

impl Embedder for HashingEmbedder {
    fn model_name(&self) -> &str {
        "hashing-bow"
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

/// Best available embedder for this build.
pub fn default_embedder() -> Box<dyn Embedder> {
    #[cfg(feature = "embeddings")]
    {
        match FastEmbedder::try_new() {
            Ok(embedder) => return Box::new(embedder),
            Err(err) => warn!(error = %err, "fastembed unavailable; using hashing embedder"),
        }
    }
    #[cfg(not(feature = "embeddings"))]
    warn!("built without `embeddings`; using hashing embedder");
    Box::new(HashingEmbedder::default())
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1)
        .map(str::to_lowercase)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    hash
}

/// Cosine similarity; zero when either vector has no magnitude.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot = a.iter().zip(b).map(|(x, y)| x * y).sum::<f32>();
    let norm_a = a.iter().map(|v| v * v).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
