//! Embedding, retrieval and summarisation layer.

pub mod embeddings;
pub mod index;
pub mod pipeline;
pub mod summarizer;

pub use pipeline::{Pipeline, SearchOutcome, SearchReport};
