//! Error kinds surfaced by the store and the search pipeline.

use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Removal target is not among the saved topics.
    #[error("'{0}' is not in your saved topics")]
    NotFound(String),

    /// Unrecognised summary type, empty topic and similar bad input.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Backing file exists but could not be parsed.
    #[error("user data file {path} is corrupt: {source}")]
    StorageCorruption {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing the backing file failed.
    #[error("user data file {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to retrieve articles: {0}")]
    Retrieval(String),

    #[error("failed to embed articles: {0}")]
    Embedding(String),

    #[error("failed to generate summary: {0}")]
    Summarization(String),

    /// Required environment variables are unset.
    #[error("missing environment variables: {}", .0.join(", "))]
    MissingConfig(Vec<String>),
}
