//! JSON-file backed store for saved topics, summary preference and search history.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, info, instrument, warn};

use crate::{
    data::model::{Document, HistoryEntry, SummaryType},
    error::{Error, Result},
};

/// Owns the user document and rewrites the backing file after every change.
///
/// Mutations are applied to a copy which only replaces the in-memory document
/// once it has been written, so a failed write leaves both sides unchanged.
#[derive(Debug)]
pub struct UserStore {
    path: PathBuf,
    document: Document,
    history_retention: Option<usize>,
}

impl UserStore {
    /// Load the document at `path`, starting empty when the file is missing,
    /// unreadable or corrupt.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let document = match read_document(&path) {
            Ok(Some(mut document)) => {
                let dropped = document.preferences.dedupe_topics();
                if dropped > 0 {
                    warn!(path = %path.display(), dropped, "ignoring duplicate saved topics");
                }
                debug!(
                    path = %path.display(),
                    topics = document.preferences.topics.len(),
                    history = document.history.len(),
                    "loaded user data"
                );
                document
            }
            Ok(None) => {
                debug!(path = %path.display(), "no user data yet; starting empty");
                Document::default()
            }
            Err(err) => {
                warn!(error = %err, "discarding unusable user data");
                Document::default()
            }
        };
        Self {
            path,
            document,
            history_retention: None,
        }
    }

    /// Keep at most `limit` history entries, dropping the oldest on append.
    pub fn with_history_retention(mut self, limit: Option<usize>) -> Self {
        self.history_retention = limit.filter(|n| *n > 0);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Add a topic unless an equal one (ignoring case) is already saved.
    /// Returns whether the topic was inserted.
    #[instrument(skip(self))]
    pub fn save_topic(&mut self, topic: &str) -> Result<bool> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(Error::InvalidArgument("topic must not be empty".into()));
        }
        if self.document.preferences.topic_position(topic).is_some() {
            return Ok(false);
        }
        let mut next = self.document.clone();
        next.preferences.topics.push(topic.to_string());
        self.commit(next)?;
        info!(%topic, "saved topic");
        Ok(true)
    }

    /// Remove a saved topic, returning the spelling it was stored under.
    #[instrument(skip(self))]
    pub fn remove_topic(&mut self, topic: &str) -> Result<String> {
        let idx = self
            .document
            .preferences
            .topic_position(topic)
            .ok_or_else(|| Error::NotFound(topic.trim().to_string()))?;
        let mut next = self.document.clone();
        let removed = next.preferences.topics.remove(idx);
        self.commit(next)?;
        info!(topic = %removed, "removed topic");
        Ok(removed)
    }

    pub fn list_topics(&self) -> &[String] {
        &self.document.preferences.topics
    }

    pub fn summary_type(&self) -> SummaryType {
        self.document.preferences.summary_type
    }

    /// Parse and store the preferred summary type.
    #[instrument(skip(self))]
    pub fn set_summary_type(&mut self, kind: &str) -> Result<SummaryType> {
        let kind: SummaryType = kind.parse()?;
        let mut next = self.document.clone();
        next.preferences.summary_type = kind;
        self.commit(next)?;
        Ok(kind)
    }

    /// Append a history entry stamped with the current local time.
    #[instrument(skip(self))]
    pub fn record_search(&mut self, topic: &str, kind: SummaryType) -> Result<()> {
        let mut next = self.document.clone();
        next.history.push(HistoryEntry::now(topic, kind));
        if let Some(limit) = self.history_retention {
            let excess = next.history.len().saturating_sub(limit);
            next.history.drain(..excess);
        }
        self.commit(next)
    }

    /// History newest first, optionally truncated to `limit` entries.
    pub fn list_history(&self, limit: Option<usize>) -> Vec<&HistoryEntry> {
        let newest_first = self.document.history.iter().rev();
        match limit {
            Some(n) => newest_first.take(n).collect(),
            None => newest_first.collect(),
        }
    }

    /// Drop every history entry, returning how many were removed.
    #[instrument(skip(self))]
    pub fn clear_history(&mut self) -> Result<usize> {
        let cleared = self.document.history.len();
        let mut next = self.document.clone();
        next.history.clear();
        self.commit(next)?;
        info!(cleared, "cleared history");
        Ok(cleared)
    }

    fn commit(&mut self, next: Document) -> Result<()> {
        write_document(&self.path, &next)?;
        self.document = next;
        Ok(())
    }
}

/// Read a document, returning `None` if the file does not exist.
pub fn read_document(path: &Path) -> Result<Option<Document>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(Error::Storage {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| Error::StorageCorruption {
            path: path.to_path_buf(),
            source,
        })
}

/// Serialise `document` next to `path` and rename it into place.
pub fn write_document(path: &Path, document: &Document) -> Result<()> {
    let storage_err = |source: io::Error| Error::Storage {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(storage_err)?;
    }
    let json = serde_json::to_string_pretty(document)
        .map_err(|e| storage_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;
    let temp = temp_path(path);
    fs::write(&temp, json).map_err(storage_err)?;
    if let Err(source) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(storage_err(source));
    }
    debug!(path = %path.display(), "wrote user data");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "user_data.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}
