//! News Digest - fetch, embed and summarise news on a topic
//!
//! The library keeps a single user's saved topics, preferred summary type
//! and search history in a JSON document, and drives the search pipeline:
//!
//! - [`data::store::UserStore`] owns the document and rewrites it atomically
//!   after every change
//! - [`data::news`] retrieves articles from NewsAPI
//! - [`nlp::index::VectorIndex`] embeds articles and returns the chunks most
//!   relevant to the topic
//! - [`nlp::summarizer`] prompts a hosted model for a brief or detailed summary
//!
//! # Example
//!
//! ```no_run
//! use news_digest::data::store::UserStore;
//!
//! let mut store = UserStore::open("user_data.json");
//! store.save_topic("AI")?;
//! store.set_summary_type("detailed")?;
//! for entry in store.list_history(Some(10)) {
//!     println!("{} ({})", entry.topic, entry.summary_type);
//! }
//! # Ok::<(), news_digest::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod nlp;

pub use data::model::{Document, HistoryEntry, Preferences, SummaryType};
pub use data::store::UserStore;
pub use error::Error;
