//! User data persistence and news ingestion layer.

pub mod model;
pub mod news;
pub mod store;
