//! `save`, `list` and `remove` over saved topics.

use std::io::Write;

use anyhow::Result;
use tracing::instrument;

use crate::{data::store::UserStore, error::Error};

#[instrument(skip(store, out))]
pub fn save(store: &mut UserStore, topic: &str, out: &mut dyn Write) -> Result<()> {
    match store.save_topic(topic) {
        Ok(true) => writeln!(out, "Saved '{}' to your topics.", topic.trim())?,
        Ok(false) => writeln!(out, "'{}' is already in your topics.", topic.trim())?,
        Err(err @ Error::InvalidArgument(_)) => writeln!(out, "{err}")?,
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

pub fn list(store: &UserStore, out: &mut dyn Write) -> Result<()> {
    let topics = store.list_topics();
    if topics.is_empty() {
        writeln!(out, "You haven't saved any topics yet.")?;
        return Ok(());
    }
    writeln!(out, "Your saved topics:")?;
    for (i, topic) in topics.iter().enumerate() {
        writeln!(out, "{}. {topic}", i + 1)?;
    }
    Ok(())
}

#[instrument(skip(store, out))]
pub fn remove(store: &mut UserStore, topic: &str, out: &mut dyn Write) -> Result<()> {
    match store.remove_topic(topic) {
        Ok(removed) => writeln!(out, "Removed '{removed}' from your topics.")?,
        Err(err @ Error::NotFound(_)) => writeln!(out, "{err}.")?,
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
