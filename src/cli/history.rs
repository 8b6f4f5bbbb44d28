//! `history` and `clear`.

use std::io::Write;

use anyhow::Result;
use tracing::instrument;

use crate::data::store::UserStore;

pub fn list(store: &UserStore, limit: usize, out: &mut dyn Write) -> Result<()> {
    let entries = store.list_history(Some(limit));
    if entries.is_empty() {
        writeln!(out, "Your search history is empty.")?;
        return Ok(());
    }
    writeln!(out, "Your search history:")?;
    for (i, entry) in entries.iter().enumerate() {
        writeln!(
            out,
            "{}. {} ({}) - {}",
            i + 1,
            entry.topic,
            entry.summary_type,
            entry.timestamp.format("%Y-%m-%d")
        )?;
    }
    Ok(())
}

#[instrument(skip(store, out))]
pub fn clear(store: &mut UserStore, out: &mut dyn Write) -> Result<()> {
    store.clear_history()?;
    writeln!(out, "Search history cleared.")?;
    Ok(())
}
