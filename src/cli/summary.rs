//! `summary [brief|detailed]`.

use std::io::Write;

use anyhow::Result;
use tracing::instrument;

use crate::{data::store::UserStore, error::Error};

#[instrument(skip(store, out))]
pub fn run(store: &mut UserStore, kind: Option<&str>, out: &mut dyn Write) -> Result<()> {
    let Some(kind) = kind.filter(|k| !k.trim().is_empty()) else {
        writeln!(out, "Current summary type: {}", store.summary_type())?;
        return Ok(());
    };
    match store.set_summary_type(kind) {
        Ok(kind) => writeln!(out, "Set summary type to '{kind}'.")?,
        Err(Error::InvalidArgument(_)) => {
            writeln!(out, "Summary type must be 'brief' or 'detailed'.")?
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
