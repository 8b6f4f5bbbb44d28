//! Structured logging bootstrap using `tracing`.

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber. Logs go to stderr at `warn` unless
/// `RUST_LOG` says otherwise, leaving stdout to the shell.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env()?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_line_number(true)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(fmt_layer).try_init()?;
    tracing::debug!("tracing initialised");
    Ok(())
}
