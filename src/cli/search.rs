//! `search <topic>`: fetch, summarise, print sources.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::{
    cli::App,
    nlp::{Pipeline, SearchOutcome, SearchReport},
};

const RULE_WIDTH: usize = 80;
const SOURCES_SHOWN: usize = 5;

#[instrument(skip(app, out))]
pub async fn run(app: &mut App, topic: &str, out: &mut dyn Write) -> Result<()> {
    let topic = topic.trim();
    if topic.is_empty() {
        writeln!(out, "Please specify a topic to search for.")?;
        return Ok(());
    }

    let App {
        settings,
        store,
        pipeline,
    } = app;
    let pipeline = match pipeline {
        Some(pipeline) => pipeline,
        slot @ None => slot.insert(
            Pipeline::from_settings(settings).context("search is not configured")?,
        ),
    };

    writeln!(out, "Searching for news on: {topic}")?;
    writeln!(out, "Summary type: {}", store.summary_type())?;
    out.flush()?;

    match pipeline.search(store, topic).await? {
        SearchOutcome::NoArticles => writeln!(out, "No articles found for this topic.")?,
        SearchOutcome::Summarized(report) => {
            info!(chunks = report.chunks_used, "search complete");
            print_report(&report, out)?;
        }
    }
    Ok(())
}

fn print_report(report: &SearchReport, out: &mut dyn Write) -> Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    let heading = format!("SUMMARY: {}", report.topic.to_uppercase());
    writeln!(out, "Found {} articles.", report.articles.len())?;
    writeln!(out, "\n{rule}")?;
    writeln!(out, "{heading:^width$}", width = RULE_WIDTH)?;
    writeln!(out, "{rule}")?;
    writeln!(out, "\n{}\n", report.summary)?;
    writeln!(out, "{rule}")?;
    writeln!(out, "\nSources:")?;
    for (i, article) in report.articles.iter().take(SOURCES_SHOWN).enumerate() {
        writeln!(
            out,
            "{}. {} - {}",
            i + 1,
            article.title,
            article.source.as_deref().unwrap_or("Unknown")
        )?;
        let url = if article.url.is_empty() {
            "No URL"
        } else {
            article.url.as_str()
        };
        writeln!(out, "   URL: {url}")?;
    }
    Ok(())
}
