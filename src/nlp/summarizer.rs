//! Prompt construction and the hosted text-generation client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    config::Settings,
    data::model::SummaryType,
    error::{Error, Result},
    nlp::index::ScoredChunk,
};

const BRIEF_HEADLINES: usize = 5;
const DETAILED_ITEMS: usize = 3;
const DESCRIPTION_CHARS: usize = 150;

/// Text-generation backend.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Summarise retrieved chunks about `topic` in the requested mode.
#[instrument(skip(summarizer, chunks), fields(chunk_count = chunks.len()))]
pub async fn summarize(
    summarizer: &dyn Summarizer,
    chunks: &[ScoredChunk],
    topic: &str,
    kind: SummaryType,
) -> Result<String> {
    let prompt = match kind {
        SummaryType::Brief => brief_prompt(topic, chunks),
        SummaryType::Detailed => detailed_prompt(topic, chunks),
    }
    .ok_or_else(|| Error::Summarization("no article content to summarise".into()))?;
    debug!(%prompt, "summary prompt");
    let raw = summarizer.complete(&prompt).await?;
    finalize_summary(&raw, topic)
}

/// One-to-two sentence prompt over the leading headlines.
pub fn brief_prompt(topic: &str, chunks: &[ScoredChunk]) -> Option<String> {
    let titles: Vec<&str> = chunks
        .iter()
        .map(|c| c.chunk.title.trim())
        .filter(|t| !t.is_empty())
        .take(BRIEF_HEADLINES)
        .collect();
    if titles.is_empty() {
        return None;
    }
    Some(format!(
        "Summarize these news headlines in 1-2 sentences, focusing specifically on '{topic}':\n\n\
         {}\n\n\
         Remember: Your summary should be about '{topic}' based on these headlines.\n\
         Brief summary:",
        titles.join(" | ")
    ))
}

/// Paragraph prompt over numbered headlines with shortened descriptions.
pub fn detailed_prompt(topic: &str, chunks: &[ScoredChunk]) -> Option<String> {
    let mut items = Vec::new();
    for (i, scored) in chunks
        .iter()
        .filter(|c| !c.chunk.title.trim().is_empty())
        .take(DETAILED_ITEMS)
        .enumerate()
    {
        items.push(format!("{}. {}", i + 1, scored.chunk.title.trim()));
        if let Some(desc) = scored
            .chunk
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
        {
            let short: String = desc.chars().take(DESCRIPTION_CHARS).collect();
            items.push(format!("   {short}..."));
        }
    }
    if items.is_empty() {
        return None;
    }
    Some(format!(
        "Write a comprehensive paragraph summarizing these news items, focusing specifically on '{topic}':\n\n\
         {}\n\n\
         Remember: Your summary should be about '{topic}' based on these news items.\n\
         Detailed summary:",
        items.join("\n")
    ))
}

/// Trim model output and note the topic when the text never mentions it.
pub fn finalize_summary(raw: &str, topic: &str) -> Result<String> {
    let summary = raw.trim();
    if summary.is_empty() {
        return Err(Error::Summarization("model returned an empty summary".into()));
    }
    let topic = topic.trim();
    if topic.is_empty() || summary.to_lowercase().contains(&topic.to_lowercase()) {
        return Ok(summary.to_string());
    }
    Ok(format!(
        "{summary}\n\nNote: This summary is based on articles about {topic}."
    ))
}

/// Hugging Face Inference API text-generation client.
pub struct HuggingFaceSummarizer {
    client: Client,
    endpoint: String,
    token: String,
    max_new_tokens: usize,
}

impl HuggingFaceSummarizer {
    pub fn new(
        base_url: &str,
        model: &str,
        token: impl Into<String>,
        max_new_tokens: usize,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent("news-digest/0.1")
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Summarization(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: format!("{}/{}", base_url.trim_end_matches('/'), model),
            token: token.into(),
            max_new_tokens,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let (_, token) = settings.api_keys()?;
        Self::new(
            &settings.hf_inference_url,
            &settings.summary_model,
            token,
            settings.summary_max_new_tokens,
            settings.http_timeout(),
        )
    }
}

#[async_trait]
impl Summarizer for HuggingFaceSummarizer {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let body = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters {
                max_new_tokens: self.max_new_tokens,
                return_full_text: false,
            },
        };
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Summarization(format!("request failed: {e}")))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| Error::Summarization(format!("reading response: {e}")))?;
        let parsed: Option<GenerationResponse> = serde_json::from_str(&text).ok();
        match (status.is_success(), parsed) {
            (_, Some(GenerationResponse::Failure { error })) => {
                Err(Error::Summarization(format!("{status}: {error}")))
            }
            (true, Some(GenerationResponse::Batch(generations))) => generations
                .into_iter()
                .next()
                .map(|g| g.generated_text)
                .ok_or_else(|| Error::Summarization("response had no generations".into())),
            (true, Some(GenerationResponse::Single(generation))) => Ok(generation.generated_text),
            (true, None) => Err(Error::Summarization(format!(
                "unexpected response body: {}",
                text.chars().take(200).collect::<String>()
            ))),
            (false, _) => Err(Error::Summarization(format!(
                "{status}: {}",
                text.chars().take(200).collect::<String>()
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_new_tokens: usize,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    Batch(Vec<Generation>),
    Failure { error: String },
    Single(Generation),
}

#[derive(Debug, Deserialize)]
struct Generation {
    generated_text: String,
}
