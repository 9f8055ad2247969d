//! OpenAI-compatible chat completion client

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::types::AnalysisError;
use crate::config::ProviderConfig;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    /// Perplexity lists the URLs it searched here
    #[serde(default)]
    citations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Message content of the first choice plus any citations
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub citations: Vec<String>,
}

/// Send a single user message and return the reply
pub async fn complete(
    client: &reqwest::Client,
    provider: &str,
    config: &ProviderConfig,
    prompt: &str,
) -> Result<Completion, AnalysisError> {
    let api_key = config
        .api_key
        .as_deref()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| AnalysisError::NotConfigured(provider.to_string()))?;

    let request = ChatRequest {
        model: &config.model,
        messages: vec![ChatMessage {
            role: "user",
            content: prompt,
        }],
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    };

    debug!("Calling {} ({})", provider, config.model);

    let response = client
        .post(&config.api_url)
        .bearer_auth(api_key)
        .json(&request)
        .send()
        .await
        .map_err(|e| AnalysisError::Unknown(format!("Failed to call {}: {}", provider, e)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!("{} returned {}: {}", provider, status, body);
        return Err(match status {
            StatusCode::TOO_MANY_REQUESTS => AnalysisError::RateLimited,
            StatusCode::PAYLOAD_TOO_LARGE => AnalysisError::PayloadTooLarge,
            _ => AnalysisError::Unknown(format!("{} returned {}", provider, status)),
        });
    }

    let parsed: ChatResponse = response
        .json()
        .await
        .map_err(|e| AnalysisError::Unknown(format!("Failed to parse {} response: {}", provider, e)))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| AnalysisError::Unknown(format!("No content in {} response", provider)))?;

    Ok(Completion {
        content,
        citations: parsed.citations,
    })
}

/// Cut the JSON payload out of a model reply
///
/// Models often wrap JSON in a markdown fence or add a sentence around it.
pub fn extract_json(content: &str) -> &str {
    let trimmed = content.trim();

    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed);

    if unfenced.starts_with('{') || unfenced.starts_with('[') {
        return unfenced;
    }

    let start = unfenced.find(['{', '[']);
    let end = unfenced.rfind(['}', ']']);
    match (start, end) {
        (Some(start), Some(end)) if start < end => &unfenced[start..=end],
        _ => unfenced,
    }
}
