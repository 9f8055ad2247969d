//! Analysis Providers
//!
//! Defines the classifier and fact-checker traits and their HTTP-backed
//! implementations.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use super::chat::{complete, extract_json};
use super::types::{AnalysisError, ClassifiedSentence, FactCheckResult};
use crate::config::ProviderConfig;
use crate::highlight::Category;

/// Splits text into passages and rates each one
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Provider name, for logs and errors
    fn name(&self) -> &str;

    /// Classify `text`; returned passages are expected verbatim and in order
    async fn classify(&self, text: &str) -> Result<Vec<ClassifiedSentence>, AnalysisError>;
}

/// Verifies factual statements against the web
#[async_trait]
pub trait FactChecker: Send + Sync {
    fn name(&self) -> &str;

    async fn fact_check(&self, sentences: &[String]) -> Result<Vec<FactCheckResult>, AnalysisError>;
}

/// Groq-hosted classifier
pub struct GroqClassifier {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl GroqClassifier {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Classifier for GroqClassifier {
    fn name(&self) -> &str {
        "Groq"
    }

    async fn classify(&self, text: &str) -> Result<Vec<ClassifiedSentence>, AnalysisError> {
        let prompt = classifier_prompt(text);
        let completion = complete(&self.client, self.name(), &self.config, &prompt).await?;
        let sentences = parse_sentences(&completion.content)?;

        info!("{} classified {} passage(s)", self.name(), sentences.len());
        Ok(sentences)
    }
}

/// Perplexity-backed fact checker
pub struct PerplexityFactChecker {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl PerplexityFactChecker {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl FactChecker for PerplexityFactChecker {
    fn name(&self) -> &str {
        "Perplexity"
    }

    async fn fact_check(&self, sentences: &[String]) -> Result<Vec<FactCheckResult>, AnalysisError> {
        if sentences.is_empty() {
            return Ok(Vec::new());
        }

        let prompt = fact_check_prompt(sentences);
        let completion = complete(&self.client, self.name(), &self.config, &prompt).await?;
        let results = parse_fact_checks(&completion.content, &completion.citations)?;

        info!(
            "{} checked {} of {} statement(s)",
            self.name(),
            results.len(),
            sentences.len()
        );
        Ok(results)
    }
}

fn classifier_prompt(text: &str) -> String {
    let categories: Vec<String> = Category::ALL
        .iter()
        .map(|c| format!("   - \"{}\"", c.label()))
        .collect();

    format!(
        r#"You are an expert text analyzer. Analyze the following text and identify the importance and type of each clause or phrase.

Split the text ONLY at punctuation marks (periods, commas, semicolons, colons, question marks, exclamation marks). Each segment must be a complete clause between punctuation marks. Never split in the middle of a word or phrase.

For each segment, provide:
1. importance: a number from 1-5 (1 = least important, 5 = most important)
2. type: one of
{}

Return ONLY a JSON object with this structure:
{{
  "sentences": [
    {{"text": "Complete clause or phrase between punctuation.", "importance": 5, "type": "Main Claim"}}
  ]
}}

Copy each segment EXACTLY as it appears in the text, including its trailing punctuation.

Text to analyze:
{}"#,
        categories.join("\n"),
        text
    )
}

fn fact_check_prompt(sentences: &[String]) -> String {
    let list: Vec<String> = sentences
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. \"{}\"", i + 1, s))
        .collect();

    format!(
        r#"You are a fact-checking expert with access to real-time web search. Evaluate the factual accuracy of the following statements. For each statement, provide:

1. A confidence score (0-100) where:
   - 100 = completely verified and accurate
   - 75-99 = likely accurate with strong supporting evidence
   - 50-74 = partially accurate or context-dependent
   - 25-49 = questionable or lacking strong evidence
   - 0-24 = likely false or misleading
2. A brief explanation citing your sources
3. The source URLs you used (if any)

Return ONLY a JSON array with this structure:
[
  {{"sentence": "statement text", "confidence": 85, "explanation": "Verified by multiple sources", "sources": ["https://example.com/article"]}}
]

Statements to verify:
{}"#,
        list.join("\n")
    )
}

/// Parse `{"sentences": [...]}`, dropping entries that do not validate
fn parse_sentences(content: &str) -> Result<Vec<ClassifiedSentence>, AnalysisError> {
    let value: Value = serde_json::from_str(extract_json(content))
        .map_err(|e| AnalysisError::Unknown(format!("Classifier returned invalid JSON: {}", e)))?;

    let items = value
        .get("sentences")
        .and_then(Value::as_array)
        .ok_or_else(|| AnalysisError::Unknown("Classifier response has no sentences".to_string()))?;

    let mut sentences = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<ClassifiedSentence>(item.clone()) {
            Ok(sentence) if !sentence.text.is_empty() => sentences.push(sentence),
            Ok(_) => {}
            Err(e) => debug!("Dropping classifier entry {}: {}", item, e),
        }
    }
    Ok(sentences)
}

/// Parse a JSON array of verdicts
///
/// Results without sources of their own inherit the response citations.
fn parse_fact_checks(
    content: &str,
    citations: &[String],
) -> Result<Vec<FactCheckResult>, AnalysisError> {
    let value: Value = serde_json::from_str(extract_json(content))
        .map_err(|e| AnalysisError::Unknown(format!("Fact checker returned invalid JSON: {}", e)))?;

    let items = value
        .as_array()
        .ok_or_else(|| AnalysisError::Unknown("Fact checker response is not an array".to_string()))?;

    let mut results = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<FactCheckResult>(item.clone()) {
            Ok(mut result) => {
                if result.sources.is_empty() {
                    result.sources = citations.to_vec();
                }
                results.push(result);
            }
            Err(e) => debug!("Dropping fact-check entry {}: {}", item, e),
        }
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sentences_drops_invalid_entries() {
        let content = r#"```json
{"sentences": [
  {"text": "Water boils at 100 degrees Celsius.", "importance": 5, "type": "Main Claim"},
  {"text": "Bad importance.", "importance": 9, "type": "Main Claim"},
  {"text": "Unknown type.", "importance": 2, "type": "Rumour"},
  {"text": "This is important.", "importance": 3, "type": "Reasoning / Explanation"}
]}
```"#;
        let sentences = parse_sentences(content).unwrap();

        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].category, Category::MainClaim);
        assert_eq!(sentences[1].importance.get(), 3);
    }

    #[test]
    fn test_parse_sentences_rejects_garbage() {
        assert!(matches!(
            parse_sentences("not json at all"),
            Err(AnalysisError::Unknown(_))
        ));
        assert!(matches!(
            parse_sentences("{\"other\": []}"),
            Err(AnalysisError::Unknown(_))
        ));
    }

    #[test]
    fn test_parse_fact_checks_falls_back_to_citations() {
        let content = r#"[
  {"sentence": "A", "confidence": 92.5, "explanation": "ok", "sources": ["https://one.example"]},
  {"sentence": "B", "confidence": 40}
]"#;
        let citations = vec!["https://cited.example".to_string()];
        let results = parse_fact_checks(content, &citations).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].sources, vec!["https://one.example".to_string()]);
        assert_eq!(results[1].sources, citations);
        assert_eq!(results[1].explanation, "");
    }

    #[test]
    fn test_prompts_embed_input() {
        assert!(classifier_prompt("Some text.").ends_with("Some text."));
        assert!(classifier_prompt("x").contains("\"Counterpoint / Caveat\""));

        let prompt = fact_check_prompt(&["One.".to_string(), "Two.".to_string()]);
        assert!(prompt.ends_with("1. \"One.\"\n2. \"Two.\""));
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let classifier = GroqClassifier::new(ProviderConfig::groq());
        let result = classifier.classify("Some text to classify.").await;
        assert!(matches!(result, Err(AnalysisError::NotConfigured(_))));

        let checker = PerplexityFactChecker::new(ProviderConfig::perplexity());
        assert!(checker.fact_check(&[]).await.unwrap().is_empty());
        let result = checker.fact_check(&["Claim.".to_string()]).await;
        assert!(matches!(result, Err(AnalysisError::NotConfigured(_))));
    }
}
