//! Analysis Types

use serde::{Deserialize, Serialize};

use crate::highlight::{AnnotationSpan, Category, ImportanceLevel};

/// Minimum number of bytes of text worth sending to the classifier
pub const MIN_TEXT_LEN: usize = 50;

/// One passage as returned by the classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedSentence {
    pub text: String,
    pub importance: ImportanceLevel,
    #[serde(rename = "type")]
    pub category: Category,
}

/// Verdict for one statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheckResult {
    pub sentence: String,
    /// 0-100, may arrive as a float
    pub confidence: f64,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub sources: Vec<String>,
}

/// Highlights after a fact-check pass
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactCheckOutcome {
    pub highlights: Vec<AnnotationSpan>,
    pub verified_count: usize,
}

/// Errors from the external analysis services
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Rate limit exceeded, try again in a moment")]
    RateLimited,

    #[error("Text is too long for the analysis service")]
    PayloadTooLarge,

    #[error("{0} API key is not configured")]
    NotConfigured(String),

    #[error("Not enough text to analyze: {actual} bytes, need at least {min}")]
    InsufficientText { actual: usize, min: usize },

    #[error("Analysis failed: {0}")]
    Unknown(String),
}
