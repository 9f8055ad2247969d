//! Analysis Module
//!
//! Talks to the external services that decide what to highlight:
//! - a classifier that splits page text into rated passages (Groq)
//! - a fact checker that scores factual passages (Perplexity)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use abovesaid_server::analysis::AnalysisService;
//!
//! let service = AnalysisService::from_config(&config.analysis);
//! let spans = service.analyze(index.text()).await?;
//! let outcome = service.fact_check(spans).await?;
//! ```

mod chat;
mod fact_check;
mod locate;
mod provider;
mod service;
mod types;

pub use chat::extract_json;
pub use fact_check::{is_fact_check_candidate, merge_fact_checks, select_fact_check_candidates};
pub use locate::locate_spans;
pub use provider::{Classifier, FactChecker, GroqClassifier, PerplexityFactChecker};
pub use service::AnalysisService;
pub use types::{
    AnalysisError, ClassifiedSentence, FactCheckOutcome, FactCheckResult, MIN_TEXT_LEN,
};
