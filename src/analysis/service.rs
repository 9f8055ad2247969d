//! Analysis Service
//!
//! Orchestrates the classifier and fact checker. Produces span lists only;
//! applying them to a page is up to the caller.

use std::sync::Arc;

use tracing::{debug, info};

use super::{
    fact_check::{merge_fact_checks, select_fact_check_candidates},
    locate::locate_spans,
    provider::{Classifier, FactChecker, GroqClassifier, PerplexityFactChecker},
    types::{AnalysisError, FactCheckOutcome, MIN_TEXT_LEN},
};
use crate::config::AnalysisConfig;
use crate::highlight::AnnotationSpan;

#[derive(Clone)]
pub struct AnalysisService {
    classifier: Arc<dyn Classifier>,
    fact_checker: Option<Arc<dyn FactChecker>>,
}

impl AnalysisService {
    pub fn new(classifier: Arc<dyn Classifier>, fact_checker: Option<Arc<dyn FactChecker>>) -> Self {
        Self {
            classifier,
            fact_checker,
        }
    }

    /// Groq classifier and Perplexity fact checker from configuration
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(
            Arc::new(GroqClassifier::new(config.classifier.clone())),
            Some(Arc::new(PerplexityFactChecker::new(config.fact_check.clone()))),
        )
    }

    pub fn has_fact_checker(&self) -> bool {
        self.fact_checker.is_some()
    }

    /// Classify `text` and locate the passages in it
    ///
    /// Offsets in the returned spans are byte offsets into `text`.
    pub async fn analyze(&self, text: &str) -> Result<Vec<AnnotationSpan>, AnalysisError> {
        let actual = text.trim().len();
        if actual < MIN_TEXT_LEN {
            return Err(AnalysisError::InsufficientText {
                actual,
                min: MIN_TEXT_LEN,
            });
        }

        let sentences = self.classifier.classify(text).await?;
        let spans = locate_spans(text, &sentences);

        info!(
            "Located {} of {} classified passage(s)",
            spans.len(),
            sentences.len()
        );
        Ok(spans)
    }

    /// Verify the factual spans and merge the verdicts
    pub async fn fact_check(
        &self,
        mut spans: Vec<AnnotationSpan>,
    ) -> Result<FactCheckOutcome, AnalysisError> {
        let fact_checker = self
            .fact_checker
            .as_ref()
            .ok_or_else(|| AnalysisError::NotConfigured("Fact checker".to_string()))?;

        let mut sentences: Vec<String> = Vec::new();
        for span in select_fact_check_candidates(&spans) {
            if !sentences.contains(&span.text) {
                sentences.push(span.text.clone());
            }
        }

        if sentences.is_empty() {
            debug!("No fact-check candidates among {} span(s)", spans.len());
        } else {
            let results = fact_checker.fact_check(&sentences).await?;
            let merged = merge_fact_checks(&mut spans, &results);
            info!(
                "{} returned {} verdict(s), merged into {} span(s)",
                fact_checker.name(),
                results.len(),
                merged
            );
        }

        let verified_count = spans.iter().filter(|span| span.verified).count();
        Ok(FactCheckOutcome {
            highlights: spans,
            verified_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::{ClassifiedSentence, FactCheckResult};
    use crate::highlight::{Category, ImportanceLevel};
    use async_trait::async_trait;
    use std::sync::Mutex;

    const TEXT: &str = "Water boils at 100 degrees Celsius. This is important. Consider the island.";

    struct FixedClassifier(Vec<ClassifiedSentence>);

    #[async_trait]
    impl Classifier for FixedClassifier {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn classify(&self, _text: &str) -> Result<Vec<ClassifiedSentence>, AnalysisError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct RecordingChecker {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl FactChecker for RecordingChecker {
        fn name(&self) -> &str {
            "recording"
        }

        async fn fact_check(&self, sentences: &[String]) -> Result<Vec<FactCheckResult>, AnalysisError> {
            self.seen.lock().unwrap().extend(sentences.iter().cloned());
            Ok(sentences
                .iter()
                .map(|s| FactCheckResult {
                    sentence: s.clone(),
                    confidence: 80.0,
                    explanation: String::new(),
                    sources: vec!["https://www.example.org/page".to_string()],
                })
                .collect())
        }
    }

    struct FailingChecker;

    #[async_trait]
    impl FactChecker for FailingChecker {
        fn name(&self) -> &str {
            "failing"
        }

        async fn fact_check(&self, _sentences: &[String]) -> Result<Vec<FactCheckResult>, AnalysisError> {
            Err(AnalysisError::RateLimited)
        }
    }

    fn classified(text: &str, category: Category) -> ClassifiedSentence {
        ClassifiedSentence {
            text: text.to_string(),
            importance: ImportanceLevel::new(4).unwrap(),
            category,
        }
    }

    fn service(checker: Option<Arc<dyn FactChecker>>) -> AnalysisService {
        AnalysisService::new(
            Arc::new(FixedClassifier(vec![
                classified("Water boils at 100 degrees Celsius.", Category::MainClaim),
                classified("This is important.", Category::Reasoning),
                classified("Consider the island.", Category::Example),
                classified("Never said this.", Category::Example),
            ])),
            checker,
        )
    }

    #[tokio::test]
    async fn test_analyze_locates_spans() {
        let spans = service(None).analyze(TEXT).await.unwrap();

        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].range(), 0..35);
        assert_eq!(spans[2].text, "Consider the island.");
    }

    #[tokio::test]
    async fn test_analyze_rejects_short_text() {
        let result = service(None).analyze("   too short   ").await;
        assert!(matches!(
            result,
            Err(AnalysisError::InsufficientText { actual: 9, min: 50 })
        ));
    }

    #[tokio::test]
    async fn test_fact_check_only_sends_candidates() {
        let checker = Arc::new(RecordingChecker::default());
        let service = service(Some(checker.clone()));
        let spans = service.analyze(TEXT).await.unwrap();

        let outcome = service.fact_check(spans).await.unwrap();

        assert_eq!(
            *checker.seen.lock().unwrap(),
            vec![
                "Water boils at 100 degrees Celsius.".to_string(),
                "This is important.".to_string()
            ]
        );
        assert_eq!(outcome.verified_count, 2);
        assert!(!outcome.highlights[2].verified);
    }

    #[tokio::test]
    async fn test_fact_check_errors_propagate() {
        let service = service(Some(Arc::new(FailingChecker)));
        let spans = service.analyze(TEXT).await.unwrap();

        let result = service.fact_check(spans).await;
        assert!(matches!(result, Err(AnalysisError::RateLimited)));
    }

    #[tokio::test]
    async fn test_fact_check_without_checker() {
        let result = service(None).fact_check(Vec::new()).await;
        assert!(matches!(result, Err(AnalysisError::NotConfigured(_))));
    }
}
