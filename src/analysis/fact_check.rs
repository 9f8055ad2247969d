//! Fact-check candidate selection and merging

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use super::types::FactCheckResult;
use crate::highlight::{AnnotationSpan, Confidence};

fn factual_indicator() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r"(?i)\b(is|are|was|were|has|have|shows|proves|demonstrates|found|discovered|reported)\b",
            )
            .ok()
        })
        .as_ref()
}

/// Whether a span makes a claim worth verifying
pub fn is_fact_check_candidate(span: &AnnotationSpan) -> bool {
    span.category.is_factual()
        || span.text.chars().any(|c| c.is_ascii_digit())
        || factual_indicator().is_some_and(|re| re.is_match(&span.text))
}

/// Spans worth sending to the fact checker, in order
pub fn select_fact_check_candidates(spans: &[AnnotationSpan]) -> Vec<&AnnotationSpan> {
    spans.iter().filter(|span| is_fact_check_candidate(span)).collect()
}

/// Merge verdicts into spans by exact sentence text
///
/// Returns the number of spans updated.
pub fn merge_fact_checks(spans: &mut [AnnotationSpan], results: &[FactCheckResult]) -> usize {
    let by_sentence: HashMap<&str, &FactCheckResult> = results
        .iter()
        .map(|result| (result.sentence.as_str(), result))
        .collect();

    let mut merged = 0;
    for span in spans.iter_mut() {
        if let Some(result) = by_sentence.get(span.text.as_str()) {
            span.confidence = Some(Confidence::from_score(result.confidence));
            span.verified = true;
            span.source_urls = result.sources.clone();
            merged += 1;
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::{Category, ImportanceLevel};

    fn span(text: &str, category: Category) -> AnnotationSpan {
        AnnotationSpan::new(text, ImportanceLevel::new(3).unwrap(), category, 0..text.len())
    }

    #[test]
    fn test_candidate_rules() {
        assert!(is_fact_check_candidate(&span("Anything at all", Category::MainClaim)));
        assert!(is_fact_check_candidate(&span("Maybe so", Category::SupportingEvidence)));
        assert!(is_fact_check_candidate(&span("In 1969 people", Category::Background)));
        assert!(is_fact_check_candidate(&span("The study SHOWS that", Category::Example)));
        assert!(!is_fact_check_candidate(&span("Consider the island", Category::Example)));
        // word boundaries: "this" does not contain the word "is"
        assert!(!is_fact_check_candidate(&span("Think about this", Category::Reasoning)));
    }

    #[test]
    fn test_select_keeps_order() {
        let spans = vec![
            span("Consider the island", Category::Example),
            span("It was founded in 1800", Category::Background),
            span("The core claim", Category::MainClaim),
        ];
        let candidates = select_fact_check_candidates(&spans);

        let texts: Vec<&str> = candidates.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["It was founded in 1800", "The core claim"]);
    }

    #[test]
    fn test_merge_by_exact_text() {
        let mut spans = vec![
            span("Water boils at 100 degrees Celsius.", Category::MainClaim),
            span("This is important.", Category::Reasoning),
        ];
        let results = vec![
            FactCheckResult {
                sentence: "Water boils at 100 degrees Celsius.".to_string(),
                confidence: 97.6,
                explanation: "Standard pressure".to_string(),
                sources: vec!["https://example.com".to_string()],
            },
            FactCheckResult {
                sentence: "this is important".to_string(),
                confidence: 10.0,
                explanation: String::new(),
                sources: Vec::new(),
            },
        ];

        assert_eq!(merge_fact_checks(&mut spans, &results), 1);
        assert!(spans[0].verified);
        assert_eq!(spans[0].confidence.map(Confidence::get), Some(98));
        assert_eq!(spans[0].source_urls.len(), 1);
        assert!(!spans[1].verified);
        assert!(spans[1].confidence.is_none());
    }
}
