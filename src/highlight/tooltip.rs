//! Tooltip content for rendered highlights

use url::Url;

use super::types::{Category, Confidence, ImportanceLevel};

/// Default number of sources listed in a tooltip
pub const MAX_TOOLTIP_SOURCES: usize = 3;

/// A link to a fact-check source, labelled with its domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLink {
    /// Display label, host without a leading `www.`
    pub domain: String,
    /// Link target, exactly as supplied
    pub href: String,
}

impl SourceLink {
    /// Returns None for strings that are not absolute URLs with a host
    pub fn parse(raw: &str) -> Option<Self> {
        let url = Url::parse(raw.trim()).ok()?;
        let host = url.host_str()?;
        Some(Self {
            domain: host.strip_prefix("www.").unwrap_or(host).to_string(),
            href: raw.trim().to_string(),
        })
    }
}

/// Verification details shown for fact-checked highlights
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactCheckNote {
    pub confidence: Confidence,
    pub sources: Vec<SourceLink>,
}

/// Hover text attached to an annotated node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    /// e.g. "Main Claim (Importance: 5/5)"
    pub label: String,
    pub fact_check: Option<FactCheckNote>,
}

impl Tooltip {
    pub fn build(
        category: Category,
        importance: ImportanceLevel,
        verified: bool,
        confidence: Option<Confidence>,
        sources: &[String],
        max_sources: usize,
    ) -> Self {
        let label = format!(
            "{} (Importance: {}/{})",
            category,
            importance.get(),
            ImportanceLevel::MAX
        );

        let fact_check = match (verified, confidence) {
            (true, Some(confidence)) => Some(FactCheckNote {
                confidence,
                sources: sources
                    .iter()
                    .filter_map(|raw| SourceLink::parse(raw))
                    .take(max_sources)
                    .collect(),
            }),
            _ => None,
        };

        Self { label, fact_check }
    }

    /// Plain-text rendering, used for logging and non-HTML clients
    pub fn to_plain_text(&self) -> String {
        let mut out = self.label.clone();
        if let Some(note) = &self.fact_check {
            out.push_str(&format!(" | Confidence: {}%", note.confidence.get()));
            if !note.sources.is_empty() {
                let domains: Vec<&str> = note.sources.iter().map(|s| s.domain.as_str()).collect();
                out.push_str(&format!(" | Sources: {}", domains.join(", ")));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(value: u8) -> ImportanceLevel {
        ImportanceLevel::new(value).unwrap()
    }

    #[test]
    fn test_label_without_fact_check() {
        let tooltip = Tooltip::build(Category::MainClaim, level(5), false, None, &[], 3);
        assert_eq!(tooltip.label, "Main Claim (Importance: 5/5)");
        assert!(tooltip.fact_check.is_none());
    }

    #[test]
    fn test_confidence_requires_verified() {
        let confidence = Confidence::new(80);
        let tooltip = Tooltip::build(Category::Example, level(2), false, confidence, &[], 3);
        assert!(tooltip.fact_check.is_none());

        let tooltip = Tooltip::build(Category::Example, level(2), true, None, &[], 3);
        assert!(tooltip.fact_check.is_none());
    }

    #[test]
    fn test_sources_strip_www_and_cap() {
        let sources = vec![
            "https://www.nature.com/articles/1".to_string(),
            "not a url".to_string(),
            "https://en.wikipedia.org/wiki/Water".to_string(),
            "http://www.nasa.gov/a?b=c".to_string(),
            "https://example.org/ignored".to_string(),
        ];

        let tooltip = Tooltip::build(
            Category::SupportingEvidence,
            level(4),
            true,
            Confidence::new(92),
            &sources,
            MAX_TOOLTIP_SOURCES,
        );

        let note = tooltip.fact_check.unwrap();
        assert_eq!(note.confidence.get(), 92);
        let domains: Vec<&str> = note.sources.iter().map(|s| s.domain.as_str()).collect();
        assert_eq!(domains, vec!["nature.com", "en.wikipedia.org", "nasa.gov"]);
        // link target keeps the www prefix
        assert_eq!(note.sources[0].href, "https://www.nature.com/articles/1");
    }

    #[test]
    fn test_plain_text() {
        let tooltip = Tooltip::build(
            Category::MainClaim,
            level(5),
            true,
            Confidence::new(70),
            &["https://www.bbc.co.uk/news".to_string()],
            3,
        );
        assert_eq!(
            tooltip.to_plain_text(),
            "Main Claim (Importance: 5/5) | Confidence: 70% | Sources: bbc.co.uk"
        );
    }
}
