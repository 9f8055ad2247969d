//! Annotation span types
//!
//! A span is an offset range over a subtree's virtual text plus the
//! importance/fact-check payload the classifier attached to it. Offsets are
//! UTF-8 byte offsets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

use super::tooltip::Tooltip;

/// Out-of-range values for the bounded span fields
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidValue {
    #[error("importance must be between 1 and 5, got {0}")]
    Importance(u8),

    #[error("confidence must be between 0 and 100, got {0}")]
    Confidence(u8),
}

/// Importance on a 1..=5 scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ImportanceLevel(u8);

impl ImportanceLevel {
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (1..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for ImportanceLevel {
    type Error = InvalidValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidValue::Importance(value))
    }
}

impl From<ImportanceLevel> for u8 {
    fn from(level: ImportanceLevel) -> Self {
        level.0
    }
}

/// Fact-check confidence as a percentage (0..=100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Confidence(u8);

impl Confidence {
    pub fn new(value: u8) -> Option<Self> {
        (value <= 100).then_some(Self(value))
    }

    /// Clamp and round a raw score from a fact-check service
    pub fn from_score(score: f64) -> Self {
        if score.is_nan() {
            return Self(0);
        }
        Self(score.clamp(0.0, 100.0).round() as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Confidence {
    type Error = InvalidValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidValue::Confidence(value))
    }
}

impl From<Confidence> for u8 {
    fn from(confidence: Confidence) -> Self {
        confidence.0
    }
}

/// Rhetorical role of a highlighted passage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Main Claim")]
    MainClaim,
    #[serde(rename = "Supporting Evidence")]
    SupportingEvidence,
    #[serde(rename = "Reasoning / Explanation")]
    Reasoning,
    #[serde(rename = "Example / Illustration")]
    Example,
    #[serde(rename = "Counterpoint / Caveat")]
    Counterpoint,
    #[serde(rename = "Background / Context")]
    Background,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::MainClaim,
        Category::SupportingEvidence,
        Category::Reasoning,
        Category::Example,
        Category::Counterpoint,
        Category::Background,
    ];

    /// Human-readable label, identical to the wire name
    pub fn label(self) -> &'static str {
        match self {
            Category::MainClaim => "Main Claim",
            Category::SupportingEvidence => "Supporting Evidence",
            Category::Reasoning => "Reasoning / Explanation",
            Category::Example => "Example / Illustration",
            Category::Counterpoint => "Counterpoint / Caveat",
            Category::Background => "Background / Context",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    /// Categories that always qualify for fact-checking
    pub fn is_factual(self) -> bool {
        matches!(self, Category::MainClaim | Category::SupportingEvidence)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One annotation over the virtual text of a subtree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationSpan {
    /// The passage as the classifier returned it
    pub text: String,
    pub importance: ImportanceLevel,
    pub category: Category,
    /// Inclusive start offset
    pub offset_start: usize,
    /// Exclusive end offset
    pub offset_end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_urls: Vec<String>,
}

impl AnnotationSpan {
    pub fn new(
        text: &str,
        importance: ImportanceLevel,
        category: Category,
        range: Range<usize>,
    ) -> Self {
        Self {
            text: text.to_string(),
            importance,
            category,
            offset_start: range.start,
            offset_end: range.end,
            confidence: None,
            verified: false,
            source_urls: Vec::new(),
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.offset_start..self.offset_end
    }

    /// Whether the span can be applied to `text`
    ///
    /// Both ends must fall on character boundaries of the virtual text and
    /// the range must be non-empty.
    pub fn fits(&self, text: &str) -> bool {
        self.offset_start < self.offset_end
            && self.offset_end <= text.len()
            && text.is_char_boundary(self.offset_start)
            && text.is_char_boundary(self.offset_end)
    }
}

/// A rendered highlight
///
/// Holds a copy of the span metadata together with the exact text it wraps.
/// Lives inside a [`crate::dom::Document`] as [`crate::dom::NodeKind::Annotation`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedNode {
    pub text: String,
    pub category: Category,
    pub importance: ImportanceLevel,
    pub confidence: Option<Confidence>,
    pub verified: bool,
    pub source_urls: Vec<String>,
    pub tooltip: Tooltip,
}

impl AnnotatedNode {
    pub fn new(
        text: String,
        category: Category,
        importance: ImportanceLevel,
        confidence: Option<Confidence>,
        verified: bool,
        source_urls: Vec<String>,
        max_sources: usize,
    ) -> Self {
        let tooltip = Tooltip::build(
            category,
            importance,
            verified,
            confidence,
            &source_urls,
            max_sources,
        );
        Self {
            text,
            category,
            importance,
            confidence,
            verified,
            source_urls,
            tooltip,
        }
    }

    /// Annotate `text` (a slice of the span's range) with the span's metadata
    pub fn from_span(span: &AnnotationSpan, text: &str, max_sources: usize) -> Self {
        Self::new(
            text.to_string(),
            span.category,
            span.importance,
            span.confidence,
            span.verified,
            span.source_urls.clone(),
            max_sources,
        )
    }
}
