//! Markup conventions for rendered highlights

/// Class names used when highlights are written out as HTML
///
/// Only the HTML boundary looks at these; inside a [`crate::dom::Document`]
/// highlights are identified by node kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupConfig {
    /// Class on the `<span>` wrapping highlighted text
    pub highlight_class: String,
    /// Class on the tooltip `<span>` nested inside a highlight; its parts use
    /// this as a prefix (`-label`, `-confidence`, `-sources`)
    pub tooltip_class: String,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            highlight_class: "abovesaid-highlight".to_string(),
            tooltip_class: "abovesaid-tooltip".to_string(),
        }
    }
}

impl MarkupConfig {
    pub fn tooltip_part(&self, part: &str) -> String {
        format!("{}-{}", self.tooltip_class, part)
    }
}
