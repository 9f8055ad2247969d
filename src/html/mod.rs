//! HTML boundary
//!
//! Converts page HTML into a [`crate::dom::Document`] and back:
//! - parsing with scraper, including recognition of existing highlights
//! - serialization with highlight and tooltip markup
//! - sanitization of untrusted input using lol_html

mod markup;
mod parse;
mod sanitize;
mod serialize;

pub use markup::MarkupConfig;
pub use parse::{parse_page, ParsedPage, RootSelector};
pub use sanitize::sanitize_html;
pub use serialize::{serialize, serialize_children, serialize_document};

/// Errors at the HTML boundary
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("No element matches selector: {0}")]
    SelectorNotFound(String),

    #[error("HTML rewrite failed: {0}")]
    Rewrite(String),
}
