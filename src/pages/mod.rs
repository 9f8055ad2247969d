//! Per-page highlight records

use serde::{Deserialize, Serialize};
use url::Url;

use crate::highlight::AnnotationSpan;

/// Highlights stored for one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageHighlightRecord {
    pub normalized_url: String,
    pub highlights: Vec<AnnotationSpan>,
    /// Unix epoch milliseconds of the last save
    pub timestamp: i64,
}

/// Storage key for a page URL: `scheme://host[:port]/path`
///
/// Query and fragment are dropped so the same article reached through
/// tracking links shares one record. Strings that are not absolute URLs are
/// used unchanged.
pub fn normalize_url(raw: &str) -> String {
    match Url::parse(raw.trim()) {
        Ok(url) if url.has_host() => {
            let mut normalized = format!("{}://", url.scheme());
            if let Some(host) = url.host_str() {
                normalized.push_str(host);
            }
            if let Some(port) = url.port() {
                normalized.push_str(&format!(":{}", port));
            }
            normalized.push_str(url.path());
            normalized
        }
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_query_and_fragment() {
        assert_eq!(
            normalize_url("https://news.example.com/story/42?utm_source=x#comments"),
            "https://news.example.com/story/42"
        );
    }

    #[test]
    fn test_keeps_explicit_port() {
        assert_eq!(
            normalize_url("http://localhost:8080/a/b?c=d"),
            "http://localhost:8080/a/b"
        );
        // default ports are implicit
        assert_eq!(normalize_url("https://example.com:443/x"), "https://example.com/x");
    }

    #[test]
    fn test_root_path() {
        assert_eq!(normalize_url("https://Example.COM"), "https://example.com/");
    }

    #[test]
    fn test_unparsable_is_unchanged() {
        assert_eq!(normalize_url("not a url"), "not a url");
        assert_eq!(normalize_url("/relative/path?q=1"), "/relative/path?q=1");
    }

    #[test]
    fn test_record_wire_format() {
        let record = PageHighlightRecord {
            normalized_url: "https://example.com/".to_string(),
            highlights: Vec::new(),
            timestamp: 1_700_000_000_000,
        };
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["normalizedUrl"], "https://example.com/");
        assert_eq!(json["timestamp"], 1_700_000_000_000i64);
    }
}
