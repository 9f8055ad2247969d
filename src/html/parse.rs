//! HTML → Document conversion

use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

use super::markup::MarkupConfig;
use super::HtmlError;
use crate::dom::{Document, ElementData, NodeId, NodeKind};
use crate::highlight::{AnnotatedNode, Category, Confidence, ImportanceLevel};

/// Candidates for the main content of an article page, most specific first
const MAIN_CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role=\"main\"]",
    ".post-content",
    ".article-content",
    ".content",
    "body",
];

/// A main-content candidate needs more text than this (in characters)
const MAIN_CONTENT_MIN_CHARS: usize = 200;

/// Which subtree highlights are computed against
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RootSelector {
    /// The whole document
    #[default]
    Whole,
    /// The page's main content element, found heuristically
    MainContent,
    /// First element matching a CSS selector
    Css(String),
}

impl RootSelector {
    /// `None` and `""` select the whole document, `"main-content"` the
    /// heuristic, anything else is taken as a CSS selector
    pub fn from_option(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => RootSelector::Whole,
            Some("main-content") => RootSelector::MainContent,
            Some(css) => RootSelector::Css(css.to_string()),
        }
    }
}

/// A parsed page together with the subtree to work on
#[derive(Debug, Clone)]
pub struct ParsedPage {
    pub doc: Document,
    pub root: NodeId,
}

/// Parse `html` and resolve `selector` to a node
///
/// Input that starts with a doctype or an `<html>` tag is parsed as a full
/// document; anything else as a body fragment. Highlight markup written by
/// [`super::serialize`] is recognised and turned back into annotation nodes,
/// so a rendered page can be stripped or re-rendered.
pub fn parse_page(
    html: &str,
    selector: &RootSelector,
    markup: &MarkupConfig,
) -> Result<ParsedPage, HtmlError> {
    let full_document = is_full_document(html);
    let source = if full_document {
        Html::parse_document(html)
    } else {
        Html::parse_fragment(html)
    };

    let target = resolve_target(&source, selector)?;

    let mut converter = Converter {
        doc: Document::new(),
        markup,
        target,
        found: None,
    };

    if full_document {
        for child in source.tree.root().children() {
            if let Node::Doctype(doctype) = child.value() {
                let node = converter
                    .doc
                    .create(NodeKind::Doctype(doctype.name().to_string()));
                converter.doc.append_child(NodeId::ROOT, node);
            }
        }
        converter.convert_element(source.root_element(), NodeId::ROOT);
    } else {
        converter.convert_children(source.root_element(), NodeId::ROOT);
    }

    let root = match (selector, converter.found) {
        (RootSelector::Whole, _) => NodeId::ROOT,
        (_, Some(found)) => found,
        (RootSelector::MainContent, None) => NodeId::ROOT,
        (RootSelector::Css(css), None) => return Err(HtmlError::SelectorNotFound(css.clone())),
    };

    debug!(
        "Parsed {} node(s), root {}",
        converter.doc.len(),
        root.index()
    );

    Ok(ParsedPage {
        doc: converter.doc,
        root,
    })
}

fn is_full_document(html: &str) -> bool {
    let head: String = html
        .trim_start()
        .chars()
        .take(9)
        .collect::<String>()
        .to_ascii_lowercase();
    head.starts_with("<!doctype") || head.starts_with("<html")
}

fn resolve_target<'a>(
    source: &'a Html,
    selector: &RootSelector,
) -> Result<Option<ElementRef<'a>>, HtmlError> {
    match selector {
        RootSelector::Whole => Ok(None),
        RootSelector::Css(css) => {
            let parsed = Selector::parse(css)
                .map_err(|e| HtmlError::InvalidSelector(format!("{}: {:?}", css, e)))?;
            match source.select(&parsed).next() {
                Some(el) => Ok(Some(el)),
                None => Err(HtmlError::SelectorNotFound(css.clone())),
            }
        }
        RootSelector::MainContent => Ok(find_main_content(source)),
    }
}

fn find_main_content(source: &Html) -> Option<ElementRef<'_>> {
    for css in MAIN_CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        let candidate = source
            .select(&selector)
            .find(|el| el.text().map(|t| t.chars().count()).sum::<usize>() > MAIN_CONTENT_MIN_CHARS);
        if candidate.is_some() {
            return candidate;
        }
    }

    let body = Selector::parse("body").ok()?;
    source.select(&body).next()
}

struct Converter<'a, 'm> {
    doc: Document,
    markup: &'m MarkupConfig,
    target: Option<ElementRef<'a>>,
    found: Option<NodeId>,
}

impl<'a, 'm> Converter<'a, 'm> {
    fn convert_children(&mut self, source: ElementRef<'a>, parent: NodeId) {
        for child in source.children() {
            match child.value() {
                Node::Text(text) => {
                    let text: &str = text;
                    let node = self.doc.create_text(text);
                    self.doc.append_child(parent, node);
                }
                Node::Comment(comment) => {
                    let comment: &str = comment;
                    let node = self.doc.create(NodeKind::Comment(comment.to_string()));
                    self.doc.append_child(parent, node);
                }
                Node::Element(_) => {
                    if let Some(el) = ElementRef::wrap(child) {
                        self.convert_element(el, parent);
                    }
                }
                _ => {}
            }
        }
    }

    fn convert_element(&mut self, source: ElementRef<'a>, parent: NodeId) {
        let annotation = self.read_annotation(source);
        let is_element = annotation.is_none();

        let node = match annotation {
            Some(annotation) => self.doc.create_annotation(annotation),
            None => {
                let value = source.value();
                self.doc.create_element(ElementData {
                    name: value.name().to_string(),
                    attrs: value
                        .attrs()
                        .map(|(name, value)| (name.to_string(), value.to_string()))
                        .collect(),
                })
            }
        };

        self.doc.append_child(parent, node);
        if self.target == Some(source) {
            self.found = Some(node);
        }
        if is_element {
            self.convert_children(source, node);
        }
    }

    /// Recognise highlight markup; anything malformed stays a plain element
    fn read_annotation(&self, source: ElementRef<'a>) -> Option<AnnotatedNode> {
        let value = source.value();
        if value.name() != "span" || !value.classes().any(|c| c == self.markup.highlight_class) {
            return None;
        }

        let importance = value
            .attr("data-importance")
            .and_then(|v| v.trim().parse::<u8>().ok())
            .and_then(ImportanceLevel::new)?;
        let category = value.attr("data-type").and_then(Category::from_label)?;
        let confidence = match value.attr("data-confidence") {
            Some(raw) => Some(raw.trim().parse::<u8>().ok().and_then(Confidence::new)?),
            None => None,
        };
        let verified = value.attr("data-verified") == Some("true");

        let mut text = String::new();
        let mut sources = Vec::new();
        self.collect_annotation(source, &mut text, &mut sources);
        if text.is_empty() {
            return None;
        }

        let max_sources = sources.len();
        Some(AnnotatedNode::new(
            text,
            category,
            importance,
            confidence,
            verified,
            sources,
            max_sources,
        ))
    }

    fn collect_annotation(&self, source: ElementRef<'a>, text: &mut String, sources: &mut Vec<String>) {
        for child in source.children() {
            match child.value() {
                Node::Text(t) => text.push_str(t),
                Node::Element(_) => {
                    let Some(el) = ElementRef::wrap(child) else {
                        continue;
                    };
                    if el.value().classes().any(|c| c == self.markup.tooltip_class) {
                        collect_links(el, sources);
                    } else {
                        self.collect_annotation(el, text, sources);
                    }
                }
                _ => {}
            }
        }
    }
}

fn collect_links(tooltip: ElementRef<'_>, sources: &mut Vec<String>) {
    for node in tooltip.descendants() {
        let Some(el) = ElementRef::wrap(node) else {
            continue;
        };
        if el.value().name() == "a" {
            if let Some(href) = el.value().attr("href") {
                sources.push(href.to_string());
            }
        }
    }
}
