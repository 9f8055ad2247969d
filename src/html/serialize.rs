//! Document → HTML serialization

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::markup::MarkupConfig;
use crate::dom::{Document, NodeId, NodeKind};
use crate::highlight::AnnotatedNode;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text content is written verbatim
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "noscript",
];

/// Serialize a whole document
pub fn serialize_document(doc: &Document, markup: &MarkupConfig) -> String {
    serialize(doc, doc.root(), markup)
}

/// Serialize `node` including its own markup
///
/// For the document node this is the concatenation of its children.
pub fn serialize(doc: &Document, node: NodeId, markup: &MarkupConfig) -> String {
    let mut out = String::new();
    write_node(doc, node, markup, false, &mut out);
    out
}

/// Serialize only the children of `node`
pub fn serialize_children(doc: &Document, node: NodeId, markup: &MarkupConfig) -> String {
    let mut out = String::new();
    let raw = is_raw_text(doc, node);
    for &child in doc.children(node) {
        write_node(doc, child, markup, raw, &mut out);
    }
    out
}

fn is_raw_text(doc: &Document, node: NodeId) -> bool {
    doc.kind(node)
        .as_element()
        .map(|el| RAW_TEXT_ELEMENTS.contains(&el.name.as_str()))
        .unwrap_or(false)
}

fn write_node(doc: &Document, id: NodeId, markup: &MarkupConfig, raw: bool, out: &mut String) {
    match doc.kind(id) {
        NodeKind::Document => {
            for &child in doc.children(id) {
                write_node(doc, child, markup, false, out);
            }
        }
        NodeKind::Doctype(name) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        NodeKind::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        NodeKind::Text(text) => {
            if raw {
                out.push_str(text);
            } else {
                out.push_str(&encode_text(text));
            }
        }
        NodeKind::Element(el) => {
            out.push('<');
            out.push_str(&el.name);
            for (name, value) in &el.attrs {
                write_attr(out, name, value);
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&el.name.as_str()) {
                return;
            }

            let child_raw = RAW_TEXT_ELEMENTS.contains(&el.name.as_str());
            for &child in doc.children(id) {
                write_node(doc, child, markup, child_raw, out);
            }

            out.push_str("</");
            out.push_str(&el.name);
            out.push('>');
        }
        NodeKind::Annotation(annotation) => write_annotation(annotation, markup, out),
    }
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&encode_double_quoted_attribute(value));
    out.push('"');
}

fn write_annotation(annotation: &AnnotatedNode, markup: &MarkupConfig, out: &mut String) {
    out.push_str("<span");
    write_attr(out, "class", &markup.highlight_class);
    write_attr(out, "data-importance", &annotation.importance.get().to_string());
    write_attr(out, "data-type", annotation.category.label());
    if let Some(confidence) = annotation.confidence {
        write_attr(out, "data-confidence", &confidence.get().to_string());
    }
    if annotation.verified {
        write_attr(out, "data-verified", "true");
    }
    out.push('>');
    out.push_str(&encode_text(&annotation.text));

    let tooltip = &annotation.tooltip;
    out.push_str("<span");
    write_attr(out, "class", &markup.tooltip_class);
    out.push('>');

    out.push_str("<span");
    write_attr(out, "class", &markup.tooltip_part("label"));
    out.push('>');
    out.push_str(&encode_text(&tooltip.label));
    out.push_str("</span>");

    if let Some(note) = &tooltip.fact_check {
        out.push_str("<span");
        write_attr(out, "class", &markup.tooltip_part("confidence"));
        out.push('>');
        out.push_str(&format!("Confidence: {}%", note.confidence.get()));
        out.push_str("</span>");

        if !note.sources.is_empty() {
            out.push_str("<span");
            write_attr(out, "class", &markup.tooltip_part("sources"));
            out.push_str(">Sources: ");
            for (i, source) in note.sources.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str("<a");
                write_attr(out, "href", &source.href);
                write_attr(out, "target", "_blank");
                write_attr(out, "rel", "noopener noreferrer");
                out.push('>');
                out.push_str(&encode_text(&source.domain));
                out.push_str("</a>");
            }
            out.push_str("</span>");
        }
    }

    out.push_str("</span></span>");
}
