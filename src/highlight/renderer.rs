//! Highlight rendering
//!
//! Rendering happens in two steps. [`plan`] is a pure function over the
//! document: it indexes the subtree, assigns spans to segments and computes
//! the replacement node sequence for each affected leaf. [`RenderPlan::apply`]
//! then performs all replacements in one pass.
//!
//! # Boundary policy
//!
//! A span is rendered only when it lies entirely within one text leaf. A span
//! that crosses a leaf boundary, e.g. a sentence split by a `<b>` element, is
//! not rendered in either leaf. This matches the behaviour highlights have
//! always had and downstream consumers rely on it.
//!
//! # Overlap policy
//!
//! Spans are applied left to right in `offset_start` order (stable). Inside a
//! leaf each span's start is clamped to the end of the previously emitted
//! span, and a span left empty by clamping is dropped, so no character is
//! ever wrapped twice.
//!
//! # Re-rendering
//!
//! Existing annotations are indexed (their text keeps offsets aligned) but
//! never split again. Rendering the same spans twice therefore leaves the
//! second pass with nothing to do.

use serde::Serialize;
use tracing::{debug, trace, warn};

use super::indexer::{OffsetIndex, TextSegment};
use super::tooltip::MAX_TOOLTIP_SOURCES;
use super::types::{AnnotatedNode, AnnotationSpan};
use crate::dom::{Document, NodeId};

/// Rendering options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Maximum number of source links in a tooltip
    pub max_sources: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_sources: MAX_TOOLTIP_SOURCES,
        }
    }
}

/// A piece of a split text leaf
#[derive(Debug, Clone, PartialEq)]
pub enum Piece {
    Text(String),
    Annotation(AnnotatedNode),
}

/// Replacement for one text leaf
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentReplacement {
    pub node: NodeId,
    pub pieces: Vec<Piece>,
}

/// Mutations computed by [`plan`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderPlan {
    replacements: Vec<SegmentReplacement>,
    /// Spans rejected as malformed
    skipped: usize,
    /// Well-formed spans that produced no annotation
    dropped: usize,
}

/// Outcome of a render pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderReport {
    /// Annotated nodes inserted
    pub rendered: usize,
    /// Spans with offsets outside the text or reversed
    pub skipped: usize,
    /// Spans that crossed a leaf boundary, were clamped away or fell on an
    /// existing annotation
    pub dropped: usize,
    /// Text leaves replaced
    pub touched_segments: usize,
}

impl RenderPlan {
    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    pub fn replacements(&self) -> &[SegmentReplacement] {
        &self.replacements
    }

    /// Apply every replacement to `doc`
    ///
    /// A leaf that was detached since planning is left alone and logged.
    pub fn apply(self, doc: &mut Document) -> RenderReport {
        let mut report = RenderReport {
            skipped: self.skipped,
            dropped: self.dropped,
            ..RenderReport::default()
        };

        for replacement in self.replacements {
            let mut annotations = 0;
            let nodes: Vec<NodeId> = replacement
                .pieces
                .into_iter()
                .map(|piece| match piece {
                    Piece::Text(text) => doc.create_text(text),
                    Piece::Annotation(annotation) => {
                        annotations += 1;
                        doc.create_annotation(annotation)
                    }
                })
                .collect();

            if doc.replace_with(replacement.node, &nodes) {
                report.rendered += annotations;
                report.touched_segments += 1;
            } else {
                warn!(
                    "Text node {} is no longer attached, skipping {} highlight(s)",
                    replacement.node.index(),
                    annotations
                );
                report.dropped += annotations;
            }
        }

        report
    }
}

/// Compute the mutations that would render `spans` into `root`
pub fn plan(
    doc: &Document,
    root: NodeId,
    spans: &[AnnotationSpan],
    options: &RenderOptions,
) -> RenderPlan {
    if spans.is_empty() {
        return RenderPlan::default();
    }

    let index = OffsetIndex::build(doc, root);
    let mut skipped = 0;

    let mut ordered: Vec<&AnnotationSpan> = spans
        .iter()
        .filter(|span| {
            let fits = span.fits(index.text());
            if !fits {
                debug!(
                    "Skipping malformed span {}..{} (virtual text is {} bytes)",
                    span.offset_start,
                    span.offset_end,
                    index.len()
                );
                skipped += 1;
            }
            fits
        })
        .collect();
    // sort_by_key is stable, so equal starts keep caller order
    ordered.sort_by_key(|span| span.offset_start);

    let mut plan = RenderPlan {
        skipped,
        ..RenderPlan::default()
    };
    let mut rendered = 0;

    for segment in index.segments() {
        if segment.annotated {
            continue;
        }

        let first = ordered.partition_point(|span| span.offset_start < segment.range.start);
        let contained = ordered[first..]
            .iter()
            .take_while(|span| span.offset_start < segment.range.end)
            .filter(|span| segment.contains_range(&span.range()))
            .copied();

        if let Some(replacement) =
            split_segment(segment, index.segment_text(segment), contained, options)
        {
            rendered += replacement
                .pieces
                .iter()
                .filter(|piece| matches!(piece, Piece::Annotation(_)))
                .count();
            plan.replacements.push(replacement);
        }
    }

    plan.dropped = ordered.len() - rendered;
    if plan.dropped > 0 {
        debug!("{} span(s) did not fit inside a single text node", plan.dropped);
    }
    plan
}

/// Build the replacement sequence for one leaf, or None if no span applies
fn split_segment<'a>(
    segment: &TextSegment,
    text: &str,
    spans: impl Iterator<Item = &'a AnnotationSpan>,
    options: &RenderOptions,
) -> Option<SegmentReplacement> {
    let mut pieces = Vec::new();
    let mut cursor = 0;

    for span in spans {
        let local_end = span.offset_end - segment.range.start;
        let local_start = (span.offset_start - segment.range.start).max(cursor);
        if local_start >= local_end {
            trace!(
                "Span {}..{} fully overlapped by an earlier span",
                span.offset_start,
                span.offset_end
            );
            continue;
        }

        if cursor < local_start {
            pieces.push(Piece::Text(text[cursor..local_start].to_string()));
        }
        pieces.push(Piece::Annotation(AnnotatedNode::from_span(
            span,
            &text[local_start..local_end],
            options.max_sources,
        )));
        cursor = local_end;
    }

    if pieces.is_empty() {
        return None;
    }
    if cursor < text.len() {
        pieces.push(Piece::Text(text[cursor..].to_string()));
    }

    Some(SegmentReplacement {
        node: segment.node,
        pieces,
    })
}

/// Render `spans` into the subtree at `root` with custom options
pub fn render_with(
    doc: &mut Document,
    root: NodeId,
    spans: &[AnnotationSpan],
    options: &RenderOptions,
) -> RenderReport {
    let plan = plan(doc, root, spans, options);
    if plan.is_empty() {
        return RenderReport {
            skipped: plan.skipped,
            dropped: plan.dropped,
            ..RenderReport::default()
        };
    }
    let report = plan.apply(doc);
    debug!(
        "Rendered {} highlight(s) across {} text node(s)",
        report.rendered, report.touched_segments
    );
    report
}

/// Render `spans` into the subtree at `root`
pub fn render(doc: &mut Document, root: NodeId, spans: &[AnnotationSpan]) -> RenderReport {
    render_with(doc, root, spans, &RenderOptions::default())
}
