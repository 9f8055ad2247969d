//! Offset indexing over text-bearing leaves
//!
//! The virtual text of a subtree is the concatenation of its non-blank text
//! leaves in document order. Annotation offsets are defined against that
//! string, so every leaf records the byte range it occupies in it.
//!
//! A rendered leaf is a run of adjacent `Text` and `Annotation` siblings.
//! Blankness is judged on the whole run, so the whitespace left beside an
//! annotation keeps its bytes and offsets match the clean page.

use std::cmp::Ordering;
use std::ops::Range;

use crate::dom::{Document, NodeId, NodeKind};

/// One text-bearing leaf and its place in the virtual text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSegment {
    pub node: NodeId,
    /// Byte range in the virtual text
    pub range: Range<usize>,
    /// The leaf is an existing annotation; it is indexed but never split
    pub annotated: bool,
}

impl TextSegment {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Whether `range` lies entirely inside this segment
    pub fn contains_range(&self, range: &Range<usize>) -> bool {
        range.start >= self.range.start && range.end <= self.range.end
    }
}

/// Segments of a subtree together with its virtual text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OffsetIndex {
    segments: Vec<TextSegment>,
    text: String,
}

impl OffsetIndex {
    /// Index the text leaves below `root`
    ///
    /// Blank leaves (whitespace only) are skipped, but kept leaves contribute
    /// their raw text so offsets stay exact. A blank text node that belongs to
    /// a non-blank run is kept. A detached root yields an empty index.
    pub fn build(doc: &Document, root: NodeId) -> Self {
        let mut index = Self::default();
        if !doc.is_attached(root) {
            return index;
        }

        for id in doc.descendants(root) {
            let (text, annotated) = match doc.kind(id) {
                NodeKind::Text(text) => (text.as_str(), false),
                NodeKind::Annotation(annotation) => (annotation.text.as_str(), true),
                _ => continue,
            };
            if text.trim().is_empty() && run_is_blank(doc, id) {
                continue;
            }

            let start = index.text.len();
            index.text.push_str(text);
            index.segments.push(TextSegment {
                node: id,
                range: start..index.text.len(),
                annotated,
            });
        }

        index
    }

    pub fn segments(&self) -> &[TextSegment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<TextSegment> {
        self.segments
    }

    /// The virtual concatenation
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Text of one segment of this index
    pub fn segment_text(&self, segment: &TextSegment) -> &str {
        &self.text[segment.range.clone()]
    }

    /// Find the segment containing `offset`
    pub fn segment_at(&self, offset: usize) -> Option<&TextSegment> {
        let idx = self
            .segments
            .binary_search_by(|segment| {
                if segment.range.end <= offset {
                    Ordering::Less
                } else if segment.range.start > offset {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                }
            })
            .ok()?;
        self.segments.get(idx)
    }
}

/// Text or annotation content of a leaf node
fn leaf_text(kind: &NodeKind) -> Option<&str> {
    match kind {
        NodeKind::Text(text) => Some(text.as_str()),
        NodeKind::Annotation(annotation) => Some(annotation.text.as_str()),
        _ => None,
    }
}

/// Whether the run of adjacent leaf siblings around `id` is all whitespace
fn run_is_blank(doc: &Document, id: NodeId) -> bool {
    let Some(parent) = doc.parent(id) else {
        return true;
    };
    let siblings = doc.children(parent);
    let Some(position) = siblings.iter().position(|&sibling| sibling == id) else {
        return true;
    };

    let blank = |sibling: &NodeId| {
        leaf_text(doc.kind(*sibling)).map(|text| text.trim().is_empty())
    };
    let before = siblings[..position].iter().rev().map_while(blank);
    let after = siblings[position + 1..].iter().map_while(blank);
    before.chain(after).all(|is_blank| is_blank)
}

/// Text segments of `root` in document order
pub fn index(doc: &Document, root: NodeId) -> Vec<TextSegment> {
    OffsetIndex::build(doc, root).into_segments()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementData;
    use crate::highlight::{AnnotatedNode, Category, ImportanceLevel};

    /// <div><p>Hello <b>bold</b> world.</p>\n  <p>Second.</p></div>
    fn sample() -> (Document, NodeId) {
        let mut doc = Document::new();
        let div = doc.create_element(ElementData::new("div"));
        doc.append_child(NodeId::ROOT, div);

        let p1 = doc.create_element(ElementData::new("p"));
        doc.append_child(div, p1);
        let hello = doc.create_text("Hello ");
        doc.append_child(p1, hello);
        let b = doc.create_element(ElementData::new("b"));
        doc.append_child(p1, b);
        let bold = doc.create_text("bold");
        doc.append_child(b, bold);
        let world = doc.create_text(" world.");
        doc.append_child(p1, world);

        let blank = doc.create_text("\n  ");
        doc.append_child(div, blank);

        let p2 = doc.create_element(ElementData::new("p"));
        doc.append_child(div, p2);
        let second = doc.create_text("Second.");
        doc.append_child(p2, second);

        (doc, div)
    }

    #[test]
    fn test_segments_partition_virtual_text() {
        let (doc, root) = sample();
        let index = OffsetIndex::build(&doc, root);

        assert_eq!(index.text(), "Hello bold world.Second.");
        assert_eq!(index.segments().len(), 4);

        let mut expected_start = 0;
        let mut rebuilt = String::new();
        for segment in index.segments() {
            assert_eq!(segment.range.start, expected_start);
            expected_start = segment.range.end;
            rebuilt.push_str(doc.kind(segment.node).as_text().unwrap());
            assert_eq!(index.segment_text(segment).len(), segment.len());
        }
        assert_eq!(expected_start, index.len());
        assert_eq!(rebuilt, index.text());
    }

    #[test]
    fn test_untrimmed_text_keeps_offsets() {
        let (doc, root) = sample();
        let segments = index(&doc, root);
        // " world." keeps its leading space
        assert_eq!(segments[2].range, 10..17);
    }

    #[test]
    fn test_order_stable() {
        let (doc, root) = sample();
        assert_eq!(index(&doc, root), index(&doc, root));
    }

    #[test]
    fn test_detached_or_empty_root() {
        let mut doc = Document::new();
        let orphan = doc.create_element(ElementData::new("p"));
        let text = doc.create_text("not reachable");
        doc.append_child(orphan, text);

        assert!(index(&doc, orphan).is_empty());
        assert!(index(&doc, NodeId::ROOT).is_empty());
    }

    #[test]
    fn test_blank_text_beside_annotation_keeps_bytes() {
        let mut doc = Document::new();
        let div = doc.create_element(ElementData::new("div"));
        doc.append_child(NodeId::ROOT, div);
        let p1 = doc.create_element(ElementData::new("p"));
        doc.append_child(div, p1);
        let mark = doc.create_annotation(AnnotatedNode::new(
            "Hi there.".to_string(),
            Category::MainClaim,
            ImportanceLevel::new(4).unwrap(),
            None,
            false,
            Vec::new(),
            3,
        ));
        doc.append_child(p1, mark);
        let rest = doc.create_text(" ");
        doc.append_child(p1, rest);
        let gap = doc.create_text("\n");
        doc.append_child(div, gap);
        let p2 = doc.create_element(ElementData::new("p"));
        doc.append_child(div, p2);
        let alpha = doc.create_text("Alpha beta.");
        doc.append_child(p2, alpha);

        let index = OffsetIndex::build(&doc, div);

        assert_eq!(index.text(), "Hi there. Alpha beta.");
        let ranges: Vec<_> = index.segments().iter().map(|s| s.range.clone()).collect();
        assert_eq!(ranges, vec![0..9, 9..10, 10..21]);
        assert!(index.segments()[0].annotated);
    }

    #[test]
    fn test_segment_at() {
        let (doc, root) = sample();
        let index = OffsetIndex::build(&doc, root);

        assert_eq!(index.segment_at(0).map(|s| s.range.clone()), Some(0..6));
        assert_eq!(index.segment_at(6).map(|s| s.range.clone()), Some(6..10));
        assert_eq!(index.segment_at(23).map(|s| s.range.clone()), Some(17..24));
        assert!(index.segment_at(24).is_none());
    }
}
