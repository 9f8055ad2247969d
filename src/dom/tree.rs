//! Arena-backed document tree

use crate::highlight::AnnotatedNode;

/// Identifier of a node within a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The document node (always index 0)
    pub const ROOT: NodeId = NodeId(0);

    /// Position of this node in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// Tag name and attributes of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    pub name: String,
    /// Attributes in source order
    pub attrs: Vec<(String, String)>,
}

impl ElementData {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_ascii_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

/// What a node is
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// The document itself
    Document,
    /// `<!DOCTYPE name>`
    Doctype(String),
    Element(ElementData),
    /// Plain text run
    Text(String),
    Comment(String),
    /// Rendered highlight carrying its span metadata and tooltip
    Annotation(Box<AnnotatedNode>),
}

impl NodeKind {
    pub fn is_text(&self) -> bool {
        matches!(self, NodeKind::Text(_))
    }

    pub fn is_annotation(&self) -> bool {
        matches!(self, NodeKind::Annotation(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&ElementData> {
        match self {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_annotation(&self) -> Option<&AnnotatedNode> {
        match self {
            NodeKind::Annotation(annotation) => Some(annotation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A document tree
///
/// Nodes live in a single arena and are never freed. Detaching a node (or
/// replacing it) only unlinks it, so the slot stays behind as a tombstone
/// that traversal from the root can no longer reach.
///
/// `NodeId`s are only meaningful for the document that created them; passing
/// a foreign id panics like an out-of-bounds slice index.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only the root node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of arena slots, tombstones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    /// Allocate a detached node
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    pub fn create_element(&mut self, data: ElementData) -> NodeId {
        self.create(NodeKind::Element(data))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.create(NodeKind::Text(text.into()))
    }

    pub fn create_annotation(&mut self, annotation: AnnotatedNode) -> NodeId {
        self.create(NodeKind::Annotation(Box::new(annotation)))
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.0].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Whether `id` can be reached from the document root
    pub fn is_attached(&self, id: NodeId) -> bool {
        if id.0 >= self.nodes.len() {
            return false;
        }
        let mut current = id;
        loop {
            if current == NodeId::ROOT {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Append `child` as the last child of `parent`, moving it if needed
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Unlink a node from its parent
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != id);
        }
    }

    /// Replace `target` with `replacements`, in order, at the same position
    ///
    /// Returns false (and changes nothing) when `target` has no parent.
    pub fn replace_with(&mut self, target: NodeId, replacements: &[NodeId]) -> bool {
        let Some(parent) = self.nodes[target.0].parent else {
            return false;
        };
        let Some(position) = self.nodes[parent.0]
            .children
            .iter()
            .position(|&child| child == target)
        else {
            return false;
        };

        for &replacement in replacements {
            self.detach(replacement);
            self.nodes[replacement.0].parent = Some(parent);
        }

        self.nodes[target.0].parent = None;
        self.nodes[parent.0]
            .children
            .splice(position..=position, replacements.iter().copied());
        true
    }

    /// Pre-order traversal of `root` and everything below it
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            stack: vec![root],
        }
    }

    /// Concatenated text of a subtree
    ///
    /// Annotations contribute their rendered text, never their tooltip.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            match self.kind(node) {
                NodeKind::Text(text) => out.push_str(text),
                NodeKind::Annotation(annotation) => out.push_str(&annotation.text),
                _ => {}
            }
        }
        out
    }

    /// Merge the text node `id` with its immediate text siblings
    ///
    /// Only the direct neighbours are folded in; other text children of the
    /// parent are left as they are. Returns the node that holds the merged
    /// text, or `id` unchanged when it is not an attached text node.
    pub fn merge_text_neighbours(&mut self, id: NodeId) -> NodeId {
        if !self.nodes[id.0].kind.is_text() {
            return id;
        }
        let Some(parent) = self.nodes[id.0].parent else {
            return id;
        };
        let siblings = &self.nodes[parent.0].children;
        let Some(position) = siblings.iter().position(|&child| child == id) else {
            return id;
        };
        let previous = position
            .checked_sub(1)
            .map(|i| siblings[i])
            .filter(|sibling| self.nodes[sibling.0].kind.is_text());
        let next = siblings
            .get(position + 1)
            .copied()
            .filter(|sibling| self.nodes[sibling.0].kind.is_text());

        let mut survivor = id;
        if let Some(previous) = previous {
            let moved = self.take_text(id);
            self.push_text(previous, &moved);
            self.detach(id);
            survivor = previous;
        }
        if let Some(next) = next {
            let moved = self.take_text(next);
            self.push_text(survivor, &moved);
            self.detach(next);
        }
        survivor
    }

    fn take_text(&mut self, id: NodeId) -> String {
        match &mut self.nodes[id.0].kind {
            NodeKind::Text(text) => std::mem::take(text),
            _ => String::new(),
        }
    }

    fn push_text(&mut self, id: NodeId, suffix: &str) {
        if let NodeKind::Text(text) = &mut self.nodes[id.0].kind {
            text.push_str(suffix);
        }
    }
}

/// Iterator returned by [`Document::descendants`]
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(doc: &mut Document, parts: &[&str]) -> NodeId {
        let p = doc.create_element(ElementData::new("p"));
        doc.append_child(NodeId::ROOT, p);
        for part in parts {
            let text = doc.create_text(*part);
            doc.append_child(p, text);
        }
        p
    }

    #[test]
    fn test_descendants_in_document_order() {
        let mut doc = Document::new();
        let p = paragraph(&mut doc, &["a"]);
        let b = doc.create_element(ElementData::new("b"));
        doc.append_child(p, b);
        let inner = doc.create_text("b");
        doc.append_child(b, inner);
        let tail = doc.create_text("c");
        doc.append_child(p, tail);

        assert_eq!(doc.text_content(NodeId::ROOT), "abc");
        let order: Vec<NodeId> = doc.descendants(p).collect();
        assert_eq!(order.len(), 5);
        assert_eq!(order[0], p);
        assert_eq!(order[3], inner);
    }

    #[test]
    fn test_replace_with_keeps_siblings() {
        let mut doc = Document::new();
        let p = paragraph(&mut doc, &["one", "two", "three"]);
        let middle = doc.children(p)[1];

        let left = doc.create_text("t");
        let right = doc.create_text("wo");
        assert!(doc.replace_with(middle, &[left, right]));

        assert_eq!(doc.children(p).len(), 4);
        assert_eq!(doc.text_content(p), "onetwothree");
        assert!(!doc.is_attached(middle));
        assert!(doc.is_attached(left));
    }

    #[test]
    fn test_replace_detached_node_is_refused() {
        let mut doc = Document::new();
        let orphan = doc.create_text("orphan");
        let replacement = doc.create_text("x");
        assert!(!doc.replace_with(orphan, &[replacement]));
        assert!(!doc.is_attached(replacement));
    }

    #[test]
    fn test_merge_text_neighbours_only_touches_neighbours() {
        let mut doc = Document::new();
        let p = paragraph(&mut doc, &["Hello", "", ", ", "world"]);
        let em = doc.create_element(ElementData::new("em"));
        doc.append_child(p, em);
        let tail = doc.create_text("!");
        doc.append_child(p, tail);
        let middle = doc.children(p)[2];

        let survivor = doc.merge_text_neighbours(middle);

        assert_eq!(doc.kind(survivor).as_text(), Some(", world"));
        let texts: Vec<_> = doc.children(p).iter().map(|&id| doc.kind(id).as_text()).collect();
        assert_eq!(texts, vec![Some("Hello"), Some(", world"), None, Some("!")]);
        assert_eq!(doc.text_content(p), "Hello, world!");
        assert!(!doc.is_attached(middle));
    }

    #[test]
    fn test_merge_text_neighbours_ignores_elements() {
        let mut doc = Document::new();
        let p = paragraph(&mut doc, &[]);
        let em = doc.create_element(ElementData::new("em"));
        doc.append_child(p, em);

        assert_eq!(doc.merge_text_neighbours(em), em);
        assert_eq!(doc.children(p), &[em]);
    }

    #[test]
    fn test_has_class() {
        let data = ElementData::new("span").with_attr("class", "a  abovesaid-highlight b");
        assert!(data.has_class("abovesaid-highlight"));
        assert!(!data.has_class("abovesaid"));
    }
}
