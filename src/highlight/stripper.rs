//! Highlight removal

use tracing::debug;

use crate::dom::{Document, NodeId, NodeKind};

/// Replace every annotation below `root` with its plain text
///
/// Each replacement is merged with its immediate text neighbours, so the
/// split leaf becomes one text node again. Other text children are not
/// touched. Returns the number of annotations removed; a clean subtree is
/// left untouched.
pub fn strip(doc: &mut Document, root: NodeId) -> usize {
    let targets: Vec<NodeId> = doc
        .descendants(root)
        .filter(|&id| doc.kind(id).is_annotation())
        .collect();
    if targets.is_empty() {
        return 0;
    }

    let mut removed = 0;

    for id in targets {
        let text = match doc.kind(id) {
            NodeKind::Annotation(annotation) => annotation.text.clone(),
            _ => continue,
        };
        let replacement = doc.create_text(text);
        if doc.replace_with(id, &[replacement]) {
            doc.merge_text_neighbours(replacement);
            removed += 1;
        }
    }

    debug!("Stripped {} highlight(s)", removed);
    removed
}
