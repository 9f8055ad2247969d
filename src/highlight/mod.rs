//! Position-mapped highlighting
//!
//! Annotation offsets are computed by an external classifier against the
//! virtual text of a subtree: the concatenation of its text leaves. This
//! module maps those offsets back onto the tree.
//!
//! - [`indexer`]: leaf → offset range table for a subtree
//! - [`renderer`]: splits leaves at span boundaries and inserts annotations
//! - [`stripper`]: removes annotations and merges the text back together
//!
//! None of this performs I/O; everything runs to completion on a
//! [`crate::dom::Document`] owned by the caller.

pub mod indexer;
pub mod renderer;
pub mod stripper;
mod tooltip;
mod types;

pub use indexer::{index, OffsetIndex, TextSegment};
pub use renderer::{
    plan, render, render_with, Piece, RenderOptions, RenderPlan, RenderReport, SegmentReplacement,
};
pub use stripper::strip;
pub use tooltip::{FactCheckNote, SourceLink, Tooltip, MAX_TOOLTIP_SOURCES};
pub use types::{AnnotatedNode, AnnotationSpan, Category, Confidence, ImportanceLevel, InvalidValue};
