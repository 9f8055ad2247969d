//! In-memory document tree
//!
//! HTML is parsed into this arena before any highlighting happens, and
//! serialized back out afterwards. Node kinds are an explicit tagged variant:
//! annotation carriers are [`NodeKind::Annotation`] nodes, so finding them is
//! a type check rather than a class-name match.

mod tree;

pub use tree::{Descendants, Document, ElementData, NodeId, NodeKind};
