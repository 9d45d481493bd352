//! Per-file node index.
//!
//! A [`SourceFile`] stores parser nodes and the synthetic cross-reference
//! nodes attached during resolution in one type-keyed store, answers
//! position queries, and keeps the categorized lists of named component
//! definitions.

mod categorize;
mod node;
mod source_file;


pub use node::{
    FqcnNode, HelperMethodNode, HelperNode, IndexId, IndexedNode, PositionedNode, SyntheticNode,
    TranslationShortHandNode,
};
pub use source_file::SourceFile;
