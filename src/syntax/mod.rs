//! Template syntax tree.
//!
//! The tree is an arena of [`SyntaxNode`]s addressed by [`NodeId`]. Parent
//! links are plain indices, so the tree never owns cycles. Node variants form
//! the closed [`NodeKind`] sum type; [`NodeTag`] is its fieldless projection
//! used as the key of the per-file type store.

mod tree;

pub use tree::{NodeId, NodeKind, NodeTag, SyntaxNode, SyntaxTree};
