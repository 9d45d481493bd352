//! Entries of the per-file node store.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::{Span, TextRange};
use crate::semantic::reflection::{HostClass, HostMethod};
use crate::syntax::{NodeId, NodeTag};

/// Stable index of an entry inside its [`SourceFile`](super::SourceFile)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexId(pub(super) u32);

impl IndexId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A helper identifier bound to a host class, e.g. `I18n`
#[derive(Debug, Clone, PartialEq)]
pub struct HelperNode {
    /// Dotted identifier as written, e.g. `Neos.Node`
    pub identifier: SmolStr,
    pub class: Arc<HostClass>,
    /// The identifier chain this helper starts
    pub object_node: NodeId,
    /// The method node resolved through this helper
    pub method: IndexId,
}

/// A chain segment resolved to a host method.
///
/// Holds a snapshot of the method taken at resolution time; a later cache
/// purge does not update it.
#[derive(Debug, Clone, PartialEq)]
pub struct HelperMethodNode {
    pub identifier: SmolStr,
    /// Class declaring the method
    pub class: Arc<HostClass>,
    pub method: HostMethod,
    /// The call-style chain segment
    pub segment: NodeId,
    /// Helper node owning this method node
    pub owner: IndexId,
}

/// A translation id passed to a translation helper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationShortHandNode {
    pub value: String,
    pub literal: NodeId,
}

/// A string naming a host class
#[derive(Debug, Clone, PartialEq)]
pub struct FqcnNode {
    pub identifier: SmolStr,
    pub class: Arc<HostClass>,
    /// String node carrying the class name
    pub literal: NodeId,
}

/// Anything stored in a file's node index
#[derive(Debug, Clone, PartialEq)]
pub enum IndexedNode {
    /// A node of the file's syntax tree
    Syntax(NodeId),
    Helper(HelperNode),
    HelperMethod(HelperMethodNode),
    TranslationShortHand(TranslationShortHandNode),
    Fqcn(FqcnNode),
}

/// An indexed node with its byte range and line/column span
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    pub id: IndexId,
    pub tag: NodeTag,
    pub node: IndexedNode,
    pub range: TextRange,
    pub span: Span,
}

impl PositionedNode {
    pub fn syntax_id(&self) -> Option<NodeId> {
        match self.node {
            IndexedNode::Syntax(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.tag.is_synthetic()
    }
}

/// Typed view over the synthetic variants of [`IndexedNode`]
pub trait SyntheticNode: 'static {
    const TAG: NodeTag;

    fn from_indexed(node: &IndexedNode) -> Option<&Self>;
}

macro_rules! synthetic_node {
    ($ty:ty, $variant:ident, $tag:expr) => {
        impl SyntheticNode for $ty {
            const TAG: NodeTag = $tag;

            fn from_indexed(node: &IndexedNode) -> Option<&Self> {
                match node {
                    IndexedNode::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

synthetic_node!(HelperNode, Helper, NodeTag::Helper);
synthetic_node!(HelperMethodNode, HelperMethod, NodeTag::HelperMethod);
synthetic_node!(
    TranslationShortHandNode,
    TranslationShortHand,
    NodeTag::TranslationShortHand
);
synthetic_node!(FqcnNode, Fqcn, NodeTag::Fqcn);
