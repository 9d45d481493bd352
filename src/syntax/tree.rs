use smol_str::SmolStr;

use crate::base::{TextRange, TextSize};

/// Stable index of a node inside its [`SyntaxTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node of the template syntax tree
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub range: TextRange,
    pub parent: Option<NodeId>,
}

/// All node shapes produced by the template front-end.
///
/// Fusion statement nodes come first, then the nodes of the embedded
/// expression language.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Root of a file
    FusionFile { statements: Vec<NodeId> },
    /// `include: path`
    Include { path: SmolStr },
    /// `path [operation] [{ block }]`
    ObjectStatement {
        path: NodeId,
        operation: Option<NodeId>,
        block: Option<Vec<NodeId>>,
    },
    /// Dotted statement path
    ObjectPath { segments: Vec<NodeId> },
    /// Plain path segment
    PathSegment { identifier: SmolStr },
    /// `@meta` path segment
    MetaPathSegment { identifier: SmolStr },
    /// `prototype(Vendor:Name)` path segment
    PrototypePathSegment { identifier: SmolStr },
    /// `= value`
    ValueAssignment { value: NodeId },
    /// `< path`
    ValueCopy { source: NodeId },
    /// `>`
    ValueUnset,
    /// Quoted string value, without quotes
    StringValue { value: String },
    NumberValue { value: SmolStr },
    BoolValue { value: bool },
    NullValue,
    /// Component name used as a value, e.g. `Neos.Fusion:Value`
    FusionObjectValue { name: SmolStr },
    /// Embedded DSL block, e.g. ``afx`...` ``
    DslExpression { identifier: SmolStr },
    /// `${ ... }`
    EelExpression { body: Option<NodeId> },

    /// Identifier chain, e.g. `I18n.translate('id')`
    ObjectNode { path: Vec<NodeId> },
    /// Plain chain segment
    ObjectPathNode { value: SmolStr },
    /// Call-style chain segment
    ObjectFunctionPathNode { value: SmolStr, args: Vec<NodeId> },
    /// String literal, without quotes
    LiteralString { value: String },
    LiteralNumber { value: SmolStr },
    LiteralBoolean { value: bool },
    LiteralNull,
    LiteralArray { items: Vec<NodeId> },
    Not { operand: NodeId },
    Operation {
        left: NodeId,
        operator: SmolStr,
        right: NodeId,
    },
    Ternary {
        condition: NodeId,
        then_branch: NodeId,
        else_branch: NodeId,
    },
    /// Unparseable input kept in the tree for recovery
    Error,
}

/// Fieldless variant tag for every indexed node kind.
///
/// Covers the parser-produced [`NodeKind`]s and the synthetic nodes the
/// semantic layer injects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeTag {
    FusionFile,
    Include,
    ObjectStatement,
    ObjectPath,
    PathSegment,
    MetaPathSegment,
    PrototypePathSegment,
    ValueAssignment,
    ValueCopy,
    ValueUnset,
    StringValue,
    NumberValue,
    BoolValue,
    NullValue,
    FusionObjectValue,
    DslExpression,
    EelExpression,
    ObjectNode,
    ObjectPathNode,
    ObjectFunctionPathNode,
    LiteralString,
    LiteralNumber,
    LiteralBoolean,
    LiteralNull,
    LiteralArray,
    Not,
    Operation,
    Ternary,
    Error,
    // Synthetic
    Helper,
    HelperMethod,
    TranslationShortHand,
    Fqcn,
}

impl NodeTag {
    pub fn is_synthetic(self) -> bool {
        matches!(
            self,
            NodeTag::Helper | NodeTag::HelperMethod | NodeTag::TranslationShortHand | NodeTag::Fqcn
        )
    }
}

impl NodeKind {
    pub fn tag(&self) -> NodeTag {
        match self {
            NodeKind::FusionFile { .. } => NodeTag::FusionFile,
            NodeKind::Include { .. } => NodeTag::Include,
            NodeKind::ObjectStatement { .. } => NodeTag::ObjectStatement,
            NodeKind::ObjectPath { .. } => NodeTag::ObjectPath,
            NodeKind::PathSegment { .. } => NodeTag::PathSegment,
            NodeKind::MetaPathSegment { .. } => NodeTag::MetaPathSegment,
            NodeKind::PrototypePathSegment { .. } => NodeTag::PrototypePathSegment,
            NodeKind::ValueAssignment { .. } => NodeTag::ValueAssignment,
            NodeKind::ValueCopy { .. } => NodeTag::ValueCopy,
            NodeKind::ValueUnset => NodeTag::ValueUnset,
            NodeKind::StringValue { .. } => NodeTag::StringValue,
            NodeKind::NumberValue { .. } => NodeTag::NumberValue,
            NodeKind::BoolValue { .. } => NodeTag::BoolValue,
            NodeKind::NullValue => NodeTag::NullValue,
            NodeKind::FusionObjectValue { .. } => NodeTag::FusionObjectValue,
            NodeKind::DslExpression { .. } => NodeTag::DslExpression,
            NodeKind::EelExpression { .. } => NodeTag::EelExpression,
            NodeKind::ObjectNode { .. } => NodeTag::ObjectNode,
            NodeKind::ObjectPathNode { .. } => NodeTag::ObjectPathNode,
            NodeKind::ObjectFunctionPathNode { .. } => NodeTag::ObjectFunctionPathNode,
            NodeKind::LiteralString { .. } => NodeTag::LiteralString,
            NodeKind::LiteralNumber { .. } => NodeTag::LiteralNumber,
            NodeKind::LiteralBoolean { .. } => NodeTag::LiteralBoolean,
            NodeKind::LiteralNull => NodeTag::LiteralNull,
            NodeKind::LiteralArray { .. } => NodeTag::LiteralArray,
            NodeKind::Not { .. } => NodeTag::Not,
            NodeKind::Operation { .. } => NodeTag::Operation,
            NodeKind::Ternary { .. } => NodeTag::Ternary,
            NodeKind::Error => NodeTag::Error,
        }
    }

    /// Direct children in source order
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::FusionFile { statements } => statements.clone(),
            NodeKind::ObjectStatement {
                path,
                operation,
                block,
            } => {
                let mut children = vec![*path];
                children.extend(operation.iter().copied());
                if let Some(block) = block {
                    children.extend(block.iter().copied());
                }
                children
            }
            NodeKind::ObjectPath { segments } => segments.clone(),
            NodeKind::ValueAssignment { value } => vec![*value],
            NodeKind::ValueCopy { source } => vec![*source],
            NodeKind::EelExpression { body } => body.iter().copied().collect(),
            NodeKind::ObjectNode { path } => path.clone(),
            NodeKind::ObjectFunctionPathNode { args, .. } => args.clone(),
            NodeKind::LiteralArray { items } => items.clone(),
            NodeKind::Not { operand } => vec![*operand],
            NodeKind::Operation { left, right, .. } => vec![*left, *right],
            NodeKind::Ternary {
                condition,
                then_branch,
                else_branch,
            } => vec![*condition, *then_branch, *else_branch],
            NodeKind::Include { .. }
            | NodeKind::PathSegment { .. }
            | NodeKind::MetaPathSegment { .. }
            | NodeKind::PrototypePathSegment { .. }
            | NodeKind::ValueUnset
            | NodeKind::StringValue { .. }
            | NodeKind::NumberValue { .. }
            | NodeKind::BoolValue { .. }
            | NodeKind::NullValue
            | NodeKind::FusionObjectValue { .. }
            | NodeKind::DslExpression { .. }
            | NodeKind::ObjectPathNode { .. }
            | NodeKind::LiteralString { .. }
            | NodeKind::LiteralNumber { .. }
            | NodeKind::LiteralBoolean { .. }
            | NodeKind::LiteralNull
            | NodeKind::Error => Vec::new(),
        }
    }

    /// Identifier of a statement path segment
    pub fn segment_identifier(&self) -> Option<&str> {
        match self {
            NodeKind::PathSegment { identifier }
            | NodeKind::MetaPathSegment { identifier }
            | NodeKind::PrototypePathSegment { identifier } => Some(identifier),
            _ => None,
        }
    }

    /// Value of an expression chain segment
    pub fn chain_value(&self) -> Option<&str> {
        match self {
            NodeKind::ObjectPathNode { value } | NodeKind::ObjectFunctionPathNode { value, .. } => {
                Some(value)
            }
            _ => None,
        }
    }
}

/// Arena holding every node of one parsed file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
    root: Option<NodeId>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node; parent links are filled in by [`SyntaxTree::finish`]
    pub fn alloc(&mut self, kind: NodeKind, range: TextRange) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SyntaxNode {
            kind,
            range,
            parent: None,
        });
        id
    }

    /// Seal the tree: record the root and link every child to its parent
    pub fn finish(&mut self, root: NodeId) {
        self.root = Some(root);
        for index in 0..self.nodes.len() {
            let parent = NodeId(index as u32);
            for child in self.nodes[index].kind.children() {
                if let Some(node) = self.nodes.get_mut(child.index()) {
                    node.parent = Some(parent);
                }
            }
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.index())
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.get(id).map(|node| &node.kind)
    }

    pub fn range(&self, id: NodeId) -> TextRange {
        self.get(id)
            .map(|node| node.range)
            .unwrap_or_else(|| TextRange::empty(TextSize::new(0)))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in allocation order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SyntaxNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index as u32), node))
    }

    /// Nearest ancestor (excluding `id`) matching `tag`
    pub fn find_ancestor(&self, id: NodeId, tag: NodeTag) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(candidate) = current {
            if self.kind(candidate).is_some_and(|kind| kind.tag() == tag) {
                return Some(candidate);
            }
            current = self.parent(candidate);
        }
        None
    }
}
