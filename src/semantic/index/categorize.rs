//! Classification of named component definitions.

use crate::syntax::{NodeId, NodeKind, SyntaxTree};

#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct ComponentLists {
    pub creations: Vec<NodeId>,
    pub overwrites: Vec<NodeId>,
    pub extends: Vec<NodeId>,
}

/// Walk every statement once and sort statements whose path starts with a
/// `prototype(...)` segment.
///
/// `prototype(A) < prototype(B)` creates `A` and extends `B`; any other
/// statement on `prototype(A)` overwrites it. The lists hold the first path
/// segment of each statement.
pub(super) fn categorize(tree: &SyntaxTree) -> ComponentLists {
    let mut lists = ComponentLists::default();
    if let Some(NodeKind::FusionFile { statements }) = tree.root().and_then(|root| tree.kind(root))
    {
        visit_statements(tree, statements, &mut lists);
    }
    lists
}

fn visit_statements(tree: &SyntaxTree, statements: &[NodeId], lists: &mut ComponentLists) {
    for &statement in statements {
        let Some(NodeKind::ObjectStatement {
            path,
            operation,
            block,
        }) = tree.kind(statement)
        else {
            continue;
        };

        if let Some(first) = first_prototype_segment(tree, *path) {
            let copied_from = operation.and_then(|op| match tree.kind(op) {
                Some(NodeKind::ValueCopy { source }) => Some(*source),
                _ => None,
            });
            match copied_from {
                Some(source) => {
                    lists.creations.push(first);
                    if let Some(extended) = first_prototype_segment(tree, source) {
                        lists.extends.push(extended);
                    }
                }
                None => lists.overwrites.push(first),
            }
        }

        if let Some(block) = block {
            visit_statements(tree, block, lists);
        }
    }
}

fn first_prototype_segment(tree: &SyntaxTree, path: NodeId) -> Option<NodeId> {
    let Some(NodeKind::ObjectPath { segments }) = tree.kind(path) else {
        return None;
    };
    let first = *segments.first()?;
    matches!(tree.kind(first), Some(NodeKind::PrototypePathSegment { .. })).then_some(first)
}
