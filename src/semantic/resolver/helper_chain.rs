use std::slice;
use std::sync::Arc;

use smol_str::SmolStr;
use tracing::debug;

use super::ResolutionAbort;
use super::bound_helpers::{BoundHelpers, HelperBinding};
use crate::base::{TextRange, TextSize};
use crate::semantic::reflection::{ClassRegistry, HostClass, HostMethod, ReturnType};
use crate::syntax::{NodeId, NodeKind, SyntaxTree};

/// One resolved chain segment.
///
/// Transient: the owning file turns it into a helper/method node pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionStep {
    /// Bound identifier the chain starts with
    pub helper_identifier: SmolStr,
    pub helper_class: Arc<HostClass>,
    /// Range of the helper identifier segments
    pub helper_range: TextRange,
    pub object_node: NodeId,
    /// Class declaring the matched method
    pub method_class: Arc<HostClass>,
    pub method: HostMethod,
    /// Call-style segment the method was matched on
    pub segment: NodeId,
    /// Range of the segment's identifier, without arguments
    pub method_range: TextRange,
}

/// Lazy walk over the segments of one identifier chain.
///
/// Each call to `next` consumes segments until one resolves or the chain
/// ends; segments are never revisited, so the walk ends within the chain
/// length.
pub struct HelperChainWalk<'a> {
    tree: &'a SyntaxTree,
    registry: &'a ClassRegistry,
    helper_identifier: SmolStr,
    helper_class: Arc<HostClass>,
    helper_range: TextRange,
    object_node: NodeId,
    remaining: slice::Iter<'a, NodeId>,
    cursor: Option<Arc<HostClass>>,
}

impl<'a> HelperChainWalk<'a> {
    /// Match the chain's leading segments against the bound helpers and
    /// resolve the helper class
    pub fn start(
        tree: &'a SyntaxTree,
        object_node: NodeId,
        helpers: &BoundHelpers,
        registry: &'a ClassRegistry,
    ) -> Result<Self, ResolutionAbort> {
        let Some(NodeKind::ObjectNode { path }) = tree.kind(object_node) else {
            return Err(ResolutionAbort::NotAHelper);
        };
        if helpers.is_empty() {
            return Err(ResolutionAbort::NoBoundHelpers);
        }

        let parts: Vec<&str> = path
            .iter()
            .map_while(|&segment| tree.kind(segment).and_then(NodeKind::chain_value))
            .collect();
        let (consumed, identifier, binding) = helpers
            .longest_match(&parts)
            .ok_or(ResolutionAbort::NotAHelper)?;

        let fqcn = match binding {
            HelperBinding::Class(fqcn) => fqcn,
            HelperBinding::StaticCall(_) => {
                return Err(ResolutionAbort::StaticCallBinding(identifier));
            }
            HelperBinding::Other => return Err(ResolutionAbort::NotAClassBinding(identifier)),
        };
        let helper_class = registry
            .lookup(fqcn)
            .ok_or_else(|| ResolutionAbort::HelperClassMissing(fqcn.clone()))?;

        let helper_range = TextRange::new(
            tree.range(path[0]).start(),
            tree.range(path[consumed - 1]).end(),
        );

        Ok(Self {
            tree,
            registry,
            helper_identifier: identifier,
            cursor: Some(Arc::clone(&helper_class)),
            helper_class,
            helper_range,
            object_node,
            remaining: path[consumed..].iter(),
        })
    }

    pub fn helper_identifier(&self) -> &str {
        &self.helper_identifier
    }

    pub fn helper_class(&self) -> &Arc<HostClass> {
        &self.helper_class
    }

    /// Class the next segment is matched against, if the walk can continue
    fn next_class(&self, method: &HostMethod) -> Option<Arc<HostClass>> {
        match &method.return_type {
            ReturnType::ClassRef(fqcn) => {
                let class = self.registry.lookup(fqcn);
                if class.is_none() {
                    debug!(
                        "chain {} stops at {}: return type {fqcn} not found",
                        self.helper_identifier, method.name
                    );
                }
                class
            }
            ReturnType::Unresolved | ReturnType::Primitive(_) => None,
        }
    }
}

impl Iterator for HelperChainWalk<'_> {
    type Item = ResolutionStep;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let class = self.cursor.clone()?;
            let segment = *self.remaining.next()?;

            let Some(NodeKind::ObjectFunctionPathNode { value, .. }) = self.tree.kind(segment)
            else {
                continue;
            };
            let Some((_, method)) = class.method_matching(value) else {
                continue;
            };

            let method = method.clone();
            self.cursor = self.next_class(&method);

            let method_range =
                TextRange::at(self.tree.range(segment).start(), TextSize::of(value.as_str()));
            return Some(ResolutionStep {
                helper_identifier: self.helper_identifier.clone(),
                helper_class: Arc::clone(&self.helper_class),
                helper_range: self.helper_range,
                object_node: self.object_node,
                method_class: class,
                method,
                segment,
                method_range,
            });
        }
    }
}
