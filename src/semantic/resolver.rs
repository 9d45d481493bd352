//! # Cross-reference resolution
//!
//! Links identifier chains in expressions to host classes. A chain whose
//! leading segments name a bound helper (configured under
//! `Neos.Fusion.defaultContext`) is walked segment by segment through the
//! helper class and the classes its methods return. Each matched segment
//! becomes a [`ResolutionStep`], which the [`SourceFile`] absorbs as a
//! helper/method node pair.
//!
//! Resolution fails open: a chain that cannot be followed yields no
//! synthetic nodes. Abort reasons are logged as [`ResolutionAbort`].
//!
//! [`SourceFile`]: crate::semantic::index::SourceFile

mod bound_helpers;
mod directives;
mod helper_chain;

pub use bound_helpers::{BoundHelpers, DEFAULT_CONTEXT_PATH, HelperBinding};
pub use directives::{
    INSTANCEOF_METHOD, META_CLASS_KEYS, TRANSLATE_METHOD, TRANSLATION_HELPERS, TYPE_CHECK_HELPERS,
    collapse_class_name,
};
pub use helper_chain::{HelperChainWalk, ResolutionStep};

use smol_str::SmolStr;
use thiserror::Error;
use tracing::debug;

use crate::semantic::index::SourceFile;
use crate::semantic::reflection::ClassRegistry;
use crate::syntax::{NodeId, NodeTag};

/// Why a chain was not resolved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionAbort {
    #[error("no helpers are bound")]
    NoBoundHelpers,
    #[error("chain does not start with a bound helper")]
    NotAHelper,
    #[error("helper {0} is bound to a static call")]
    StaticCallBinding(SmolStr),
    #[error("helper {0} is not bound to a class name")]
    NotAClassBinding(SmolStr),
    #[error("class {0} of a bound helper was not found")]
    HelperClassMissing(SmolStr),
}

/// Number of nodes attached by one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub steps: usize,
    pub annotations: usize,
}

/// Resolves helper chains and class annotations of a file
pub struct CrossReferenceResolver<'a> {
    helpers: &'a BoundHelpers,
    registry: &'a ClassRegistry,
}

impl<'a> CrossReferenceResolver<'a> {
    pub fn new(helpers: &'a BoundHelpers, registry: &'a ClassRegistry) -> Self {
        Self { helpers, registry }
    }

    /// Walk one identifier chain; the walk restarts from its first segment
    /// every time this is called.
    pub fn walk(
        &self,
        file: &'a SourceFile,
        object_node: NodeId,
    ) -> Result<HelperChainWalk<'a>, ResolutionAbort> {
        HelperChainWalk::start(file.tree(), object_node, self.helpers, self.registry)
    }

    /// Resolve one chain and attach its steps to `file`
    pub fn resolve_object_node(&self, file: &mut SourceFile, object_node: NodeId) -> ResolveStats {
        let steps: Vec<ResolutionStep> = match HelperChainWalk::start(
            file.tree(),
            object_node,
            self.helpers,
            self.registry,
        ) {
            Ok(walk) => walk.collect(),
            Err(ResolutionAbort::NotAHelper) => return ResolveStats::default(),
            Err(abort) => {
                debug!("{}: chain not resolved: {abort}", file.uri());
                return ResolveStats::default();
            }
        };

        let mut stats = ResolveStats::default();
        for step in &steps {
            file.attach_step(step);
            stats.steps += 1;
            if directives::annotate_step(file, step, self.registry) {
                stats.annotations += 1;
            }
        }
        stats
    }

    /// Resolve every chain of the file, then its `@class` and `[instanceof]`
    /// class annotations
    pub fn resolve_file(&self, file: &mut SourceFile) -> ResolveStats {
        let object_nodes: Vec<NodeId> = file
            .nodes_by_type(NodeTag::ObjectNode)
            .filter_map(|entry| entry.syntax_id())
            .collect();

        let mut stats = ResolveStats::default();
        if !self.helpers.is_empty() {
            for object_node in object_nodes {
                let resolved = self.resolve_object_node(file, object_node);
                stats.steps += resolved.steps;
                stats.annotations += resolved.annotations;
            }
        } else if !object_nodes.is_empty() {
            debug!("{}: {}", file.uri(), ResolutionAbort::NoBoundHelpers);
        }
        stats.annotations += directives::annotate_meta_classes(file, self.registry);
        stats.annotations += directives::annotate_instanceof_filters(file, self.registry);
        stats
    }
}
