//! # Semantic Analysis
//!
//! Turns parsed templates into a queryable per-file index and links
//! expression chains to the host classes that implement them.

pub mod index;
pub mod reflection;
pub mod resolver;
pub mod workspace;

pub use index::{
    FqcnNode, HelperMethodNode, HelperNode, IndexId, IndexedNode, PositionedNode, SourceFile,
    SyntheticNode, TranslationShortHandNode,
};
pub use reflection::{ClassRegistry, HostClass, HostMethod, LookupMiss, NamespaceRoot};
pub use resolver::{BoundHelpers, CrossReferenceResolver, ResolutionAbort, ResolutionStep};
pub use workspace::{
    Diagnostic, DiagnosticCode, FileChangeEvent, FileChangeKind, InvalidationPolicy, Severity,
    Workspace, WorkspaceSettings,
};
