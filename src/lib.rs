//! # fusion-lens
//!
//! Cross-reference resolution and host-class reflection for Fusion/Eel
//! template files.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project   → Directory loading, settings layers
//!   ↓
//! semantic  → Per-file index, host-class reflection, resolver, workspace
//!   ↓
//! config    → Layered YAML configuration
//!   ↓
//! syntax    → Arena syntax tree, node kinds and tags
//!   ↓
//! parser    → Logos lexer, recursive-descent template parser
//!   ↓
//! base      → Primitives (TextRange, LineIndex, Position, FileUri)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax → config → semantic → project)
// ============================================================================

/// Foundation types: TextRange, LineIndex, Position/Span, FileUri
pub mod base;

/// Parser: Logos lexer, recursive-descent parser
pub mod parser;

/// Syntax: arena tree, NodeKind/NodeTag
pub mod syntax;

/// Layered configuration sources
pub mod config;

/// Semantic model: index, reflection, resolution, workspace
pub mod semantic;

/// Project loading: template directories, settings files
pub mod project;

// Re-export foundation types
pub use base::{FileUri, LineIndex, Position, Span, TextRange, TextSize};
pub use parser::{FusionParser, Parse, SyntaxError, TemplateParser, parse_template};
pub use semantic::{SourceFile, Workspace, WorkspaceSettings};
