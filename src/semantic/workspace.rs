//! # Workspace
//!
//! Tracks the template files of one project together with the host class
//! registry and the configuration they are resolved against.
//!
//! Every content change rebuilds the affected [`SourceFile`] from a fresh
//! parse and swaps its `Arc` snapshot, so readers holding an older snapshot
//! never see a half-built index. Host file changes purge the class caches
//! and schedule a cancellable re-diagnosis batch.
//!
//! [`SourceFile`]: crate::semantic::index::SourceFile

mod batch;
mod core;
mod diagnostics;
mod events;
mod file_manager;

pub use batch::{BatchOutcome, DiagnosisBatch};
pub use self::core::{InvalidationPolicy, TEMPLATE_EXTENSION, Workspace, WorkspaceSettings};
pub use diagnostics::{Diagnostic, DiagnosticCode, Severity, diagnose_file};
pub use events::{FileChangeEvent, FileChangeKind, InvalidationOutcome};
