//! Lightweight reflection of host-language classes.
//!
//! Class files are never parsed with a grammar. [`extract`] reads the
//! namespace, class declaration, imports and public method signatures with
//! regular expressions, and [`NamespaceRoot`] caches the resulting
//! [`HostClass`] per fully qualified name until the declaring file changes.
//!
//! Every failure is a [`LookupMiss`]: logged at debug level and reported to
//! callers as "not found".

mod cache;
mod docblock;
pub mod extract;
mod host_class;


pub use cache::{ClassRegistry, HOST_EXTENSION, NamespaceRoot};
pub use docblock::DocBlock;
pub use host_class::{
    HostClass, HostMethod, PRIMITIVE_TYPES, Parameter, ReturnType, SELF_REFERENCES,
    normalize_alias,
};

use std::path::PathBuf;

use smol_str::SmolStr;
use thiserror::Error;

/// Why a class lookup found nothing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupMiss {
    #[error("no namespace root owns {0}")]
    NoNamespace(SmolStr),
    #[error("{0} lies outside the namespace")]
    OutsideNamespace(SmolStr),
    #[error("no class file at {}", .0.display())]
    FileMissing(PathBuf),
    #[error("cannot read {}: {message}", path.display())]
    Unreadable { path: PathBuf, message: String },
    #[error("expected namespace {expected}, found {found:?}")]
    NamespaceMismatch {
        expected: SmolStr,
        found: Option<SmolStr>,
    },
    #[error("class {0} is not declared")]
    ClassMismatch(SmolStr),
}
