//! Foundation types for the Fusion analysis core.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineIndex`] - Byte offset to line/column conversion
//! - [`Position`], [`Span`] - Line/column positions for indexed nodes
//! - [`FileUri`] - `file://` identifiers for template and host files
//!
//! This module has NO dependencies on other crate modules.

mod line_index;
mod position;
mod uri;

pub use line_index::LineIndex;
pub use position::{Position, Span};
pub use uri::FileUri;

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
