//! Reference front-end for Fusion template files
//!
//! This module provides a small, error-tolerant parser using:
//! - **logos** for fast lexing
//! - a recursive-descent parser writing into the arena [`SyntaxTree`]
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with TokenKind
//!     ↓
//! Parser → SyntaxTree (arena, parent links as indices)
//!     ↓
//! SourceFile → position-indexed nodes + synthetic cross-references
//! ```
//!
//! The semantic layer only depends on [`TemplateParser`], so a different
//! grammar implementation can be plugged into a workspace.
//!
//! [`SyntaxTree`]: crate::syntax::SyntaxTree

mod lexer;
#[allow(clippy::module_inception)]
mod parser;

pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use parser::{Parse, SyntaxError, parse_template};

/// Producer of syntax trees for template files
pub trait TemplateParser: Send + Sync {
    fn parse(&self, text: &str) -> Parse;
}

/// The built-in Fusion/Eel parser
#[derive(Debug, Default, Clone, Copy)]
pub struct FusionParser;

impl TemplateParser for FusionParser {
    fn parse(&self, text: &str) -> Parse {
        parse_template(text)
    }
}
