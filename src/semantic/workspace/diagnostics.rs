//! Diagnostics computed from an indexed file.

use std::sync::Arc;

use crate::base::{FileUri, Span, TextRange};
use crate::semantic::index::{HelperMethodNode, SourceFile};
use crate::syntax::NodeKind;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Hint,
}

impl Severity {
    /// Convert to LSP severity number.
    pub fn to_lsp(&self) -> u32 {
        match self {
            Severity::Error => 1,
            Severity::Warning => 2,
            Severity::Info => 3,
            Severity::Hint => 4,
        }
    }
}

/// Stable diagnostic codes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    SyntaxError,
    MissingArgument,
    TooManyArguments,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::SyntaxError => "F0001",
            DiagnosticCode::MissingArgument => "F0101",
            DiagnosticCode::TooManyArguments => "F0102",
        }
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub uri: FileUri,
    pub range: TextRange,
    /// 0-based line/column span of `range`
    pub span: Span,
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: Arc<str>,
}

impl Diagnostic {
    fn new(
        file: &SourceFile,
        range: TextRange,
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            uri: file.uri().clone(),
            span: file.line_index().span(file.text(), range),
            range,
            severity,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

// ============================================================================
// CHECKS
// ============================================================================

/// All diagnostics of a file: syntax errors, then helper argument checks
pub fn diagnose_file(file: &SourceFile) -> Vec<Diagnostic> {
    let mut diagnostics: Vec<Diagnostic> = file
        .parse_errors()
        .iter()
        .map(|error| {
            Diagnostic::new(
                file,
                error.range,
                Severity::Error,
                DiagnosticCode::SyntaxError,
                error.message.as_str(),
            )
        })
        .collect();

    for (entry, node) in file.nodes_of::<HelperMethodNode>() {
        check_helper_arguments(file, entry.range, node, &mut diagnostics);
    }
    diagnostics
}

/// Compare call arguments with the declared parameters.
///
/// Required parameters are checked up to the first one with a default or
/// a spread marker. Surplus arguments are flagged unless the last
/// parameter is variadic.
fn check_helper_arguments(
    file: &SourceFile,
    method_range: TextRange,
    node: &HelperMethodNode,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(NodeKind::ObjectFunctionPathNode { args, .. }) = file.kind(node.segment) else {
        return;
    };
    let parameters = &node.method.parameters;

    for (index, parameter) in parameters.iter().enumerate() {
        if parameter.is_optional() {
            break;
        }
        if index >= args.len() {
            diagnostics.push(Diagnostic::new(
                file,
                method_range,
                Severity::Error,
                DiagnosticCode::MissingArgument,
                "Missing argument",
            ));
        }
    }

    if args.len() > parameters.len() && !node.method.is_variadic() {
        for &argument in &args[parameters.len()..] {
            diagnostics.push(Diagnostic::new(
                file,
                file.tree().range(argument),
                Severity::Warning,
                DiagnosticCode::TooManyArguments,
                "Too many arguments provided",
            ));
        }
    }
}
