//! Recursive descent parser for Fusion files and embedded Eel expressions
//!
//! Builds an arena [`SyntaxTree`] from tokens. Every call site makes
//! progress or reports an error, so parsing always terminates and always
//! yields a tree.

use smol_str::SmolStr;

use super::lexer::{Lexer, Token, TokenKind};
use crate::base::{TextRange, TextSize};
use crate::syntax::{NodeId, NodeKind, SyntaxTree};

/// Parse result containing the tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub tree: SyntaxTree,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse a Fusion file into a syntax tree
pub fn parse_template(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input)
        .filter(|token| !token.kind.is_trivia())
        .collect();
    let mut parser = Parser::new(input, &tokens);
    let root = parser.parse_file();
    parser.finish(root)
}

/// Binding power of binary operators, lowest first
fn binary_precedence(kind: TokenKind) -> Option<u8> {
    match kind {
        TokenKind::PipePipe => Some(1),
        TokenKind::AmpAmp => Some(2),
        TokenKind::EqEq | TokenKind::BangEq => Some(3),
        TokenKind::Lt | TokenKind::LtEq | TokenKind::Gt | TokenKind::GtEq => Some(4),
        TokenKind::Plus | TokenKind::Minus => Some(5),
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some(6),
        _ => None,
    }
}

/// Strip the surrounding quotes of a string token, keeping escapes verbatim
fn unquote(text: &str) -> &str {
    if text.len() >= 2 {
        &text[1..text.len() - 1]
    } else {
        ""
    }
}

/// The parser state
struct Parser<'a> {
    input: &'a str,
    tokens: &'a [Token<'a>],
    pos: usize,
    /// End offset of the last consumed token
    last_end: TextSize,
    tree: SyntaxTree,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, tokens: &'a [Token<'a>]) -> Self {
        Self {
            input,
            tokens,
            pos: 0,
            last_end: TextSize::new(0),
            tree: SyntaxTree::new(),
            errors: Vec::new(),
        }
    }

    fn finish(mut self, root: NodeId) -> Parse {
        self.tree.finish(root);
        Parse {
            tree: self.tree,
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> TokenKind {
        self.nth(0)
    }

    fn current_text(&self) -> &'a str {
        self.tokens.get(self.pos).map(|t| t.text).unwrap_or("")
    }

    fn current_start(&self) -> TextSize {
        self.current()
            .map(|t| t.range.start())
            .unwrap_or_else(|| TextSize::of(self.input))
    }

    fn nth(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// True when the current token starts exactly where the previous one ended
    fn at_adjacent(&self) -> bool {
        self.current()
            .is_some_and(|t| self.pos > 0 && t.range.start() == self.last_end)
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) -> TextRange {
        match self.tokens.get(self.pos) {
            Some(token) => {
                self.pos += 1;
                self.last_end = token.range.end();
                token.range
            }
            None => TextRange::empty(self.last_end),
        }
    }

    fn eat(&mut self, kind: TokenKind) -> Option<TextRange> {
        if self.at(kind) {
            Some(self.bump())
        } else {
            None
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> bool {
        if self.eat(kind).is_some() {
            true
        } else {
            self.error(format!("expected {what}"));
            false
        }
    }

    /// Skip every token that starts before the end of the current line
    fn skip_rest_of_line(&mut self) {
        let offset = usize::from(self.last_end);
        let line_end = self.input[offset..]
            .find('\n')
            .map(|idx| offset + idx)
            .unwrap_or(self.input.len());
        let line_end = TextSize::new(line_end as u32);
        while self.current().is_some_and(|t| t.range.start() < line_end) {
            self.bump();
        }
        self.last_end = self.last_end.max(line_end);
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: impl Into<String>) {
        let range = self
            .current()
            .map(|t| t.range)
            .unwrap_or_else(|| TextRange::empty(TextSize::of(self.input)));
        self.errors.push(SyntaxError::new(message, range));
    }

    fn error_node(&mut self) -> NodeId {
        let at = self.current_start();
        self.tree.alloc(NodeKind::Error, TextRange::empty(at))
    }

    // =========================================================================
    // Fusion grammar
    // =========================================================================

    /// FusionFile = Statement*
    fn parse_file(&mut self) -> NodeId {
        let mut statements = Vec::new();
        while !self.at_eof() {
            let pos_before = self.pos;
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            // Safety: if we didn't make progress, force-skip a token
            if self.pos == pos_before && !self.at_eof() {
                self.error(format!("unexpected `{}`", self.current_text()));
                self.bump();
            }
        }
        self.tree.alloc(
            NodeKind::FusionFile { statements },
            TextRange::up_to(TextSize::of(self.input)),
        )
    }

    /// Statement = Include | Namespace | ObjectStatement
    fn parse_statement(&mut self) -> Option<NodeId> {
        if self.at(TokenKind::IncludeLine) {
            return Some(self.parse_include());
        }
        let is_declaration = self.at(TokenKind::Ident) && self.nth(1) == TokenKind::Colon;
        match self.current_text() {
            "namespace" if is_declaration => {
                self.bump();
                self.skip_rest_of_line();
                None
            }
            _ => self.parse_object_statement(),
        }
    }

    /// Include = `include:` <rest of line>, lexed as one token
    fn parse_include(&mut self) -> NodeId {
        let line = self.current_text();
        let range = self.bump();
        let path = line.split_once(':').map(|(_, path)| path.trim()).unwrap_or("");
        self.tree.alloc(
            NodeKind::Include {
                path: SmolStr::new(path),
            },
            range,
        )
    }

    /// ObjectStatement = ObjectPath (`=` Value | `<` ObjectPath | `>`)? Block?
    fn parse_object_statement(&mut self) -> Option<NodeId> {
        let path = self.parse_object_path()?;
        let start = self.tree.range(path).start();

        let operation = match self.current_kind() {
            TokenKind::Eq => {
                let op_start = self.bump().start();
                let value = self.parse_value();
                let end = self.last_end.max(op_start);
                Some(self.tree.alloc(
                    NodeKind::ValueAssignment { value },
                    TextRange::new(op_start, end),
                ))
            }
            TokenKind::Lt => {
                let op_start = self.bump().start();
                let source = match self.parse_object_path() {
                    Some(source) => source,
                    None => {
                        self.error("expected path to copy from");
                        self.error_node()
                    }
                };
                Some(self.tree.alloc(
                    NodeKind::ValueCopy { source },
                    TextRange::new(op_start, self.last_end),
                ))
            }
            TokenKind::Gt => {
                let range = self.bump();
                Some(self.tree.alloc(NodeKind::ValueUnset, range))
            }
            _ => None,
        };

        let block = if self.at(TokenKind::LBrace) {
            Some(self.parse_block())
        } else {
            None
        };

        if operation.is_none() && block.is_none() {
            self.error("expected `=`, `<`, `>` or `{`");
        }

        Some(self.tree.alloc(
            NodeKind::ObjectStatement {
                path,
                operation,
                block,
            },
            TextRange::new(start, self.last_end),
        ))
    }

    /// Block = `{` Statement* `}`
    fn parse_block(&mut self) -> Vec<NodeId> {
        self.bump();
        let mut statements = Vec::new();
        while !self.at_eof() && !self.at(TokenKind::RBrace) {
            let pos_before = self.pos;
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }
            if self.pos == pos_before && !self.at_eof() {
                self.error(format!("unexpected `{}`", self.current_text()));
                self.bump();
            }
        }
        self.expect(TokenKind::RBrace, "`}`");
        statements
    }

    /// ObjectPath = PathSegment (`.` PathSegment)*
    fn parse_object_path(&mut self) -> Option<NodeId> {
        let mut segments = vec![self.parse_path_segment()?];

        while self.at(TokenKind::Dot) && self.at_segment_start(1) {
            self.bump();
            match self.parse_path_segment() {
                Some(segment) => segments.push(segment),
                None => break,
            }
        }

        let start = self.tree.range(segments[0]).start();
        let end = self.tree.range(segments[segments.len() - 1]).end();
        Some(
            self.tree
                .alloc(NodeKind::ObjectPath { segments }, TextRange::new(start, end)),
        )
    }

    fn at_segment_start(&self, n: usize) -> bool {
        matches!(
            self.nth(n),
            TokenKind::Ident | TokenKind::Number | TokenKind::String | TokenKind::At
        )
    }

    /// PathSegment = `prototype(` Name `)` | `@` Ident | Ident | Number | String
    fn parse_path_segment(&mut self) -> Option<NodeId> {
        match self.current_kind() {
            TokenKind::Ident
                if self.current_text() == "prototype" && self.nth(1) == TokenKind::LParen =>
            {
                let start = self.bump().start();
                self.bump();
                let identifier = match self.parse_component_name() {
                    Some((name, _)) => name,
                    None => {
                        self.error("expected component name");
                        SmolStr::default()
                    }
                };
                self.expect(TokenKind::RParen, "`)`");
                Some(self.tree.alloc(
                    NodeKind::PrototypePathSegment { identifier },
                    TextRange::new(start, self.last_end),
                ))
            }
            TokenKind::At => {
                let start = self.bump().start();
                let identifier = if self.at(TokenKind::Ident) && self.at_adjacent() {
                    let text = self.current_text();
                    self.bump();
                    SmolStr::new(text)
                } else {
                    self.error("expected meta property name");
                    SmolStr::default()
                };
                Some(self.tree.alloc(
                    NodeKind::MetaPathSegment { identifier },
                    TextRange::new(start, self.last_end),
                ))
            }
            TokenKind::Ident | TokenKind::Number => {
                let text = self.current_text();
                let range = self.bump();
                Some(self.tree.alloc(
                    NodeKind::PathSegment {
                        identifier: SmolStr::new(text),
                    },
                    range,
                ))
            }
            TokenKind::String => {
                let text = self.current_text();
                let range = self.bump();
                Some(self.tree.alloc(
                    NodeKind::PathSegment {
                        identifier: SmolStr::new(unquote(text)),
                    },
                    range,
                ))
            }
            _ => None,
        }
    }

    /// Name = Part (`.` Part)* `:` Part (`.` Part)*, all tokens adjacent.
    ///
    /// Returns `None` without consuming when no name starts here.
    fn parse_component_name(&mut self) -> Option<(SmolStr, TextRange)> {
        if !matches!(self.current_kind(), TokenKind::Ident | TokenKind::Number) {
            return None;
        }
        let start = self.bump().start();
        let mut seen_colon = false;
        while matches!(
            self.current_kind(),
            TokenKind::Ident | TokenKind::Number | TokenKind::Dot | TokenKind::Colon
        ) && self.at_adjacent()
        {
            seen_colon |= self.at(TokenKind::Colon);
            self.bump();
        }
        let range = TextRange::new(start, self.last_end);
        if !seen_colon {
            self.errors.push(SyntaxError::new(
                "component name needs a `Vendor:Name` form",
                range,
            ));
        }
        Some((SmolStr::new(&self.input[range]), range))
    }

    /// Value = String | Number | Bool | Null | Name | Dsl | `${` Expression `}`
    fn parse_value(&mut self) -> NodeId {
        match self.current_kind() {
            TokenKind::String => {
                let value = unquote(self.current_text()).to_string();
                let range = self.bump();
                self.tree.alloc(NodeKind::StringValue { value }, range)
            }
            TokenKind::Number => {
                let (value, range) = self.parse_number();
                self.tree.alloc(NodeKind::NumberValue { value }, range)
            }
            TokenKind::Minus if self.nth(1) == TokenKind::Number => {
                let (value, range) = self.parse_number();
                self.tree.alloc(NodeKind::NumberValue { value }, range)
            }
            TokenKind::Ident => match self.current_text() {
                "true" | "TRUE" => {
                    let range = self.bump();
                    self.tree.alloc(NodeKind::BoolValue { value: true }, range)
                }
                "false" | "FALSE" => {
                    let range = self.bump();
                    self.tree.alloc(NodeKind::BoolValue { value: false }, range)
                }
                "null" | "NULL" => {
                    let range = self.bump();
                    self.tree.alloc(NodeKind::NullValue, range)
                }
                _ => match self.parse_component_name() {
                    Some((name, range)) => self
                        .tree
                        .alloc(NodeKind::FusionObjectValue { name }, range),
                    None => self.error_node(),
                },
            },
            TokenKind::Dsl => {
                let text = self.current_text();
                let identifier = text.split('`').next().unwrap_or_default();
                let identifier = SmolStr::new(identifier);
                let range = self.bump();
                self.tree.alloc(NodeKind::DslExpression { identifier }, range)
            }
            TokenKind::EelOpen => self.parse_eel_expression(),
            _ => {
                self.error("expected value");
                self.error_node()
            }
        }
    }

    /// Number = `-`? Digits (`.` Digits)?, all tokens adjacent
    fn parse_number(&mut self) -> (SmolStr, TextRange) {
        let start = self.current_start();
        if self.at(TokenKind::Minus) {
            self.bump();
        }
        self.bump();
        if self.at(TokenKind::Dot) && self.at_adjacent() && self.nth(1) == TokenKind::Number {
            let dot_end = self.tokens[self.pos].range.end();
            if self.tokens[self.pos + 1].range.start() == dot_end {
                self.bump();
                self.bump();
            }
        }
        let range = TextRange::new(start, self.last_end);
        (SmolStr::new(&self.input[range]), range)
    }

    // =========================================================================
    // Eel grammar
    // =========================================================================

    /// EelExpression = `${` Expression? `}`
    fn parse_eel_expression(&mut self) -> NodeId {
        let start = self.bump().start();
        let body = if self.at(TokenKind::RBrace) {
            None
        } else {
            self.parse_expression()
        };

        if !self.at(TokenKind::RBrace) {
            self.error("expected `}` to close expression");
            self.recover_to_closing_brace();
        }
        self.eat(TokenKind::RBrace);

        self.tree.alloc(
            NodeKind::EelExpression { body },
            TextRange::new(start, self.last_end),
        )
    }

    /// Skip to the `}` closing the current expression, honoring nesting
    fn recover_to_closing_brace(&mut self) {
        let mut depth = 0usize;
        while !self.at_eof() {
            match self.current_kind() {
                TokenKind::LBrace | TokenKind::EelOpen => depth += 1,
                TokenKind::RBrace if depth == 0 => return,
                TokenKind::RBrace => depth -= 1,
                _ => {}
            }
            self.bump();
        }
    }

    /// Expression = Binary (`?` Expression `:` Expression)?
    fn parse_expression(&mut self) -> Option<NodeId> {
        let condition = self.parse_binary(1)?;
        if !self.at(TokenKind::Question) {
            return Some(condition);
        }
        self.bump();
        let then_branch = self.parse_expression()?;
        if !self.expect(TokenKind::Colon, "`:` in conditional expression") {
            return Some(condition);
        }
        let else_branch = self.parse_expression()?;
        let range = TextRange::new(
            self.tree.range(condition).start(),
            self.tree.range(else_branch).end(),
        );
        Some(self.tree.alloc(
            NodeKind::Ternary {
                condition,
                then_branch,
                else_branch,
            },
            range,
        ))
    }

    /// Binary operators by precedence climbing
    fn parse_binary(&mut self, min_precedence: u8) -> Option<NodeId> {
        let mut left = self.parse_unary()?;
        while let Some(precedence) = binary_precedence(self.current_kind()) {
            if precedence < min_precedence {
                break;
            }
            let operator = SmolStr::new(self.current_text());
            self.bump();
            let right = self.parse_binary(precedence + 1)?;
            let range = TextRange::new(self.tree.range(left).start(), self.tree.range(right).end());
            left = self.tree.alloc(
                NodeKind::Operation {
                    left,
                    operator,
                    right,
                },
                range,
            );
        }
        Some(left)
    }

    /// Unary = `!` Unary | Primary
    fn parse_unary(&mut self) -> Option<NodeId> {
        if self.at(TokenKind::Bang) {
            let start = self.bump().start();
            let operand = self.parse_unary()?;
            let end = self.tree.range(operand).end();
            return Some(
                self.tree
                    .alloc(NodeKind::Not { operand }, TextRange::new(start, end)),
            );
        }
        self.parse_primary()
    }

    /// Primary = String | Number | Bool | Null | Array | `(` Expression `)` | Chain
    fn parse_primary(&mut self) -> Option<NodeId> {
        match self.current_kind() {
            TokenKind::String => {
                let value = unquote(self.current_text()).to_string();
                let range = self.bump();
                Some(self.tree.alloc(NodeKind::LiteralString { value }, range))
            }
            TokenKind::Number => {
                let (value, range) = self.parse_number();
                Some(self.tree.alloc(NodeKind::LiteralNumber { value }, range))
            }
            TokenKind::Minus if self.nth(1) == TokenKind::Number => {
                let (value, range) = self.parse_number();
                Some(self.tree.alloc(NodeKind::LiteralNumber { value }, range))
            }
            TokenKind::LBracket => {
                let start = self.bump().start();
                let items = self.parse_argument_list(TokenKind::RBracket, "`]`");
                Some(self.tree.alloc(
                    NodeKind::LiteralArray { items },
                    TextRange::new(start, self.last_end),
                ))
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_expression();
                self.expect(TokenKind::RParen, "`)`");
                inner
            }
            TokenKind::Ident => match self.current_text() {
                "true" | "TRUE" => {
                    let range = self.bump();
                    Some(self.tree.alloc(NodeKind::LiteralBoolean { value: true }, range))
                }
                "false" | "FALSE" => {
                    let range = self.bump();
                    Some(self.tree.alloc(NodeKind::LiteralBoolean { value: false }, range))
                }
                "null" | "NULL" => {
                    let range = self.bump();
                    Some(self.tree.alloc(NodeKind::LiteralNull, range))
                }
                _ => Some(self.parse_chain()),
            },
            _ => {
                self.error("expected expression");
                None
            }
        }
    }

    /// Chain = Segment (`.` Segment)*
    /// Segment = Ident (`(` Arguments `)`)?
    fn parse_chain(&mut self) -> NodeId {
        let mut path = Vec::new();
        loop {
            let value = SmolStr::new(self.current_text());
            let start = self.bump().start();
            let segment = if self.at(TokenKind::LParen) {
                self.bump();
                let args = self.parse_argument_list(TokenKind::RParen, "`)`");
                self.tree.alloc(
                    NodeKind::ObjectFunctionPathNode { value, args },
                    TextRange::new(start, self.last_end),
                )
            } else {
                self.tree.alloc(
                    NodeKind::ObjectPathNode { value },
                    TextRange::new(start, self.last_end),
                )
            };
            path.push(segment);

            if self.at(TokenKind::Dot) && self.nth(1) == TokenKind::Ident {
                self.bump();
                continue;
            }
            break;
        }

        let start = self.tree.range(path[0]).start();
        let end = self.tree.range(path[path.len() - 1]).end();
        self.tree
            .alloc(NodeKind::ObjectNode { path }, TextRange::new(start, end))
    }

    /// Arguments = (Expression (`,` Expression)*)? <close>
    fn parse_argument_list(&mut self, close: TokenKind, what: &str) -> Vec<NodeId> {
        let mut args = Vec::new();
        while !self.at_eof() && !self.at(close) {
            let pos_before = self.pos;
            if let Some(arg) = self.parse_expression() {
                args.push(arg);
            }
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
            if self.pos == pos_before {
                break;
            }
        }
        self.expect(close, what);
        args
    }
}
