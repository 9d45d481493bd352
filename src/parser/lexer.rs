//! Logos-based lexer for Fusion and the embedded Eel expression language
//!
//! One token set serves both languages; the parser decides which grammar
//! applies from context (`${` opens an expression). Component names
//! (`Vendor.Package:Name`) and decimals are assembled by the parser from
//! adjacent tokens. An `include:` declaration at the start of a line is
//! taken raw up to the newline, since glob paths would otherwise lex as
//! comment openers.

use logos::Logos;

use crate::base::{TextRange, TextSize};

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub range: TextRange,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
        }
    }
}

impl Lexer<'_> {
    /// Current token is `include`, first on its line and followed by `:`
    fn at_include_declaration(&self) -> bool {
        if self.inner.slice() != "include" {
            return false;
        }
        let before = &self.inner.source()[..self.inner.span().start];
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        before[line_start..].trim().is_empty()
            && self
                .inner
                .remainder()
                .trim_start_matches([' ', '\t'])
                .starts_with(':')
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;

        let kind = match logos_token {
            Ok(LogosToken::Ident) if self.at_include_declaration() => {
                let rest = self.inner.remainder();
                self.inner.bump(rest.find('\n').unwrap_or(rest.len()));
                TokenKind::IncludeLine
            }
            Ok(t) => t.into(),
            Err(()) => TokenKind::Unknown,
        };

        let span = self.inner.span();
        let range = TextRange::new(
            TextSize::new(span.start as u32),
            TextSize::new(span.end as u32),
        );
        Some(Token {
            kind,
            text: self.inner.slice(),
            range,
        })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Token kinds seen by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Whitespace,
    Comment,
    Ident,
    Number,
    String,
    Dsl,
    EelOpen,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Dot,
    Comma,
    At,
    Eq,
    EqEq,
    BangEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AmpAmp,
    PipePipe,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Question,
    Colon,
    /// Whole `include: <path>` line
    IncludeLine,
    Unknown,
    Eof,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }
}

/// Logos token enum - maps to TokenKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    #[regex(r"#[^\n]*")]
    #[token("/*", block_comment)]
    Comment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9]+")]
    Number,

    #[regex(r#"'([^'\\]|\\.)*'"#)]
    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    #[regex(r"[a-zA-Z][a-zA-Z0-9]*`[^`]*`")]
    Dsl,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION (must come before single-char)
    // =========================================================================
    #[token("${")]
    EelOpen,

    #[token("==")]
    EqEq,

    #[token("!=")]
    BangEq,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    #[token("&&")]
    AmpAmp,

    #[token("||")]
    PipePipe,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(".")]
    Dot,

    #[token(",")]
    Comma,

    #[token("@")]
    At,

    #[token("=")]
    Eq,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("!")]
    Bang,

    #[token("?")]
    Question,

    #[token(":")]
    Colon,
}

/// Consume a block comment through `*/`, or to the end of input if unclosed
fn block_comment(lex: &mut logos::Lexer<LogosToken>) {
    let rest = lex.remainder();
    let len = rest.find("*/").map(|end| end + 2).unwrap_or(rest.len());
    lex.bump(len);
}

impl From<LogosToken> for TokenKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            Whitespace => TokenKind::Whitespace,
            Comment => TokenKind::Comment,
            Ident => TokenKind::Ident,
            Number => TokenKind::Number,
            String => TokenKind::String,
            Dsl => TokenKind::Dsl,
            EelOpen => TokenKind::EelOpen,
            EqEq => TokenKind::EqEq,
            BangEq => TokenKind::BangEq,
            LtEq => TokenKind::LtEq,
            GtEq => TokenKind::GtEq,
            AmpAmp => TokenKind::AmpAmp,
            PipePipe => TokenKind::PipePipe,
            LParen => TokenKind::LParen,
            RParen => TokenKind::RParen,
            LBrace => TokenKind::LBrace,
            RBrace => TokenKind::RBrace,
            LBracket => TokenKind::LBracket,
            RBracket => TokenKind::RBracket,
            Dot => TokenKind::Dot,
            Comma => TokenKind::Comma,
            At => TokenKind::At,
            Eq => TokenKind::Eq,
            Lt => TokenKind::Lt,
            Gt => TokenKind::Gt,
            Plus => TokenKind::Plus,
            Minus => TokenKind::Minus,
            Star => TokenKind::Star,
            Slash => TokenKind::Slash,
            Percent => TokenKind::Percent,
            Bang => TokenKind::Bang,
            Question => TokenKind::Question,
            Colon => TokenKind::Colon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn test_lex_prototype_copy() {
        assert_eq!(
            kinds("prototype(Acme:Button) < prototype(Neos.Fusion:Tag)"),
            vec![
                TokenKind::Ident,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Ident,
                TokenKind::RParen,
                TokenKind::Lt,
                TokenKind::Ident,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::Dot,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Ident,
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_lex_eel_call_chain() {
        assert_eq!(
            kinds("${I18n.translate('a.b')}"),
            vec![
                TokenKind::EelOpen,
                TokenKind::Ident,
                TokenKind::Dot,
                TokenKind::Ident,
                TokenKind::LParen,
                TokenKind::String,
                TokenKind::RParen,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_lex_comments_are_trivia() {
        let tokens = tokenize("# hash\n// line\n/* block\n */ a");
        let non_trivia: Vec<_> = tokens.iter().filter(|t| !t.kind.is_trivia()).collect();
        assert_eq!(non_trivia.len(), 1);
        assert_eq!(non_trivia[0].text, "a");
    }

    #[test]
    fn test_lex_block_comment_inside_line() {
        let tokens = tokenize("a = 1 /* c */\nb = 2");
        let texts: Vec<_> = tokens
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .map(|t| t.text)
            .collect();
        assert_eq!(texts, vec!["a", "=", "1", "b", "=", "2"]);
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Comment && t.text == "/* c */"));
    }

    #[test]
    fn test_lex_block_comment_with_stars() {
        assert_eq!(kinds("/** doc **/ a"), vec![TokenKind::Ident]);
        assert_eq!(kinds("/* a * b */ c"), vec![TokenKind::Ident]);
    }

    #[test]
    fn test_lex_unclosed_block_comment_runs_to_end() {
        assert!(kinds("a /* never closed\nb = 1").len() == 1);
    }

    #[test]
    fn test_lex_include_line_is_one_token() {
        let tokens: Vec<_> = tokenize("include: Components/**/*.fusion\nroot = 1")
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .collect();
        assert_eq!(tokens[0].kind, TokenKind::IncludeLine);
        assert_eq!(tokens[0].text, "include: Components/**/*.fusion");
        assert_eq!(tokens[1].text, "root");
    }

    #[test]
    fn test_lex_include_as_path_segment_stays_ident() {
        assert_eq!(
            kinds("a.include = 1"),
            vec![TokenKind::Ident, TokenKind::Dot, TokenKind::Ident, TokenKind::Eq, TokenKind::Number]
        );
    }

    #[test]
    fn test_lex_decimal_as_adjacent_tokens() {
        assert_eq!(
            kinds("1.5"),
            vec![TokenKind::Number, TokenKind::Dot, TokenKind::Number]
        );
    }

    #[test]
    fn test_lex_token_ranges() {
        let tokens = tokenize("ab = 'x'");
        assert_eq!(tokens[0].range, TextRange::new(0.into(), 2.into()));
        assert_eq!(tokens[4].range, TextRange::new(5.into(), 8.into()));
    }
}
