//! # Lexer - Tokenizing a Prose Run
//!
//! This module provides the first stage of parsing: breaking a flattened text
//! run into tokens using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! **Every byte in the input appears in exactly one token.** Characters the
//! grammar has no rule for become `UNKNOWN` tokens instead of being skipped,
//! so the parser can report where a match fails and the tree can still be
//! turned back into the original text:
//!
//! ```
//! use linewise_grammar::lexer::lex;
//!
//! let input = "Hello, world! 50% done.";
//! let tokens = lex(input);
//!
//! let reconstructed: String = tokens.iter().map(|t| t.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## Token Design
//!
//! Tokens are context-free. The lexer doesn't know whether `-` joins a
//! concatenated word or breaks a clause, or whether `)` is inline punctuation
//! or the start of an end-parens break. That is the parser's job.
//!
//! Letters and digits are grouped into `ALNUM` runs ("Hello" is one token).
//! Word shapes like acronyms (`e.g.`) and contractions (`Robert's`) are
//! assembled from several tokens by the grammar.

use logos::Logos;

use crate::syntax_kind::SyntaxKind;

/// Token kinds produced by the Logos lexer.
///
/// This enum exists separately from [`SyntaxKind`] because Logos needs to
/// derive on it. Each variant maps to a corresponding `SyntaxKind` token.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// ASCII whitespace including line endings. NBSP is intentionally absent.
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    /// Letters (with combining marks) and ASCII digits
    #[regex(r"[\p{L}\p{M}0-9]+")]
    Alnum,

    #[token(".")]
    Period,

    #[token("!")]
    Bang,

    #[token("?")]
    Question,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token("-")]
    Dash,

    /// En dash (U+2013) or em dash (U+2014)
    #[regex("[\u{2013}\u{2014}]")]
    LongDash,

    #[token(",")]
    Comma,

    #[regex("[\"\u{201C}\u{201D}]")]
    DoubleQuote,

    #[regex("['\u{2018}\u{2019}]")]
    SingleQuote,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    /// A complete placeholder: start marker, anything but the end marker, end marker
    #[regex("\u{FFF9}[^\u{FFFB}]*\u{FFFB}")]
    Placeholder,
}

impl TokenKind {
    /// Convert to SyntaxKind.
    pub fn to_syntax_kind(self) -> SyntaxKind {
        match self {
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Alnum => SyntaxKind::ALNUM,
            TokenKind::Period => SyntaxKind::PERIOD,
            TokenKind::Bang => SyntaxKind::BANG,
            TokenKind::Question => SyntaxKind::QUESTION,
            TokenKind::Colon => SyntaxKind::COLON,
            TokenKind::Semicolon => SyntaxKind::SEMICOLON,
            TokenKind::Dash => SyntaxKind::DASH,
            TokenKind::LongDash => SyntaxKind::LONG_DASH,
            TokenKind::Comma => SyntaxKind::COMMA,
            TokenKind::DoubleQuote => SyntaxKind::DOUBLE_QUOTE,
            TokenKind::SingleQuote => SyntaxKind::SINGLE_QUOTE,
            TokenKind::LParen => SyntaxKind::LPAREN,
            TokenKind::RParen => SyntaxKind::RPAREN,
            TokenKind::Placeholder => SyntaxKind::PLACEHOLDER,
        }
    }
}

/// A lexed token with its kind and text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

impl Token<'_> {
    /// True for an `ALNUM` token made of a single letter (acronym building block).
    pub fn is_single_letter(&self) -> bool {
        let mut chars = self.text.chars();
        self.kind == SyntaxKind::ALNUM
            && matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
    }

    /// True for an `ALNUM` token that starts with a letter rather than a digit.
    pub fn starts_with_letter(&self) -> bool {
        self.kind == SyntaxKind::ALNUM && self.text.chars().next().is_some_and(char::is_alphabetic)
    }
}

/// Lex the input into a sequence of tokens.
///
/// Guarantees that all bytes from the input appear in the output tokens.
pub fn lex(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        let kind = match result {
            Ok(token_kind) => token_kind.to_syntax_kind(),
            Err(()) => SyntaxKind::UNKNOWN,
        };
        tokens.push(Token { kind, text });
    }

    tokens
}
