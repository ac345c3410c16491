// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Token types produced by the Smallos lexer.
//!
//! A [`Token`] pairs a fieldless [`TokenKind`] with the raw source text it
//! was scanned from (its lexeme), the line the scan began on and its byte
//! [`Span`]. The parser decodes literal lexemes itself, so the token stream
//! stays a faithful copy of the input.
//!
//! # Token classes
//!
//! - Literals: identifiers, `#symbols`, `"strings"`, `xFF` bytes, numbers
//! - Operators: binary operator clusters (`+`, `<=`, `->`) and `:=`
//! - Punctuation: `. : ; , # ( ) [ ] { } ^ | @`
//! - Reserved words: `class trait extending implementing is as static var def
//!   end require true false nil`

use std::fmt;

use ecow::EcoString;

use super::Span;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Literals ===
    /// An identifier: `x`, `Transcript`, `run_test`
    Identifier,
    /// A symbol literal including its hash: `#foo`
    Symbol,
    /// A double-quoted string including its delimiters: `"a ""b"""`
    String,
    /// A byte literal: `x0f`
    Byte,
    /// A number with optional sign and fraction: `-3`, `2.5`
    Number,

    // === Operators ===
    /// A cluster of operator characters: `+`, `<=`, `->`
    BinaryOperator,
    /// `:=`
    Assign,

    // === Punctuation ===
    Period,
    Colon,
    Semicolon,
    Comma,
    Hash,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    /// `^`
    Answer,
    Pipe,
    At,

    // === Reserved words ===
    Class,
    Trait,
    Extending,
    Implementing,
    Is,
    As,
    Static,
    Var,
    Def,
    End,
    Require,
    True,
    False,
    Nil,

    /// End of input. Always the last token of a stream.
    Eof,
}

impl TokenKind {
    /// Returns the upper-case name used in token dumps and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Identifier => "ID",
            Self::Symbol => "SYMBOL",
            Self::String => "STRING",
            Self::Byte => "BYTE",
            Self::Number => "NUMBER",
            Self::BinaryOperator => "BINOP",
            Self::Assign => "ASSIGN",
            Self::Period => "PERIOD",
            Self::Colon => "COLON",
            Self::Semicolon => "SEMICOLON",
            Self::Comma => "COMMA",
            Self::Hash => "HASH",
            Self::LeftParen => "LPAREN",
            Self::RightParen => "RPAREN",
            Self::LeftBracket => "LBRACKET",
            Self::RightBracket => "RBRACKET",
            Self::LeftBrace => "LBRACE",
            Self::RightBrace => "RBRACE",
            Self::Answer => "ANSWER",
            Self::Pipe => "PIPE",
            Self::At => "AT",
            Self::Class => "CLASS",
            Self::Trait => "TRAIT",
            Self::Extending => "EXTENDING",
            Self::Implementing => "IMPLEMENTING",
            Self::Is => "IS",
            Self::As => "AS",
            Self::Static => "STATIC",
            Self::Var => "VAR",
            Self::Def => "DEF",
            Self::End => "END",
            Self::Require => "REQUIRE",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Nil => "NIL",
            Self::Eof => "EOF",
        }
    }

    /// Looks up a reserved word. Matching is exact and case-sensitive.
    #[must_use]
    pub fn reserved_word(word: &str) -> Option<Self> {
        let kind = match word {
            "class" => Self::Class,
            "trait" => Self::Trait,
            "extending" => Self::Extending,
            "implementing" => Self::Implementing,
            "is" => Self::Is,
            "as" => Self::As,
            "static" => Self::Static,
            "var" => Self::Var,
            "def" => Self::Def,
            "end" => Self::End,
            "require" => Self::Require,
            "true" => Self::True,
            "false" => Self::False,
            "nil" => Self::Nil,
            _ => return None,
        };
        Some(kind)
    }

    /// Maps a single punctuation character to its kind.
    #[must_use]
    pub const fn punctuation(c: char) -> Option<Self> {
        let kind = match c {
            '.' => Self::Period,
            ':' => Self::Colon,
            ';' => Self::Semicolon,
            ',' => Self::Comma,
            '#' => Self::Hash,
            '(' => Self::LeftParen,
            ')' => Self::RightParen,
            '[' => Self::LeftBracket,
            ']' => Self::RightBracket,
            '{' => Self::LeftBrace,
            '}' => Self::RightBrace,
            '^' => Self::Answer,
            '|' => Self::Pipe,
            '@' => Self::At,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns `true` for tokens that denote a literal value.
    ///
    /// Identifiers and bytes are excluded: identifiers name values and bytes
    /// only appear inside `#[ ... ]`.
    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            Self::Number | Self::String | Self::Symbol | Self::True | Self::False | Self::Nil
        )
    }

    /// Returns `true` if a statement starting with this token is an expression.
    #[must_use]
    pub const fn starts_expression(self) -> bool {
        self.is_literal()
            || matches!(
                self,
                Self::Identifier
                    | Self::LeftBrace
                    | Self::LeftBracket
                    | Self::Hash
                    | Self::LeftParen
            )
    }

    #[must_use]
    pub const fn is_reserved_word(self) -> bool {
        matches!(
            self,
            Self::Class
                | Self::Trait
                | Self::Extending
                | Self::Implementing
                | Self::Is
                | Self::As
                | Self::Static
                | Self::Var
                | Self::Def
                | Self::End
                | Self::Require
                | Self::True
                | Self::False
                | Self::Nil
        )
    }

    #[must_use]
    pub const fn is_eof(self) -> bool {
        matches!(self, Self::Eof)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scanned token.
///
/// # Examples
///
/// ```
/// use smallos_core::source_analysis::{Span, Token, TokenKind};
///
/// let token = Token::new(TokenKind::Identifier, "show", 3, Span::new(40, 44));
/// assert_eq!(token.to_string(), "(<ID> show @ 3)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    lexeme: EcoString,
    line: u32,
    span: Span,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, lexeme: impl Into<EcoString>, line: u32, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            span,
        }
    }

    /// Creates the end-of-input marker. Its lexeme is empty.
    #[must_use]
    pub fn eof(line: u32, offset: u32) -> Self {
        Self::new(TokenKind::Eof, EcoString::new(), line, Span::point(offset))
    }

    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The exact source text of this token.
    #[must_use]
    pub fn lexeme(&self) -> &EcoString {
        &self.lexeme
    }

    /// Consumes the token and returns its lexeme.
    #[must_use]
    pub fn into_lexeme(self) -> EcoString {
        self.lexeme
    }

    /// The 1-based line on which this token starts.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(<{}> {} @ {})", self.kind, self.lexeme, self.line)
    }
}
