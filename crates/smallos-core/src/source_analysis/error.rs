// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error types for the Smallos front end.
//!
//! Both error kinds are fatal to the call that raised them: the lexer stops at
//! the first character it cannot classify and the parser stops at the first
//! grammar violation. Each error carries the 1-based line and the byte
//! [`Span`] it refers to, and renders through [`miette`].

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use ecow::EcoString;
use miette::Diagnostic;
use thiserror::Error;

use super::{Span, Token, TokenKind};

/// A lexical error encountered during tokenization.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("line {line}: {kind}")]
#[diagnostic(code(smallos::lex))]
pub struct LexError {
    #[source]
    pub kind: LexErrorKind,
    /// Line on which the offending token started.
    pub line: u32,
    #[label("here")]
    pub span: Span,
}

impl LexError {
    #[must_use]
    pub fn new(kind: LexErrorKind, line: u32, span: Span) -> Self {
        Self { kind, line, span }
    }

    #[must_use]
    pub fn unexpected_char(c: char, line: u32, span: Span) -> Self {
        Self::new(LexErrorKind::UnexpectedCharacter(c), line, span)
    }

    /// The span covers the string from its opening quote to the end of input.
    #[must_use]
    pub fn unterminated_string(line: u32, span: Span) -> Self {
        Self::new(LexErrorKind::UnterminatedString, line, span)
    }
}

/// The kind of lexical error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    #[error("unterminated string literal")]
    UnterminatedString,
}

/// A syntax error raised by the parser.
///
/// `found` is the kind of the token the parser was looking at and `expected`
/// is set when a specific token kind was required.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("line {line}: {message}")]
#[diagnostic(code(smallos::parse))]
pub struct ParseError {
    pub message: EcoString,
    pub line: u32,
    pub expected: Option<TokenKind>,
    pub found: Option<TokenKind>,
    #[label("{message}")]
    pub span: Span,
}

impl ParseError {
    /// An error located at `token`.
    #[must_use]
    pub fn at(token: &Token, message: impl Into<EcoString>) -> Self {
        Self {
            message: message.into(),
            line: token.line(),
            expected: None,
            found: Some(token.kind()),
            span: token.span(),
        }
    }

    /// An error covering the source from `first` through `last`.
    #[must_use]
    pub fn spanning(first: &Token, last: &Token, message: impl Into<EcoString>) -> Self {
        Self {
            span: first.span().to(last.span()),
            ..Self::at(first, message)
        }
    }

    /// A required `expected` token was missing; `token` was found instead.
    #[must_use]
    pub fn expected(expected: TokenKind, token: &Token, message: Option<&str>) -> Self {
        let message = match message {
            Some(message) => EcoString::from(message),
            None => ecow::eco_format!("Expected {expected}, got {}.", token.kind()),
        };
        Self {
            expected: Some(expected),
            ..Self::at(token, message)
        }
    }

    /// The token sequence handed to the parser is not terminated by `EOF`.
    #[must_use]
    pub fn missing_eof(last: Option<&Token>) -> Self {
        const MESSAGE: &str = "Token stream must end with EOF.";
        match last {
            Some(token) => Self {
                expected: Some(TokenKind::Eof),
                ..Self::at(token, MESSAGE)
            },
            None => Self {
                message: MESSAGE.into(),
                line: 1,
                expected: Some(TokenKind::Eof),
                found: None,
                span: Span::default(),
            },
        }
    }
}

/// Any failure of the source-to-AST pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    #[must_use]
    pub fn line(&self) -> u32 {
        match self {
            Self::Lex(error) => error.line,
            Self::Parse(error) => error.line,
        }
    }

    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Lex(error) => error.span,
            Self::Parse(error) => error.span,
        }
    }
}
