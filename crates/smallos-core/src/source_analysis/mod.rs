// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Lexing and parsing for Smallos source code.
//!
//! # Lexical Analysis
//!
//! [`tokenize`] converts source text into a sequence of [`Token`]s ending in
//! exactly one `EOF` token. Each token carries its kind, its raw lexeme, the
//! line it starts on and its byte [`Span`].
//!
//! ```
//! use smallos_core::source_analysis::tokenize;
//!
//! let tokens = tokenize("Transcript show: \"Hello World!\".").unwrap();
//! assert_eq!(tokens.len(), 6); // Transcript, show, :, "Hello World!", ., EOF
//! ```
//!
//! # Parsing
//!
//! [`parse`] converts the token sequence into a [`Program`]. Use
//! [`parse_source`] to run both steps at once.
//!
//! # Error Handling
//!
//! Both steps are fail-fast. [`LexError`] and [`ParseError`] implement
//! [`miette::Diagnostic`]; [`Error`] wraps either one.

mod error;
mod lexer;
mod parser;
mod span;
mod token;


pub use error::{Error, LexError, LexErrorKind, ParseError};
pub use lexer::{Lexer, tokenize};
pub use parser::{DEFAULT_MAX_NESTING_DEPTH, ParserConfig, parse, parse_with_config};
pub use span::Span;
pub use token::{Token, TokenKind};

use crate::ast::Program;

/// Tokenizes and parses `source` with the default [`ParserConfig`].
///
/// # Errors
///
/// Returns [`Error::Lex`] if the source contains a character no lexical rule
/// accepts, or [`Error::Parse`] for the first grammar violation.
///
/// # Examples
///
/// ```
/// use smallos_core::source_analysis::parse_source;
///
/// let program = parse_source("class Test is\n var x.\nend").unwrap();
/// assert_eq!(program.statements.len(), 1);
///
/// let error = parse_source("x := 1").unwrap_err();
/// assert_eq!(error.line(), 1);
/// ```
pub fn parse_source(source: &str) -> Result<Program, Error> {
    let tokens = tokenize(source)?;
    Ok(parse(tokens)?)
}
