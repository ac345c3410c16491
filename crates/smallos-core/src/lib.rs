// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Smallos language front end.
//!
//! This crate contains:
//! - Lexical analysis (tokenization)
//! - Parsing (AST construction)
//! - A reachability pass that trims statements after an answer
//!
//! Both lexing and parsing stop at the first error. Errors carry the line
//! number and byte span of the offending token and render through
//! [`miette`].
//!
//! ```
//! use smallos_core::ast::Statement;
//!
//! let program = smallos_core::parse_source("x := 3 + 4.").unwrap();
//! assert!(matches!(program.statements[0], Statement::Assignment { .. }));
//! ```

pub mod analyse;
pub mod ast;
pub mod source_analysis;

pub use source_analysis::{Error, parse, parse_source, tokenize};

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::ast::{Expression, Identifier, Program, Statement, Value};
    pub use crate::source_analysis::{Error, Span, Token, TokenKind, parse_source};
}
