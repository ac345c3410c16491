// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for Smallos source code.
//!
//! The parser consumes a token sequence produced by
//! [`tokenize`](crate::source_analysis::tokenize) and builds a
//! [`Program`]. It is fail-fast: the first grammar violation aborts the parse
//! with a [`ParseError`] carrying the line, the expected and found token
//! kinds and a message.
//!
//! # Message Precedence
//!
//! Smallos follows Smalltalk's three-tier message precedence, tightest first:
//!
//! 1. **Unary messages**: `object message`
//! 2. **Binary messages**: `3 + 4 * 2`, strictly left to right
//! 3. **Keyword messages**: `array at: 1 put: "x"`
//!
//! A keyword expression may be followed by `;`-separated cascade clauses.
//!
//! # Usage
//!
//! ```
//! use smallos_core::source_analysis::{parse, tokenize};
//!
//! let tokens = tokenize("x := 3 + 4.").unwrap();
//! let program = parse(tokens).unwrap();
//! assert_eq!(program.statements.len(), 1);
//! ```

use tracing::debug;

use crate::ast::{Expression, Identifier, Program, Statement, Value};
use crate::source_analysis::{ParseError, Token, TokenKind};

// Submodules with additional impl blocks for Parser
mod declarations;
mod expressions;


pub(super) type ParseResult<T> = Result<T, ParseError>;

/// Message reported when a statement is not terminated by `.`.
const MISSING_PERIOD: &str = "Statements must be ended with a period.";

/// Default maximum nesting depth.
///
/// Every statement and expression entered while another is still being
/// parsed counts as one level, so a block nested in a block nested in a
/// statement is several levels deep. 256 is far beyond hand-written code.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 256;

/// Tunables for a single parse.
///
/// ```
/// use smallos_core::source_analysis::ParserConfig;
///
/// let config = ParserConfig::default().with_max_nesting_depth(32);
/// assert_eq!(config.max_nesting_depth, 32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Nesting depth beyond which parsing stops with an error instead of
    /// recursing further.
    pub max_nesting_depth: usize,
}

impl ParserConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }

    #[must_use]
    pub const fn with_max_nesting_depth(mut self, max_nesting_depth: usize) -> Self {
        self.max_nesting_depth = max_nesting_depth;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a token sequence into a [`Program`] using the default
/// [`ParserConfig`].
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered, or an error if `tokens` is
/// not terminated by exactly one `EOF` token.
pub fn parse(tokens: Vec<Token>) -> Result<Program, ParseError> {
    parse_with_config(tokens, &ParserConfig::default())
}

/// Parses a token sequence into a [`Program`].
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered, or an error if `tokens` is
/// not terminated by exactly one `EOF` token.
pub fn parse_with_config(
    tokens: Vec<Token>,
    config: &ParserConfig,
) -> Result<Program, ParseError> {
    let eof_position = tokens.iter().position(|token| token.kind().is_eof());
    if eof_position.is_none_or(|position| position + 1 != tokens.len()) {
        return Err(ParseError::missing_eof(tokens.last()));
    }

    debug!(tokens = tokens.len(), "parsing token stream");
    let mut parser = Parser::new(tokens, config.max_nesting_depth);
    let result = parser.parse_program();
    match &result {
        Ok(program) => debug!(statements = program.len(), "parsed program"),
        Err(error) => debug!(line = error.line, message = %error.message, "parse failed"),
    }
    result
}

/// The parser state.
pub(super) struct Parser {
    /// The tokens being parsed. Never empty; the last token is `EOF`.
    tokens: Vec<Token>,
    /// Current token index.
    current: usize,
    nesting_depth: usize,
    max_nesting_depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>, max_nesting_depth: usize) -> Self {
        Self {
            tokens,
            current: 0,
            nesting_depth: 0,
            max_nesting_depth,
        }
    }

    // ========================================================================
    // Token Management
    // ========================================================================

    pub(super) fn current_token(&self) -> &Token {
        &self.tokens[self.current]
    }

    pub(super) fn current_kind(&self) -> TokenKind {
        self.current_token().kind()
    }

    /// The kind of the token after the current one, if any.
    pub(super) fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.current + 1).map(Token::kind)
    }

    pub(super) fn is_at_end(&self) -> bool {
        self.current_kind().is_eof()
    }

    /// Consumes the current token and returns it. The cursor never moves
    /// past `EOF`.
    pub(super) fn advance(&mut self) -> Token {
        let token = self.tokens[self.current].clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Checks the kind of the token after the current one.
    pub(super) fn lookahead(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    /// Consumes the current token if it is of `kind`.
    pub(super) fn accept(&mut self, kind: TokenKind) -> Option<Token> {
        self.check(kind).then(|| self.advance())
    }

    /// Consumes a token of `kind` or fails with "Expected KIND, got KIND.".
    pub(super) fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        self.expect_with(kind, None)
    }

    /// Consumes a token of `kind` or fails with `message`.
    pub(super) fn expect_with(
        &mut self,
        kind: TokenKind,
        message: Option<&str>,
    ) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::expected(kind, self.current_token(), message))
        }
    }

    pub(super) fn expect_period(&mut self) -> ParseResult<Token> {
        self.expect_with(TokenKind::Period, Some(MISSING_PERIOD))
    }

    /// An error located at the current token.
    pub(super) fn error(&self, message: impl Into<ecow::EcoString>) -> ParseError {
        ParseError::at(self.current_token(), message)
    }

    // ========================================================================
    // Nesting Guard
    // ========================================================================

    /// Runs `parse` one nesting level deeper.
    ///
    /// Fails once the configured depth is exceeded. `stacker::maybe_grow`
    /// extends the stack on the heap if remaining space falls below 32 KiB,
    /// so the depth limit rather than the thread's stack size decides how
    /// deep input may nest.
    pub(super) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        stacker::maybe_grow(32 * 1024, 256 * 1024, || {
            self.enter_nesting()?;
            let result = parse(self);
            self.leave_nesting();
            result
        })
    }

    fn enter_nesting(&mut self) -> ParseResult<()> {
        if self.nesting_depth >= self.max_nesting_depth {
            return Err(self.error(format!(
                "Expression nesting is too deep (maximum {} levels).",
                self.max_nesting_depth
            )));
        }
        self.nesting_depth += 1;
        Ok(())
    }

    fn leave_nesting(&mut self) {
        debug_assert!(
            self.nesting_depth > 0,
            "leave_nesting called without matching enter_nesting"
        );
        self.nesting_depth = self.nesting_depth.saturating_sub(1);
    }

    // ========================================================================
    // Program & Statements
    // ========================================================================

    fn parse_program(&mut self) -> ParseResult<Program> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }
        Ok(Program::new(statements))
    }

    /// Parses one statement.
    ///
    /// ```text
    /// statement := classDef | traitDef | tempDecl | answer | pragma
    ///            | assignment | expression "."
    /// ```
    pub(super) fn parse_statement(&mut self) -> ParseResult<Statement> {
        self.nested(|parser| match parser.current_kind() {
            TokenKind::Class => Ok(Statement::ClassDef(parser.parse_class_definition()?)),
            TokenKind::Trait => Ok(Statement::TraitDef(parser.parse_trait_definition()?)),
            TokenKind::Var => parser.parse_temp_declaration(),
            TokenKind::Answer => parser.parse_answer(),
            TokenKind::At => Ok(Statement::Pragma(parser.parse_pragma()?)),
            TokenKind::Identifier if parser.lookahead(TokenKind::Assign) => {
                parser.parse_assignment()
            }
            kind if kind.starts_expression() => {
                let expression = parser.parse_expression()?;
                parser.expect_period()?;
                Ok(Statement::Expression(expression))
            }
            _ => Err(parser.error("Expected statement.")),
        })
    }

    /// `var name [:= expr] .`
    fn parse_temp_declaration(&mut self) -> ParseResult<Statement> {
        self.expect(TokenKind::Var)?;
        let name = self.parse_identifier()?;
        let initializer = self.parse_optional_initializer()?;
        self.expect_period()?;
        Ok(Statement::TempDecl { name, initializer })
    }

    /// `:= expr`, or `nil` when there is no initializer.
    pub(super) fn parse_optional_initializer(&mut self) -> ParseResult<Expression> {
        if self.accept(TokenKind::Assign).is_some() {
            self.parse_expression()
        } else {
            Ok(Expression::Value(Value::Nil))
        }
    }

    /// `^ expr .`
    fn parse_answer(&mut self) -> ParseResult<Statement> {
        self.expect(TokenKind::Answer)?;
        let value = self.parse_expression()?;
        self.expect_period()?;
        Ok(Statement::Answer(value))
    }

    /// `name := expr .`
    fn parse_assignment(&mut self) -> ParseResult<Statement> {
        let target = self.parse_identifier()?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expression()?;
        self.expect_period()?;
        Ok(Statement::Assignment { target, value })
    }

    pub(super) fn parse_identifier(&mut self) -> ParseResult<Identifier> {
        let token = self.expect(TokenKind::Identifier)?;
        Ok(Identifier::new(token.into_lexeme()))
    }
}

#[cfg(test)]
mod tests {
    //! Tests for the Smallos recursive descent parser.
    use super::*;
    use crate::ast::{
        BinaryMessage, Block, KeywordMessage, Message, Number, Pragma, UnaryMessage,
    };
    use crate::source_analysis::{Span, tokenize};

    fn parse_ok(source: &str) -> Program {
        let tokens = tokenize(source).unwrap();
        match parse(tokens) {
            Ok(program) => program,
            Err(error) => panic!("Expected {source:?} to parse, got: {error}"),
        }
    }

    fn parse_err(source: &str) -> ParseError {
        let tokens = tokenize(source).unwrap();
        match parse(tokens) {
            Ok(program) => panic!("Expected {source:?} to fail, got: {program:?}"),
            Err(error) => error,
        }
    }

    fn single_expression(source: &str) -> Expression {
        let program = parse_ok(source);
        assert_eq!(program.statements.len(), 1);
        match program.statements.into_iter().next() {
            Some(Statement::Expression(expression)) => expression,
            other => panic!("Expected expression statement, got {other:?}"),
        }
    }

    fn int(value: i64) -> Expression {
        Expression::Value(Value::Num(Number::Integer(value)))
    }

    #[test]
    fn parse_empty_program() {
        assert!(parse_ok("").is_empty());
        assert!(parse_ok("// nothing here\n").is_empty());
    }

    #[test]
    fn parse_requires_eof() {
        let err = parse(Vec::new()).unwrap_err();
        assert_eq!(err.message, "Token stream must end with EOF.");

        let mut tokens = tokenize("x.").unwrap();
        tokens.pop();
        let err = parse(tokens).unwrap_err();
        assert_eq!(err.message, "Token stream must end with EOF.");
        assert_eq!(err.found, Some(TokenKind::Period));
    }

    #[test]
    fn parse_rejects_eof_before_end() {
        let mut tokens = tokenize("x.").unwrap();
        tokens.insert(0, Token::eof(1, 0));
        let err = parse(tokens).unwrap_err();
        assert_eq!(err.message, "Token stream must end with EOF.");
    }

    #[test]
    fn parse_literal_statement() {
        assert_eq!(single_expression("42."), int(42));
        assert_eq!(
            single_expression("-2.5."),
            Expression::Value(Value::Num(Number::Float(-2.5)))
        );
        assert_eq!(single_expression("nil."), Expression::Value(Value::Nil));
        assert_eq!(
            single_expression("true."),
            Expression::Value(Value::Bool(true))
        );
    }

    #[test]
    fn parse_assignment_statement() {
        let program = parse_ok("x := 1.");
        assert_eq!(
            program.statements,
            vec![Statement::Assignment {
                target: Identifier::new("x"),
                value: int(1),
            }]
        );
    }

    #[test]
    fn parse_precedence_unary_binds_before_binary() {
        let program = parse_ok("x := 1 + 2 squared.");
        let Statement::Assignment { value, .. } = &program.statements[0] else {
            panic!("Expected assignment");
        };
        assert_eq!(
            *value,
            Expression::Binary {
                receiver: Box::new(int(1)),
                messages: vec![BinaryMessage::new(
                    "+",
                    Expression::Unary {
                        receiver: Value::Num(Number::Integer(2)),
                        messages: vec![UnaryMessage::new("squared")],
                    },
                )],
            }
        );
    }

    #[test]
    fn parse_binary_is_left_to_right() {
        let expression = single_expression("1 + 2 * 3.");
        match expression {
            Expression::Binary { receiver, messages } => {
                assert_eq!(*receiver, int(1));
                let operators: Vec<_> = messages.iter().map(|m| m.operator.as_str()).collect();
                assert_eq!(operators, vec!["+", "*"]);
                assert_eq!(messages[1].argument, int(3));
            }
            other => panic!("Expected binary expression, got {other:?}"),
        }
    }

    #[test]
    fn parse_keyword_message_with_binary_arguments() {
        let expression = single_expression("dict at: 1 + 1 put: x size.");
        let Expression::Keyword { receiver, message } = expression else {
            panic!("Expected keyword expression");
        };
        assert_eq!(*receiver, Expression::identifier("dict"));
        assert_eq!(message.name, "at:put:");
        let parts: Vec<_> = message.parts().map(|p| p.as_str()).collect();
        assert_eq!(parts, vec!["at", "put"]);
        assert!(matches!(message.argument("at"), Some(Expression::Binary { .. })));
        assert!(matches!(message.argument("put"), Some(Expression::Unary { .. })));
    }

    #[test]
    fn parse_duplicate_keyword_part_is_error() {
        let err = parse_err("a at: 1 at: 2.");
        assert_eq!(err.message, "Duplicate keyword part 'at:'.");
        assert_eq!(err.span, Span::new(8, 11));
        assert_eq!(err.line, 1);
    }

    #[test]
    fn parse_cascade() {
        let expression = single_expression("Transcript show: 1; cr; + 2; show: 3.");
        let Expression::Cascade { primary, messages } = expression else {
            panic!("Expected cascade");
        };
        assert!(matches!(*primary, Expression::Keyword { .. }));
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], Message::Unary(UnaryMessage::new("cr")));
        assert_eq!(
            messages[1],
            Message::Binary(BinaryMessage::new("+", int(2)))
        );
        match &messages[2] {
            Message::Keyword(message) => assert_eq!(message.name, "show:"),
            other => panic!("Expected keyword message, got {other:?}"),
        }
    }

    #[test]
    fn parse_cascade_requires_message() {
        let err = parse_err("a foo; 3.");
        assert_eq!(err.message, "Expected message, got NUMBER.");
        assert_eq!(err.found, Some(TokenKind::Number));
    }

    #[test]
    fn parse_temp_declaration() {
        let program = parse_ok("var a. var b := a.");
        assert_eq!(
            program.statements,
            vec![
                Statement::TempDecl {
                    name: Identifier::new("a"),
                    initializer: Expression::Value(Value::Nil),
                },
                Statement::TempDecl {
                    name: Identifier::new("b"),
                    initializer: Expression::identifier("a"),
                },
            ]
        );
    }

    #[test]
    fn parse_answer() {
        let program = parse_ok("^ x.");
        assert_eq!(
            program.statements,
            vec![Statement::Answer(Expression::identifier("x"))]
        );
    }

    #[test]
    fn parse_pragma_statement_needs_no_period() {
        let program = parse_ok("@ optimize: 2 ^ x.");
        assert_eq!(program.len(), 2);
        let Statement::Pragma(Pragma {
            message: Message::Keyword(message),
        }) = &program.statements[0]
        else {
            panic!("Expected keyword pragma");
        };
        assert_eq!(message.name, "optimize:");
        assert_eq!(
            program.statements[1],
            Statement::Answer(Expression::identifier("x"))
        );
    }

    #[test]
    fn parse_missing_period() {
        let err = parse_err("x := 1");
        assert_eq!(err.message, "Statements must be ended with a period.");
        assert_eq!(err.expected, Some(TokenKind::Period));
        assert_eq!(err.found, Some(TokenKind::Eof));

        let err = parse_err("x := 1\n^ x.");
        assert_eq!(err.message, "Statements must be ended with a period.");
        assert_eq!(err.line, 2);
    }

    #[test]
    fn parse_statement_start_errors() {
        for source in [")", "]", ":= 1.", "| a |", "+ 1.", "x00.", "end"] {
            let err = parse_err(source);
            assert_eq!(err.message, "Expected statement.", "source {source:?}");
        }
    }

    #[test]
    fn parse_block_statement() {
        let expression = single_expression("[ :a b | ^ a + b. ].");
        let Expression::Value(Value::Block(Block { parameters, body })) = expression else {
            panic!("Expected block");
        };
        assert_eq!(
            parameters,
            Some(vec![Identifier::new("a"), Identifier::new("b")])
        );
        assert_eq!(body.len(), 1);
        assert!(body[0].is_answer());
    }

    #[test]
    fn parse_nesting_limit() {
        let source = format!("{}x{}.", "(".repeat(40), ")".repeat(40));
        let tokens = tokenize(&source).unwrap();
        let config = ParserConfig::default().with_max_nesting_depth(16);
        let err = parse_with_config(tokens.clone(), &config).unwrap_err();
        assert_eq!(
            err.message,
            "Expression nesting is too deep (maximum 16 levels)."
        );

        assert!(parse(tokens).is_ok());
    }

    #[test]
    fn parse_deep_nesting_does_not_overflow() {
        let source = format!("{}x{}.", "[".repeat(5000), ". ]".repeat(5000));
        let tokens = tokenize(&source).unwrap();
        let err = parse(tokens).unwrap_err();
        assert!(err.message.starts_with("Expression nesting is too deep"));
    }

    #[test]
    fn parse_keyword_message_type() {
        let expression = single_expression("a b: c.");
        let mut arguments = indexmap::IndexMap::new();
        arguments.insert("b".into(), Expression::identifier("c"));
        assert_eq!(
            expression,
            Expression::Keyword {
                receiver: Box::new(Expression::identifier("a")),
                message: KeywordMessage::new("b:", arguments),
            }
        );
    }
}
