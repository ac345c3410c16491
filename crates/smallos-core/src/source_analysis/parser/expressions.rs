// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing for Smallos.
//!
//! Grammar layers, tightest first:
//!
//! ```text
//! value    := ID | literal | block | array | byteBlock | chain | "(" expr ")"
//! unary    := value ID*                      (ID not followed by ":")
//! binary   := unary (BINOP unary)*
//! keyword  := binary (ID ":" binary)*
//! cascade  := keyword (";" message)*
//! ```
//!
//! A layer with no messages of its own passes the tighter layer's result
//! through unchanged.

use ecow::EcoString;
use indexmap::IndexMap;

use crate::ast::{
    BinaryMessage, Block, Expression, KeywordMessage, Message, Number, UnaryMessage, Value,
};
use crate::source_analysis::{ParseError, TokenKind};

use super::{ParseResult, Parser};

/// Decodes a `NUMBER` lexeme. Lexemes with a fractional part are floats;
/// everything else must fit an `i64`.
pub(super) fn parse_number(lexeme: &str) -> Option<Number> {
    if lexeme.contains('.') {
        lexeme.parse::<f64>().ok().map(Number::Float)
    } else {
        lexeme.parse::<i64>().ok().map(Number::Integer)
    }
}

/// Strips the delimiters from a `STRING` lexeme and collapses `""` to `"`.
pub(super) fn unescape_string(lexeme: &str) -> EcoString {
    let inner = lexeme
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(lexeme);
    inner.replace("\"\"", "\"").into()
}

/// Decodes a `BYTE` lexeme such as `x7f`.
fn parse_byte(lexeme: &str) -> Option<u8> {
    let digits = lexeme.strip_prefix('x')?;
    u8::from_str_radix(digits, 16).ok()
}

impl Parser {
    // ========================================================================
    // Expression Layers
    // ========================================================================

    /// Parses a full expression, including any cascade.
    pub(super) fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.nested(Self::parse_cascade)
    }

    fn parse_cascade(&mut self) -> ParseResult<Expression> {
        let primary = self.parse_keyword_expression()?;
        if !self.check(TokenKind::Semicolon) {
            return Ok(primary);
        }

        let mut messages = Vec::new();
        while self.accept(TokenKind::Semicolon).is_some() {
            messages.push(self.parse_message()?);
        }
        Ok(Expression::Cascade {
            primary: Box::new(primary),
            messages,
        })
    }

    fn parse_keyword_expression(&mut self) -> ParseResult<Expression> {
        let receiver = self.parse_binary_expression()?;
        if !self.at_keyword_part() {
            return Ok(receiver);
        }
        let message = self.parse_keyword_message()?;
        Ok(Expression::Keyword {
            receiver: Box::new(receiver),
            message,
        })
    }

    fn parse_binary_expression(&mut self) -> ParseResult<Expression> {
        let receiver = self.parse_unary_expression()?;
        let mut messages = Vec::new();
        while self.check(TokenKind::BinaryOperator) {
            messages.push(self.parse_binary_message()?);
        }
        if messages.is_empty() {
            Ok(receiver)
        } else {
            Ok(Expression::Binary {
                receiver: Box::new(receiver),
                messages,
            })
        }
    }

    fn parse_unary_expression(&mut self) -> ParseResult<Expression> {
        let receiver = self.parse_value()?;
        let mut messages = Vec::new();
        while self.check(TokenKind::Identifier) && !self.lookahead(TokenKind::Colon) {
            messages.push(UnaryMessage::new(self.advance().into_lexeme()));
        }
        if messages.is_empty() {
            Ok(Expression::Value(receiver))
        } else {
            Ok(Expression::Unary { receiver, messages })
        }
    }

    // ========================================================================
    // Messages
    // ========================================================================

    /// Parses a single message of any kind, as used by cascades and pragmas.
    pub(super) fn parse_message(&mut self) -> ParseResult<Message> {
        match self.current_kind() {
            TokenKind::Identifier if self.lookahead(TokenKind::Colon) => {
                Ok(Message::Keyword(self.parse_keyword_message()?))
            }
            TokenKind::Identifier => Ok(Message::Unary(UnaryMessage::new(
                self.advance().into_lexeme(),
            ))),
            TokenKind::BinaryOperator => Ok(Message::Binary(self.parse_binary_message()?)),
            kind => Err(self.error(format!("Expected message, got {kind}."))),
        }
    }

    fn parse_binary_message(&mut self) -> ParseResult<BinaryMessage> {
        let operator = self.expect(TokenKind::BinaryOperator)?.into_lexeme();
        let argument = self.parse_unary_expression()?;
        Ok(BinaryMessage::new(operator, argument))
    }

    fn parse_keyword_message(&mut self) -> ParseResult<KeywordMessage> {
        let (name, arguments) = self.parse_keyword_parts(Self::parse_binary_expression)?;
        Ok(KeywordMessage::new(name, arguments))
    }

    /// True when the cursor is at `ID :`.
    pub(super) fn at_keyword_part(&self) -> bool {
        self.check(TokenKind::Identifier) && self.lookahead(TokenKind::Colon)
    }

    /// Parses one or more `key : argument` pairs.
    ///
    /// Returns the composite name (`at:put:`) and the arguments keyed by
    /// part. Shared by keyword messages and keyword signatures.
    pub(super) fn parse_keyword_parts<T>(
        &mut self,
        mut parse_argument: impl FnMut(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<(EcoString, IndexMap<EcoString, T>)> {
        let mut name = EcoString::new();
        let mut arguments = IndexMap::new();
        while self.at_keyword_part() {
            let key_token = self.advance();
            let colon = self.expect(TokenKind::Colon)?;
            let key = key_token.lexeme().clone();
            if arguments.contains_key(&key) {
                return Err(ParseError::spanning(
                    &key_token,
                    &colon,
                    format!("Duplicate keyword part '{key}:'."),
                ));
            }
            let argument = parse_argument(self)?;
            name.push_str(&key);
            name.push(':');
            arguments.insert(key, argument);
        }
        Ok((name, arguments))
    }

    // ========================================================================
    // Values
    // ========================================================================

    fn parse_value(&mut self) -> ParseResult<Value> {
        match self.current_kind() {
            TokenKind::Identifier => Ok(Value::Identifier(self.parse_identifier()?)),
            TokenKind::LeftBrace => self.parse_array(),
            TokenKind::LeftBracket => Ok(Value::Block(self.parse_block()?)),
            TokenKind::Hash if self.lookahead(TokenKind::LeftBracket) => self.parse_byte_block(),
            TokenKind::Hash if self.lookahead(TokenKind::LeftParen) => self.parse_chain(),
            TokenKind::Hash => Err(self.error("Expected byte block or chain after '#'.")),
            TokenKind::LeftParen => self.parse_nested_expression(),
            kind if kind.is_literal() => self.parse_literal(),
            _ => Err(self.error("Value expected.")),
        }
    }

    fn parse_literal(&mut self) -> ParseResult<Value> {
        let token = self.advance();
        let value = match token.kind() {
            TokenKind::Number => match parse_number(token.lexeme()) {
                Some(number) => Value::Num(number),
                None => return Err(ParseError::at(&token, "Invalid number literal.")),
            },
            TokenKind::String => Value::Str(unescape_string(token.lexeme())),
            TokenKind::Symbol => {
                let name = token.lexeme().strip_prefix('#').unwrap_or(token.lexeme());
                Value::Symbol(name.into())
            }
            TokenKind::True => Value::Bool(true),
            TokenKind::False => Value::Bool(false),
            TokenKind::Nil => Value::Nil,
            _ => return Err(ParseError::at(&token, "Value expected.")),
        };
        Ok(value)
    }

    /// `[ : p1 p2 | stmt* ]` or `[ stmt* ]`
    fn parse_block(&mut self) -> ParseResult<Block> {
        self.expect(TokenKind::LeftBracket)?;

        let parameters = if self.accept(TokenKind::Colon).is_some() {
            let mut parameters = Vec::new();
            while self.check(TokenKind::Identifier) {
                parameters.push(self.parse_identifier()?);
            }
            self.expect(TokenKind::Pipe)?;
            Some(parameters)
        } else {
            None
        };

        let mut body = Vec::new();
        while !self.check(TokenKind::RightBracket) {
            body.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RightBracket)?;
        Ok(Block { parameters, body })
    }

    /// `{ expr , expr , }`. Every element is followed by a comma.
    fn parse_array(&mut self) -> ParseResult<Value> {
        self.expect(TokenKind::LeftBrace)?;
        let mut elements = Vec::new();
        while !self.check(TokenKind::RightBrace) {
            elements.push(self.parse_expression()?);
            self.expect(TokenKind::Comma)?;
        }
        self.expect(TokenKind::RightBrace)?;
        Ok(Value::Array(elements))
    }

    /// `#[ x00 x01 ... ]`
    fn parse_byte_block(&mut self) -> ParseResult<Value> {
        self.expect(TokenKind::Hash)?;
        self.expect(TokenKind::LeftBracket)?;
        let mut bytes = Vec::new();
        while let Some(token) = self.accept(TokenKind::Byte) {
            match parse_byte(token.lexeme()) {
                Some(byte) => bytes.push(byte),
                None => return Err(ParseError::at(&token, "Invalid byte literal.")),
            }
        }
        self.expect(TokenKind::RightBracket)?;
        Ok(Value::ByteBlock(bytes))
    }

    /// `#( expr , expr ... )` with at least one expression.
    fn parse_chain(&mut self) -> ParseResult<Value> {
        self.expect(TokenKind::Hash)?;
        self.expect(TokenKind::LeftParen)?;
        let mut expressions = vec![self.parse_expression()?];
        while self.accept(TokenKind::Comma).is_some() {
            expressions.push(self.parse_expression()?);
        }
        self.expect(TokenKind::RightParen)?;
        Ok(Value::Chain(expressions))
    }

    /// `( expr )`
    fn parse_nested_expression(&mut self) -> ParseResult<Value> {
        self.expect(TokenKind::LeftParen)?;
        let expression = self.parse_expression()?;
        self.expect(TokenKind::RightParen)?;
        Ok(Value::NestedExpr(Box::new(expression)))
    }
}
