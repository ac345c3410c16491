// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Declaration parsing for Smallos.
//!
//! This module handles class and trait definitions and their members:
//! - Fields: `static? var name [:= expr] .` (classes only)
//! - Methods: `static? def signature as statement* end`
//! - Requirements: `require signature .` (traits only)
//! - Pragmas: `@ message`

use crate::ast::{ClassDef, Field, Identifier, Member, Method, Pragma, Signature, TraitDef};
use crate::source_analysis::{ParseError, TokenKind};

use super::{ParseResult, Parser};

impl Parser {
    // ========================================================================
    // Class & Trait Definitions
    // ========================================================================

    /// Parses a class definition.
    ///
    /// Syntax:
    /// ```text
    /// class Name [extending Parent] [implementing T1, T2, ...] is
    ///   member*
    /// end
    /// ```
    pub(super) fn parse_class_definition(&mut self) -> ParseResult<ClassDef> {
        self.expect(TokenKind::Class)?;
        let name = self.parse_identifier()?.name;
        let parent = self.parse_optional_parent()?;

        let mut traits = Vec::new();
        if self.accept(TokenKind::Implementing).is_some() {
            traits.push(self.parse_identifier()?);
            while self.accept(TokenKind::Comma).is_some() {
                traits.push(self.parse_identifier()?);
            }
        }

        self.expect(TokenKind::Is)?;
        let mut members = Vec::new();
        while !self.check(TokenKind::End) {
            let start = self.current_token().clone();
            let member = self.parse_member()?;
            if matches!(member, Member::Requirement(_)) {
                return Err(ParseError::at(&start, "Classes cannot contain requirements."));
            }
            members.push(member);
        }
        self.expect(TokenKind::End)?;

        Ok(ClassDef {
            name,
            parent,
            traits,
            members,
        })
    }

    /// Parses a trait definition.
    ///
    /// Syntax:
    /// ```text
    /// trait Name [extending Parent] is
    ///   member*
    /// end
    /// ```
    pub(super) fn parse_trait_definition(&mut self) -> ParseResult<TraitDef> {
        self.expect(TokenKind::Trait)?;
        let name = self.parse_identifier()?.name;
        let parent = self.parse_optional_parent()?;

        self.expect(TokenKind::Is)?;
        let mut members = Vec::new();
        while !self.check(TokenKind::End) {
            let start = self.current_token().clone();
            let member = self.parse_member()?;
            if matches!(member, Member::Field(_)) {
                return Err(ParseError::at(&start, "Traits cannot contain fields."));
            }
            members.push(member);
        }
        self.expect(TokenKind::End)?;

        Ok(TraitDef {
            name,
            parent,
            members,
        })
    }

    fn parse_optional_parent(&mut self) -> ParseResult<Option<Identifier>> {
        if self.accept(TokenKind::Extending).is_some() {
            Ok(Some(self.parse_identifier()?))
        } else {
            Ok(None)
        }
    }

    // ========================================================================
    // Members
    // ========================================================================

    fn parse_member(&mut self) -> ParseResult<Member> {
        match self.current_kind() {
            TokenKind::Static => match self.peek_kind() {
                Some(TokenKind::Def) => Ok(Member::Method(self.parse_method()?)),
                Some(TokenKind::Var) => Ok(Member::Field(self.parse_field()?)),
                Some(TokenKind::Require) => Err(self.error("Requirements cannot be static.")),
                _ => Err(self.error("Expected method or field after 'static' token.")),
            },
            TokenKind::Def => Ok(Member::Method(self.parse_method()?)),
            TokenKind::Var => Ok(Member::Field(self.parse_field()?)),
            TokenKind::Require => Ok(Member::Requirement(self.parse_requirement()?)),
            TokenKind::At => Ok(Member::Pragma(self.parse_pragma()?)),
            _ => Err(self.error(
                "Expected one of: method, field, requirement, pragma in class/trait body.",
            )),
        }
    }

    /// `static? def signature as statement* end`
    fn parse_method(&mut self) -> ParseResult<Method> {
        let is_static = self.accept(TokenKind::Static).is_some();
        self.expect(TokenKind::Def)?;
        let signature = self.parse_signature()?;
        self.expect(TokenKind::As)?;

        let mut body = Vec::new();
        while self.accept(TokenKind::End).is_none() {
            body.push(self.parse_statement()?);
        }

        Ok(Method {
            is_static,
            signature,
            body,
        })
    }

    /// `static? var name [:= expr] .`
    fn parse_field(&mut self) -> ParseResult<Field> {
        let is_static = self.accept(TokenKind::Static).is_some();
        self.expect(TokenKind::Var)?;
        let name = self.parse_identifier()?.name;
        let initializer = self.parse_optional_initializer()?;
        self.expect_period()?;
        Ok(Field {
            is_static,
            name,
            initializer,
        })
    }

    /// `require signature .`
    fn parse_requirement(&mut self) -> ParseResult<Signature> {
        self.expect(TokenKind::Require)?;
        let signature = self.parse_signature()?;
        self.expect(TokenKind::Period)?;
        Ok(signature)
    }

    /// `@ message`. There is no terminating period.
    pub(super) fn parse_pragma(&mut self) -> ParseResult<Pragma> {
        self.expect(TokenKind::At)?;
        let message = self.parse_message()?;
        Ok(Pragma { message })
    }

    /// Parses a method or requirement signature.
    ///
    /// ```text
    /// signature := ID                 unary
    ///            | BINOP ID           binary
    ///            | (ID ":" ID)+       keyword
    /// ```
    fn parse_signature(&mut self) -> ParseResult<Signature> {
        match self.current_kind() {
            TokenKind::BinaryOperator => {
                let operator = self.advance().into_lexeme();
                let parameter = self.parse_identifier()?;
                Ok(Signature::Binary {
                    operator,
                    parameter,
                })
            }
            TokenKind::Identifier if self.lookahead(TokenKind::Colon) => {
                let (name, parameters) = self.parse_keyword_parts(Self::parse_identifier)?;
                Ok(Signature::Keyword { name, parameters })
            }
            TokenKind::Identifier => Ok(Signature::Unary {
                name: self.advance().into_lexeme(),
            }),
            _ => Err(self.error("Expected signature.")),
        }
    }
}
