// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Abstract Syntax Tree (AST) definitions for Smallos.
//!
//! The AST is a closed set of tagged variants built once by the parser and
//! never mutated. Nodes do not carry source locations; structural equality
//! is the notion of sameness used throughout the test suite.
//!
//! # Message Sending
//!
//! Smallos follows Smalltalk's message precedence:
//!
//! 1. **Unary messages**: `object message` (highest precedence)
//! 2. **Binary messages**: `3 + 4` (left-to-right, no operator precedence)
//! 3. **Keyword messages**: `array at: 1 put: "x"` (lowest precedence)
//!
//! A **cascade** sends further messages to the receiver of the last message:
//! `Transcript show: "a"; cr; show: "b"`.
//!
//! # Example
//!
//! ```ignore
//! // Source: x := 1 + 2 squared.
//! Statement::Assignment {
//!     target: Identifier { name: "x" },
//!     value: Expression::Binary {
//!         receiver: Box::new(Expression::Value(Value::Num(Number::Integer(1)))),
//!         messages: vec![BinaryMessage {
//!             operator: "+",
//!             argument: Expression::Unary {
//!                 receiver: Value::Num(Number::Integer(2)),
//!                 messages: vec![UnaryMessage { name: "squared" }],
//!             },
//!         }],
//!     },
//! }
//! ```

use std::fmt;

use ecow::EcoString;
use indexmap::IndexMap;

/// A parsed source file: its top-level statements in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    #[must_use]
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    #[must_use]
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

// ============================================================================
// Statements
// ============================================================================

/// A statement in a program, method body or block body.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A bare expression evaluated for effect: `Transcript cr.`
    Expression(Expression),

    /// `^ expr.`
    Answer(Expression),

    TraitDef(TraitDef),

    ClassDef(ClassDef),

    /// `target := value.`
    Assignment {
        target: Identifier,
        value: Expression,
    },

    /// `var name := initializer.` The initializer is `nil` when omitted.
    TempDecl {
        name: Identifier,
        initializer: Expression,
    },

    /// `@ message`
    Pragma(Pragma),
}

impl Statement {
    #[must_use]
    pub const fn is_answer(&self) -> bool {
        matches!(self, Self::Answer(_))
    }
}

/// `trait Name [extending Parent] is member* end`
///
/// Never contains a [`Member::Field`].
#[derive(Debug, Clone, PartialEq)]
pub struct TraitDef {
    pub name: EcoString,
    pub parent: Option<Identifier>,
    pub members: Vec<Member>,
}

/// `class Name [extending Parent] [implementing T, ...] is member* end`
///
/// Never contains a [`Member::Requirement`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub name: EcoString,
    pub parent: Option<Identifier>,
    pub traits: Vec<Identifier>,
    pub members: Vec<Member>,
}

impl ClassDef {
    /// Iterates over the fields declared directly in this class.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.members.iter().filter_map(|member| match member {
            Member::Field(field) => Some(field),
            _ => None,
        })
    }

    /// Iterates over the methods declared directly in this class.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.members.iter().filter_map(|member| match member {
            Member::Method(method) => Some(method),
            _ => None,
        })
    }
}

// ============================================================================
// Members
// ============================================================================

/// A declaration inside a class or trait body.
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    /// `require signature.` (traits only)
    Requirement(Signature),
    Method(Method),
    /// Fields are only allowed in classes.
    Field(Field),
    Pragma(Pragma),
}

impl Member {
    /// Returns true for `static` methods and fields.
    #[must_use]
    pub const fn is_static(&self) -> bool {
        match self {
            Self::Method(method) => method.is_static,
            Self::Field(field) => field.is_static,
            Self::Requirement(_) | Self::Pragma(_) => false,
        }
    }
}

/// `[static] def signature as statement* end`
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub is_static: bool,
    pub signature: Signature,
    pub body: Vec<Statement>,
}

/// `[static] var name [:= initializer].`
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub is_static: bool,
    pub name: EcoString,
    pub initializer: Expression,
}

/// An `@`-prefixed directive. Valid both as a member and as a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Pragma {
    pub message: Message,
}

/// The selector and parameter names a method or requirement declares.
#[derive(Debug, Clone, PartialEq)]
pub enum Signature {
    /// `size`
    Unary { name: EcoString },

    /// `+ other`
    Binary {
        operator: EcoString,
        parameter: Identifier,
    },

    /// `at: index put: value`, keyed by keyword part without its colon.
    Keyword {
        name: EcoString,
        parameters: IndexMap<EcoString, Identifier>,
    },
}

impl Signature {
    /// The full selector: `size`, `+`, `at:put:`.
    #[must_use]
    pub fn selector(&self) -> &EcoString {
        match self {
            Self::Unary { name } | Self::Keyword { name, .. } => name,
            Self::Binary { operator, .. } => operator,
        }
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Self::Unary { .. } => 0,
            Self::Binary { .. } => 1,
            Self::Keyword { parameters, .. } => parameters.len(),
        }
    }

    /// Parameter names in declaration order.
    #[must_use]
    pub fn parameters(&self) -> Vec<&Identifier> {
        match self {
            Self::Unary { .. } => Vec::new(),
            Self::Binary { parameter, .. } => vec![parameter],
            Self::Keyword { parameters, .. } => parameters.values().collect(),
        }
    }
}

// ============================================================================
// Expressions
// ============================================================================

/// An expression. Each layer falls through to the next tighter one when it
/// has no messages of its own, so `3` parses to `Expression::Value`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Value(Value),

    /// `receiver msg1 msg2`
    Unary {
        receiver: Value,
        messages: Vec<UnaryMessage>,
    },

    /// `receiver + a - b`
    Binary {
        receiver: Box<Expression>,
        messages: Vec<BinaryMessage>,
    },

    /// `receiver at: a put: b`
    Keyword {
        receiver: Box<Expression>,
        message: KeywordMessage,
    },

    /// `primary; msg; msg`
    ///
    /// `primary` is the complete expression before the first `;`. The
    /// cascaded messages go to the receiver of its last message.
    Cascade {
        primary: Box<Expression>,
        messages: Vec<Message>,
    },
}

impl Expression {
    /// A bare identifier expression.
    #[must_use]
    pub fn identifier(name: impl Into<EcoString>) -> Self {
        Self::Value(Value::Identifier(Identifier::new(name)))
    }

    /// Returns the value if this expression has no messages.
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl From<Value> for Expression {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// A primary value: a literal, name, or bracketed construct.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Nil,
    /// `#name`, stored without the hash.
    Symbol(EcoString),
    Num(Number),
    /// String contents with delimiters removed and `""` collapsed to `"`.
    Str(EcoString),
    /// `#[ x00 xff ]`
    ByteBlock(Vec<u8>),
    Identifier(Identifier),
    /// `#( a, b, c )`
    Chain(Vec<Expression>),
    Block(Block),
    /// `{ a, b, }`
    Array(Vec<Expression>),
    /// `( expr )`
    NestedExpr(Box<Expression>),
}

/// A numeric literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// A literal with no fractional part: `42`, `-7`
    Integer(i64),
    /// A literal with a fractional part: `2.5`
    Float(f64),
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// A variable, parameter or class name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: EcoString,
}

impl Identifier {
    #[must_use]
    pub fn new(name: impl Into<EcoString>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A block (closure): `[ :x y | x + y. ]`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// `None` when the block has no `:` parameter section at all;
    /// `Some(vec![])` for `[ : | ... ]`.
    pub parameters: Option<Vec<Identifier>>,
    pub body: Vec<Statement>,
}

impl Block {
    #[must_use]
    pub fn arity(&self) -> usize {
        self.parameters.as_ref().map_or(0, Vec::len)
    }
}

// ============================================================================
// Messages
// ============================================================================

/// A message sent in a cascade clause or pragma.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Unary(UnaryMessage),
    Binary(BinaryMessage),
    Keyword(KeywordMessage),
}

impl Message {
    #[must_use]
    pub fn selector(&self) -> &EcoString {
        match self {
            Self::Unary(message) => &message.name,
            Self::Binary(message) => &message.operator,
            Self::Keyword(message) => &message.name,
        }
    }

    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Self::Unary(_) => 0,
            Self::Binary(_) => 1,
            Self::Keyword(message) => message.arguments.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaryMessage {
    pub name: EcoString,
}

impl UnaryMessage {
    #[must_use]
    pub fn new(name: impl Into<EcoString>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryMessage {
    pub operator: EcoString,
    pub argument: Expression,
}

impl BinaryMessage {
    #[must_use]
    pub fn new(operator: impl Into<EcoString>, argument: Expression) -> Self {
        Self {
            operator: operator.into(),
            argument,
        }
    }
}

/// A keyword message such as `at: 1 put: x`.
///
/// `name` is the concatenation of all parts with their colons (`at:put:`);
/// `arguments` is keyed by each part without its colon, in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordMessage {
    pub name: EcoString,
    pub arguments: IndexMap<EcoString, Expression>,
}

impl KeywordMessage {
    #[must_use]
    pub fn new(name: impl Into<EcoString>, arguments: IndexMap<EcoString, Expression>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    /// Returns the argument passed for keyword part `part` (without colon).
    #[must_use]
    pub fn argument(&self, part: &str) -> Option<&Expression> {
        self.arguments.get(part)
    }

    /// The keyword parts in source order, without colons.
    pub fn parts(&self) -> impl Iterator<Item = &EcoString> {
        self.arguments.keys()
    }
}
