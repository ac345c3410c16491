// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Post-parse passes over the Smallos AST.
//!
//! [`trim_unreachable`] drops every statement that follows an `^` answer in
//! the same statement list. It applies to the program itself, to method
//! bodies and to block bodies at any depth. Nothing else changes: names are
//! not resolved and no other statement is touched.
//!
//! ```
//! use smallos_core::analyse::trim_unreachable;
//! use smallos_core::source_analysis::parse_source;
//!
//! let program = parse_source("^ 1. x foo.").unwrap();
//! assert_eq!(trim_unreachable(program).statements.len(), 1);
//! ```

use tracing::trace;

use crate::ast::{
    BinaryMessage, Block, ClassDef, Expression, Field, KeywordMessage, Member, Message, Method,
    Pragma, Program, Statement, TraitDef, Value,
};

/// Removes statements that can never run because an earlier statement in the
/// same list answers.
#[must_use]
pub fn trim_unreachable(program: Program) -> Program {
    Program::new(trim_statements(program.statements))
}

/// Keeps statements up to and including the first `Answer`.
fn trim_statements(statements: Vec<Statement>) -> Vec<Statement> {
    let total = statements.len();
    let mut kept = Vec::with_capacity(total);
    for statement in statements {
        let is_answer = statement.is_answer();
        kept.push(trim_statement(statement));
        if is_answer {
            break;
        }
    }
    if kept.len() < total {
        trace!(
            kept = kept.len(),
            dropped = total - kept.len(),
            "trimmed unreachable statements"
        );
    }
    kept
}

fn trim_statement(statement: Statement) -> Statement {
    match statement {
        Statement::Expression(expression) => Statement::Expression(trim_expression(expression)),
        Statement::Answer(expression) => Statement::Answer(trim_expression(expression)),
        Statement::TraitDef(def) => Statement::TraitDef(TraitDef {
            members: trim_members(def.members),
            ..def
        }),
        Statement::ClassDef(def) => Statement::ClassDef(ClassDef {
            members: trim_members(def.members),
            ..def
        }),
        Statement::Assignment { target, value } => Statement::Assignment {
            target,
            value: trim_expression(value),
        },
        Statement::TempDecl { name, initializer } => Statement::TempDecl {
            name,
            initializer: trim_expression(initializer),
        },
        Statement::Pragma(pragma) => Statement::Pragma(trim_pragma(pragma)),
    }
}

fn trim_members(members: Vec<Member>) -> Vec<Member> {
    members
        .into_iter()
        .map(|member| match member {
            Member::Method(method) => Member::Method(Method {
                body: trim_statements(method.body),
                ..method
            }),
            Member::Field(field) => Member::Field(Field {
                initializer: trim_expression(field.initializer),
                ..field
            }),
            Member::Pragma(pragma) => Member::Pragma(trim_pragma(pragma)),
            Member::Requirement(signature) => Member::Requirement(signature),
        })
        .collect()
}

fn trim_pragma(pragma: Pragma) -> Pragma {
    Pragma {
        message: trim_message(pragma.message),
    }
}

fn trim_expression(expression: Expression) -> Expression {
    match expression {
        Expression::Value(value) => Expression::Value(trim_value(value)),
        Expression::Unary { receiver, messages } => Expression::Unary {
            receiver: trim_value(receiver),
            messages,
        },
        Expression::Binary { receiver, messages } => Expression::Binary {
            receiver: Box::new(trim_expression(*receiver)),
            messages: messages.into_iter().map(trim_binary_message).collect(),
        },
        Expression::Keyword { receiver, message } => Expression::Keyword {
            receiver: Box::new(trim_expression(*receiver)),
            message: trim_keyword_message(message),
        },
        Expression::Cascade { primary, messages } => Expression::Cascade {
            primary: Box::new(trim_expression(*primary)),
            messages: messages.into_iter().map(trim_message).collect(),
        },
    }
}

fn trim_value(value: Value) -> Value {
    match value {
        Value::Block(block) => Value::Block(Block {
            parameters: block.parameters,
            body: trim_statements(block.body),
        }),
        Value::Chain(expressions) => {
            Value::Chain(expressions.into_iter().map(trim_expression).collect())
        }
        Value::Array(expressions) => {
            Value::Array(expressions.into_iter().map(trim_expression).collect())
        }
        Value::NestedExpr(expression) => Value::NestedExpr(Box::new(trim_expression(*expression))),
        // Leaf values
        Value::Bool(_)
        | Value::Nil
        | Value::Symbol(_)
        | Value::Num(_)
        | Value::Str(_)
        | Value::ByteBlock(_)
        | Value::Identifier(_) => value,
    }
}

fn trim_message(message: Message) -> Message {
    match message {
        Message::Unary(message) => Message::Unary(message),
        Message::Binary(message) => Message::Binary(trim_binary_message(message)),
        Message::Keyword(message) => Message::Keyword(trim_keyword_message(message)),
    }
}

fn trim_binary_message(message: BinaryMessage) -> BinaryMessage {
    BinaryMessage {
        argument: trim_expression(message.argument),
        ..message
    }
}

fn trim_keyword_message(message: KeywordMessage) -> KeywordMessage {
    KeywordMessage {
        arguments: message
            .arguments
            .into_iter()
            .map(|(part, argument)| (part, trim_expression(argument)))
            .collect(),
        ..message
    }
}
