use std::fmt::{self, Display};

use pretty::RcDoc;

use super::{PrettyPrint, bracket, separated};
use crate::{
    environment::Environment,
    language::{BinaryOp, Name, Term},
};

impl BinaryOp {
    fn precedence(self) -> u8 {
        match self {
            Self::LessThan => 0,
            Self::Add => 1,
            Self::Multiply => 2,
        }
    }
}

impl Term {
    /// Binding strength when printing. Statements never occur under an
    /// operator in a well-formed program and print as atoms.
    pub fn precedence(&self) -> u8 {
        self.as_binary().map_or(3, |(op, _, _)| op.precedence())
    }

    fn to_doc_within(&self, threshold: u8) -> RcDoc<'_, ()> {
        bracket(self.to_doc(), self.precedence(), threshold)
    }

    /// The contents of a `{ ... }` block.
    fn block_doc(&self) -> RcDoc<'_, ()> {
        let inner = match self {
            Self::Noop => RcDoc::nil(),
            Self::Sequence(statements) if statements.is_empty() => RcDoc::nil(),
            _ => RcDoc::space().append(self.to_doc()),
        };
        RcDoc::text("{").append(inner).append(RcDoc::text(" }"))
    }
}

impl PrettyPrint for Name {
    fn to_doc(&self) -> RcDoc<'_, ()> {
        RcDoc::text(&self.0)
    }
}

impl PrettyPrint for Term {
    fn to_doc(&self) -> RcDoc<'_, ()> {
        match self {
            Self::Number(value) => RcDoc::text(value.to_string()),
            Self::Boolean(value) => RcDoc::text(value.to_string()),
            Self::Variable(name) => name.to_doc(),
            Self::Add(left, right) => binary_doc(BinaryOp::Add, left, right),
            Self::Multiply(left, right) => binary_doc(BinaryOp::Multiply, left, right),
            Self::LessThan(left, right) => binary_doc(BinaryOp::LessThan, left, right),
            Self::Noop => RcDoc::text("noop"),
            Self::Assign(name, expression) => name
                .to_doc()
                .append(RcDoc::text(" = "))
                .append(expression.to_doc()),
            Self::If {
                condition,
                consequence,
                alternative,
            } => RcDoc::text("if (")
                .append(condition.to_doc())
                .append(RcDoc::text(") "))
                .append(consequence.block_doc())
                .append(RcDoc::text(" else "))
                .append(alternative.block_doc()),
            Self::While { condition, body } => RcDoc::text("while (")
                .append(condition.to_doc())
                .append(RcDoc::text(") "))
                .append(body.block_doc()),
            Self::Sequence(statements) if statements.is_empty() => RcDoc::text("noop"),
            Self::Sequence(statements) => separated(statements, ";"),
        }
    }
}

fn binary_doc<'a>(op: BinaryOp, left: &'a Term, right: &'a Term) -> RcDoc<'a, ()> {
    // `<` does not chain, so both of its sides need to bind tighter.
    let left_threshold = match op {
        BinaryOp::LessThan => op.precedence() + 1,
        _ => op.precedence(),
    };
    left.to_doc_within(left_threshold)
        .append(RcDoc::space())
        .append(RcDoc::text(op.to_string()))
        .append(RcDoc::space())
        .append(right.to_doc_within(op.precedence() + 1))
}

impl Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pretty())
    }
}

impl PrettyPrint for Environment {
    fn to_doc(&self) -> RcDoc<'_, ()> {
        let bindings = self.iter().map(|(name, value)| {
            name.to_doc()
                .append(RcDoc::text(":"))
                .append(RcDoc::space())
                .append(value.to_doc())
        });
        RcDoc::text("{")
            .append(RcDoc::intersperse(bindings, RcDoc::text(", ")))
            .append(RcDoc::text("}"))
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pretty())
    }
}
