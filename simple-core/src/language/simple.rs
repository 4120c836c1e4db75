use std::sync::Arc;

use from_pest::{ConversionError, FromPest, Void};
use itertools::Itertools;
use pest::iterators::{Pair, Pairs};
use pest_derive::Parser;

use super::{BinaryOp, Name, Term};

#[derive(Parser)]
#[grammar = "language/simple.pest"]
pub struct SimpleParser;

// Conversions from pest parse trees

impl<'pest> FromPest<'pest> for Term {
    type Rule = Rule;
    type FatalError = Void;

    fn from_pest(
        pest: &mut Pairs<'pest, Self::Rule>,
    ) -> Result<Self, ConversionError<Self::FatalError>> {
        let mut clone = pest.clone();
        let pair = clone.next().ok_or(ConversionError::NoMatch)?;
        let term = term_from_pair(pair)?;
        *pest = clone;
        Ok(term)
    }
}

fn term_from_pair(pair: Pair<'_, Rule>) -> Result<Term, ConversionError<Void>> {
    match pair.as_rule() {
        Rule::statements => {
            let mut statements = pair
                .into_inner()
                .map(term_from_pair)
                .collect::<Result<Vec<_>, _>>()?;
            // A lone statement is not wrapped in a sequence.
            if statements.len() == 1 {
                Ok(statements.remove(0))
            } else {
                Ok(Term::Sequence(statements))
            }
        }
        Rule::block => match pair.into_inner().next() {
            None => Ok(Term::Noop),
            Some(statements) => term_from_pair(statements),
        },
        Rule::if_statement => {
            let mut inner = pair.into_inner();
            let condition = next_term(&mut inner)?;
            let consequence = next_term(&mut inner)?;
            let alternative = match inner.next() {
                Some(block) => term_from_pair(block)?,
                None => Term::Noop,
            };
            no_extraneous(&mut inner, stringify!(If))?;
            Ok(Term::if_else(condition, consequence, alternative))
        }
        Rule::while_statement => {
            let mut inner = pair.into_inner();
            let condition = next_term(&mut inner)?;
            let body = next_term(&mut inner)?;
            no_extraneous(&mut inner, stringify!(While))?;
            Ok(Term::while_loop(condition, body))
        }
        Rule::assign => {
            let mut inner = pair.into_inner();
            let name = Name::from_pest(&mut inner)?;
            let expression = next_term(&mut inner)?;
            no_extraneous(&mut inner, stringify!(Assign))?;
            Ok(Term::assign(name, expression))
        }
        Rule::noop => Ok(Term::Noop),
        Rule::comparison => {
            let mut inner = pair.into_inner();
            let left = next_term(&mut inner)?;
            let term = match inner.next() {
                Some(right) => Term::less_than(left, term_from_pair(right)?),
                None => left,
            };
            no_extraneous(&mut inner, stringify!(LessThan))?;
            Ok(term)
        }
        Rule::sum => fold_left(pair, BinaryOp::Add),
        Rule::product => fold_left(pair, BinaryOp::Multiply),
        Rule::number => pair
            .as_str()
            .parse::<f64>()
            .map(Term::number)
            .map_err(|_err| ConversionError::NoMatch),
        Rule::boolean => match pair.as_str() {
            "true" | "True" => Ok(Term::Boolean(true)),
            "false" | "False" => Ok(Term::Boolean(false)),
            _ => Err(ConversionError::NoMatch),
        },
        Rule::variable => Ok(Term::Variable(Name::from_pest(&mut pair.into_inner())?)),
        rule => {
            tracing::error!("unexpected rule {:?}", rule);
            Err(ConversionError::NoMatch)
        }
    }
}

fn next_term(inner: &mut Pairs<'_, Rule>) -> Result<Term, ConversionError<Void>> {
    inner
        .next()
        .ok_or(ConversionError::NoMatch)
        .and_then(term_from_pair)
}

fn no_extraneous(
    inner: &mut Pairs<'_, Rule>,
    current_node: &'static str,
) -> Result<(), ConversionError<Void>> {
    match inner.next() {
        Some(_) => Err(ConversionError::Extraneous { current_node }),
        None => Ok(()),
    }
}

/// `1 + 2 + 3` is `(1 + 2) + 3`.
fn fold_left(pair: Pair<'_, Rule>, op: BinaryOp) -> Result<Term, ConversionError<Void>> {
    let mut operands = pair.into_inner().map(term_from_pair);
    let first = operands.next().ok_or(ConversionError::NoMatch)??;
    operands.fold_ok(first, |left, right| op.build(Arc::new(left), Arc::new(right)))
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::Path;

    use dir_test::{Fixture, dir_test};

    use crate::{language::Term, parser::parse_program};

    pub fn parse_simple(raw_path: &str) -> (&str, Term) {
        let path = Path::new(raw_path);
        let program = std::fs::read_to_string(path).unwrap();
        let term = parse_program(&program).unwrap_or_else(|err| {
            panic!(
                "could not parse program {:?}\n{err}",
                path.file_stem().unwrap()
            )
        });
        let name = path.file_stem().unwrap().to_str().unwrap();
        (name, term)
    }

    #[allow(clippy::needless_pass_by_value)]
    #[dir_test(dir: "$CARGO_MANIFEST_DIR/../programs", glob: "**/*.simple", loader: crate::language::simple::tests::parse_simple, postfix: "check_parse")]
    fn check_parse(fixture: Fixture<(&str, Term)>) {
        let (_name, term) = fixture.content();
        assert!(!term.is_expression());
    }
}
