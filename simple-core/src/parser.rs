use from_pest::{ConversionError, FromPest, Void};
use pest::{Parser as _, error};
use thiserror::Error;

use crate::{
    language::{
        Term,
        simple::{self, SimpleParser},
    },
    regex::{
        Pattern,
        syntax::{self, RegexParser},
    },
};

/// The front ends never hand back partial trees: either the whole input
/// converts, or one of these is returned.
#[derive(Clone, Debug, Error)]
pub enum ParseError {
    #[error("SIMPLE parsing error:\n{0}")]
    Simple(#[from] Box<error::Error<simple::Rule>>),

    #[error("Regex parsing error:\n{0}")]
    Regex(#[from] Box<error::Error<syntax::Rule>>),

    #[error("Conversion error:\n{0}")]
    Conversion(#[from] ConversionError<Void>),
}

/// Parse a SIMPLE program into a term.
pub fn parse_program(source: &str) -> Result<Term, ParseError> {
    let mut pairs = SimpleParser::parse(simple::Rule::program, source).map_err(Box::new)?;
    let program = pairs.next().ok_or(ConversionError::NoMatch)?;
    let term = Term::from_pest(&mut program.into_inner())?;
    Ok(term)
}

/// Parse a regular expression into a pattern.
pub fn parse_regex(source: &str) -> Result<Pattern, ParseError> {
    let mut pairs = RegexParser::parse(syntax::Rule::pattern, source).map_err(Box::new)?;
    let pattern = pairs.next().ok_or(ConversionError::NoMatch)?;
    let pattern = Pattern::from_pest(&mut pattern.into_inner())?;
    Ok(pattern)
}
