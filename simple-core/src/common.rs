use derive_more::From;
use thiserror::Error;

use crate::{
    environment::Environment,
    language::{Name, Term},
};

/// Failures shared by the small-step machine and the big-step evaluator.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("Undefined variable `{0}`")]
    UndefinedVariable(Name),

    #[error("Malformed term `{0}`")]
    MalformedTerm(Term),
}

/// What the big-step evaluator produces: expressions evaluate to a value,
/// statements to an environment.
#[derive(Clone, Debug, PartialEq, Eq, From)]
pub enum Evaluation {
    Value(Term),
    Environment(Environment),
}

impl Evaluation {
    pub fn into_value(self) -> Option<Term> {
        match self {
            Self::Value(value) => Some(value),
            Self::Environment(_) => None,
        }
    }

    pub fn into_environment(self) -> Option<Environment> {
        match self {
            Self::Value(_) => None,
            Self::Environment(env) => Some(env),
        }
    }
}
