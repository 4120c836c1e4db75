use std::sync::Arc;

use tracing::{Level, debug, trace};

use crate::{common::EvalError, environment::Environment, language::Term};

impl Term {
    /// Rewrite the term by exactly one step.
    ///
    /// Expressions leave the environment untouched; only `Assign` changes it.
    /// Calling this on an irreducible term is a `MalformedTerm` error.
    pub fn reduce(&self, env: &Environment) -> Result<(Term, Environment), EvalError> {
        match self {
            Self::Variable(_) | Self::Add(..) | Self::Multiply(..) | Self::LessThan(..) => {
                Ok((self.reduce_expression(env)?, env.clone()))
            }
            Self::Number(_) | Self::Boolean(_) | Self::Noop => {
                Err(EvalError::MalformedTerm(self.clone()))
            }
            Self::Assign(name, expression) => {
                if expression.is_reducible() {
                    let expression = expression.reduce_expression(env)?;
                    Ok((Self::Assign(name.clone(), Arc::new(expression)), env.clone()))
                } else if expression.is_expression() {
                    let value = Term::clone(expression);
                    Ok((Self::Noop, env.assign(name.clone(), value)))
                } else {
                    Err(EvalError::MalformedTerm(self.clone()))
                }
            }
            Self::If {
                condition,
                consequence,
                alternative,
            } => {
                if condition.is_reducible() {
                    let condition = condition.reduce_expression(env)?;
                    let term = Self::If {
                        condition: Arc::new(condition),
                        consequence: Arc::clone(consequence),
                        alternative: Arc::clone(alternative),
                    };
                    return Ok((term, env.clone()));
                }
                match condition.as_ref() {
                    Self::Boolean(true) => Ok((Term::clone(consequence), env.clone())),
                    Self::Boolean(false) => Ok((Term::clone(alternative), env.clone())),
                    _ => Err(EvalError::MalformedTerm(self.clone())),
                }
            }
            Self::While { condition, body } => {
                let unrolled = Self::If {
                    condition: Arc::clone(condition),
                    consequence: Arc::new(Self::Sequence(vec![Term::clone(body), self.clone()])),
                    alternative: Arc::new(Self::Noop),
                };
                Ok((unrolled, env.clone()))
            }
            Self::Sequence(statements) => {
                let Some((head, tail)) = statements.split_first() else {
                    return Ok((Self::Noop, env.clone()));
                };
                if head.is_reducible() {
                    let (head, env) = head.reduce(env)?;
                    let statements = std::iter::once(head).chain(tail.iter().cloned());
                    Ok((Self::Sequence(statements.collect()), env))
                } else if !tail.is_empty() {
                    Ok((Self::Sequence(tail.to_vec()), env.clone()))
                } else {
                    // The last value surfaces as the result of the whole sequence.
                    Ok((head.clone(), env.clone()))
                }
            }
        }
    }

    /// One step of an expression. Operands are reduced strictly left to right,
    /// one subterm per step.
    fn reduce_expression(&self, env: &Environment) -> Result<Term, EvalError> {
        if let Self::Variable(name) = self {
            return env.lookup(name);
        }
        let Some((op, left, right)) = self.as_binary() else {
            return Err(EvalError::MalformedTerm(self.clone()));
        };
        if left.is_reducible() {
            let left = left.reduce_expression(env)?;
            Ok(op.build(Arc::new(left), Arc::clone(right)))
        } else if right.is_reducible() {
            let right = right.reduce_expression(env)?;
            Ok(op.build(Arc::clone(left), Arc::new(right)))
        } else {
            op.apply(left, right)
                .ok_or_else(|| EvalError::MalformedTerm(self.clone()))
        }
    }
}

/// Drives a term to normal form by repeated reduction.
///
/// There is no built-in step limit: a program whose loop never exits keeps the
/// machine running. Callers that need a bound should drive `step` themselves.
#[derive(Clone, Debug)]
pub struct Machine {
    term: Term,
    environment: Environment,
    steps: usize,
}

impl Machine {
    pub fn new(term: Term, environment: Environment) -> Self {
        Self {
            term,
            environment,
            steps: 0,
        }
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Number of reductions performed so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn is_done(&self) -> bool {
        !self.term.is_reducible()
    }

    /// Perform one reduction. On failure the machine keeps the state it had
    /// before the step.
    pub fn step(&mut self) -> Result<(), EvalError> {
        let (term, environment) = self.term.reduce(&self.environment)?;
        trace!(step = self.steps, %term, %environment, "reduced");
        self.term = term;
        self.environment = environment;
        self.steps += 1;
        Ok(())
    }

    #[tracing::instrument(level = Level::DEBUG, skip_all, err)]
    pub fn run(mut self) -> Result<(Term, Environment), EvalError> {
        while !self.is_done() {
            self.step()?;
        }
        debug!(steps = self.steps, term = %self.term, "reached normal form");
        Ok(self.into_parts())
    }

    /// Every state the machine passes through, starting with the initial one.
    pub fn trace(self) -> Trace {
        Trace {
            machine: self,
            started: false,
            finished: false,
        }
    }

    pub fn into_parts(self) -> (Term, Environment) {
        (self.term, self.environment)
    }
}

pub struct Trace {
    machine: Machine,
    started: bool,
    finished: bool,
}

impl Iterator for Trace {
    type Item = Result<(Term, Environment), EvalError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        if !self.started {
            self.started = true;
        } else if self.machine.is_done() {
            self.finished = true;
            return None;
        } else if let Err(err) = self.machine.step() {
            self.finished = true;
            return Some(Err(err));
        }
        Some(Ok((
            self.machine.term.clone(),
            self.machine.environment.clone(),
        )))
    }
}
