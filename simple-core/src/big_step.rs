use tracing::{Level, trace};

use crate::{
    common::{EvalError, Evaluation},
    environment::Environment,
    language::Term,
};

impl Term {
    /// Evaluate the term directly to its final result: a value for an
    /// expression, an environment for a statement.
    #[tracing::instrument(level = Level::DEBUG, skip_all, fields(term = %self), err)]
    pub fn evaluate(&self, env: &Environment) -> Result<Evaluation, EvalError> {
        if self.is_expression() {
            self.evaluate_expression(env).map(Evaluation::Value)
        } else {
            self.execute(env).map(Evaluation::Environment)
        }
    }

    fn evaluate_expression(&self, env: &Environment) -> Result<Term, EvalError> {
        match self {
            Self::Number(_) | Self::Boolean(_) => Ok(self.clone()),
            Self::Variable(name) => env.lookup(name),
            _ => {
                let Some((op, left, right)) = self.as_binary() else {
                    return Err(EvalError::MalformedTerm(self.clone()));
                };
                let left = left.evaluate_expression(env)?;
                let right = right.evaluate_expression(env)?;
                op.apply(&left, &right)
                    .ok_or_else(|| EvalError::MalformedTerm(self.clone()))
            }
        }
    }

    fn evaluate_condition(&self, env: &Environment) -> Result<bool, EvalError> {
        match self.evaluate_expression(env)? {
            Self::Boolean(value) => Ok(value),
            other => Err(EvalError::MalformedTerm(other)),
        }
    }

    /// Run a statement. An expression in statement position is evaluated for
    /// its failures only and leaves the environment as it was.
    fn execute(&self, env: &Environment) -> Result<Environment, EvalError> {
        match self {
            Self::Noop => Ok(env.clone()),
            Self::Assign(name, expression) => {
                let value = expression.evaluate_expression(env)?;
                Ok(env.assign(name.clone(), value))
            }
            Self::If {
                condition,
                consequence,
                alternative,
            } => {
                if condition.evaluate_condition(env)? {
                    consequence.execute(env)
                } else {
                    alternative.execute(env)
                }
            }
            Self::Sequence(statements) => statements
                .iter()
                .try_fold(env.clone(), |env, statement| statement.execute(&env)),
            Self::While { condition, body } => {
                let mut env = env.clone();
                let mut iterations = 0usize;
                while condition.evaluate_condition(&env)? {
                    env = body.execute(&env)?;
                    iterations += 1;
                }
                trace!(iterations, "loop exited");
                Ok(env)
            }
            _ => {
                self.evaluate_expression(env)?;
                Ok(env.clone())
            }
        }
    }
}
