use std::io::Write;

use simple_core::{
    common::{EvalError, Evaluation},
    environment::Environment,
    language::Term,
    regex::Pattern,
    small_step::Machine,
};
use thiserror::Error;
use tracing::{Level, debug};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("{source}\n  statement: {term}\n  environment: {environment}")]
    Stuck {
        source: EvalError,
        term: Term,
        environment: Environment,
    },

    #[error(
        "Did not reach normal form after {steps} steps\n  statement: {term}\n  environment: {environment}"
    )]
    StepLimit {
        steps: usize,
        term: Term,
        environment: Environment,
    },

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Drive the small-step machine, optionally echoing every state to `out`.
#[tracing::instrument(level = Level::DEBUG, skip_all, err)]
pub fn small_step(
    term: Term,
    trace: bool,
    max_steps: Option<usize>,
    out: &mut impl Write,
) -> Result<(Term, Environment), RunError> {
    let mut machine = Machine::new(term, Environment::new());
    if trace {
        writeln!(out, "{}, {}", machine.term(), machine.environment())?;
    }
    while !machine.is_done() {
        if max_steps.is_some_and(|max| machine.steps() >= max) {
            return Err(RunError::StepLimit {
                steps: machine.steps(),
                term: machine.term().clone(),
                environment: machine.environment().clone(),
            });
        }
        if let Err(source) = machine.step() {
            return Err(RunError::Stuck {
                source,
                term: machine.term().clone(),
                environment: machine.environment().clone(),
            });
        }
        if trace {
            writeln!(out, "{}, {}", machine.term(), machine.environment())?;
        }
    }
    debug!(steps = machine.steps(), "finished");
    Ok(machine.into_parts())
}

pub fn big_step(term: &Term) -> Result<Evaluation, RunError> {
    Ok(term.evaluate(&Environment::new())?)
}

/// Report for each input whether `pattern` matches it, one line per input.
pub fn match_all(
    pattern: &Pattern,
    inputs: &[String],
    use_dfa: bool,
    out: &mut impl Write,
) -> Result<(), RunError> {
    let matches: Vec<bool> = if use_dfa {
        let dfa = pattern.to_dfa_runner();
        debug!(rules = dfa.rulebook.rules.len(), "built dfa");
        inputs.iter().map(|input| dfa.accepts(input)).collect()
    } else {
        let nfa = pattern.to_nfa_runner();
        inputs.iter().map(|input| nfa.accepts(input)).collect()
    };
    for (input, matched) in inputs.iter().zip(matches) {
        let verdict = if matched { "match" } else { "no match" };
        writeln!(out, "{input:?}: {verdict}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use rstest::rstest;
    use simple_core::{
        common::Evaluation,
        environment::Environment,
        language::Term,
        parser::{parse_program, parse_regex},
    };

    use super::{RunError, big_step, match_all, small_step};

    #[test]
    fn trace_prints_every_state() -> Result<()> {
        let mut out = Vec::new();
        small_step(parse_program("x = 1 + 2")?, true, None, &mut out)?;
        assert_eq!(
            String::from_utf8(out)?,
            "x = 1 + 2, {}\nx = 3, {}\nnoop, {x: 3}\n"
        );
        Ok(())
    }

    #[test]
    fn step_limit_keeps_the_last_state() -> Result<()> {
        let program = parse_program("x = 0; while (true) { x = x + 1 }")?;
        let err = small_step(program, false, Some(10), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, RunError::StepLimit { steps: 10, .. }));
        Ok(())
    }

    #[test]
    fn stuck_machine_reports_its_state() -> Result<()> {
        let program = parse_program("x = 1; y = x + z")?;
        let err = small_step(program, false, None, &mut Vec::new()).unwrap_err();
        let RunError::Stuck { environment, .. } = &err else {
            panic!("unexpected {err}");
        };
        assert_eq!(*environment, Environment::from([("x", Term::number(1))]));
        assert!(err.to_string().starts_with("Undefined variable `z`"));
        Ok(())
    }

    #[test]
    fn big_step_returns_the_environment() -> Result<()> {
        let result = big_step(&parse_program("x = 2; y = x * x")?)?;
        assert_eq!(
            result,
            Evaluation::Environment(Environment::from([
                ("x", Term::number(2)),
                ("y", Term::number(4)),
            ]))
        );
        Ok(())
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    fn reports_each_input(#[case] use_dfa: bool) -> Result<()> {
        let pattern = parse_regex("(a(|b))*")?;
        let inputs = ["aaabab".to_string(), "aaabbb".to_string()];
        let mut out = Vec::new();
        match_all(&pattern, &inputs, use_dfa, &mut out)?;
        assert_eq!(
            String::from_utf8(out)?,
            "\"aaabab\": match\n\"aaabbb\": no match\n"
        );
        Ok(())
    }
}
