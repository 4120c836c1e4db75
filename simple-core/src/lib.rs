use std::collections::BTreeSet;

use automata::{
    Rulebook, State,
    dfa::{Dfa, DfaRunner},
    nfa::{Nfa, NfaRunner},
};
use common::{EvalError, Evaluation};
use environment::Environment;
use language::Term;
use regex::{Pattern, StateId};
use small_step::Machine;

pub mod automata;
pub mod big_step;
pub mod common;
pub mod environment;
pub mod language;
pub mod parser;
pub mod prettyprinter;
pub mod regex;
pub mod small_step;

/// Rewrite `term` one step at a time until it is irreducible.
pub fn reduce_to_normal_form(
    term: Term,
    env: Environment,
) -> Result<(Term, Environment), EvalError> {
    Machine::new(term, env).run()
}

pub fn evaluate(term: &Term, env: &Environment) -> Result<Evaluation, EvalError> {
    term.evaluate(env)
}

pub fn dfa_accepts<S: State>(
    rulebook: &Rulebook<S>,
    start: S,
    accept_states: &BTreeSet<S>,
    input: &str,
) -> bool {
    Dfa {
        current_state: start,
        accept_states,
        rulebook,
    }
    .accepts(input)
}

pub fn nfa_accepts<S: State>(
    rulebook: &Rulebook<S>,
    start: S,
    accept_states: &BTreeSet<S>,
    input: &str,
) -> bool {
    Nfa::new(BTreeSet::from([start]), accept_states, rulebook).accepts(input)
}

/// The deterministic equivalent of an NFA, by subset construction.
pub fn nfa_to_dfa<S: State>(
    rulebook: Rulebook<S>,
    start: S,
    accept_states: impl IntoIterator<Item = S>,
) -> DfaRunner<BTreeSet<S>> {
    NfaRunner::new(start, accept_states, rulebook).to_dfa()
}

pub fn regex_to_nfa(pattern: &Pattern) -> NfaRunner<StateId> {
    pattern.to_nfa_runner()
}
