use std::{
    collections::BTreeSet,
    fmt::{Debug, Display},
    hash::Hash,
};

use derivative::Derivative;
use thiserror::Error;

pub mod dfa;
pub mod nfa;
pub mod simulation;

/// Anything usable as an automaton state.
///
/// States are ordered so that sets of states can themselves be states, which
/// is what subset construction needs.
pub trait State: Clone + Ord + Hash + Debug {}
impl<T: Clone + Ord + Hash + Debug> State for T {}

/// The input label of a rule; `None` is a free (epsilon) move that never
/// matches a concrete symbol.
pub type Symbol = Option<char>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("No rule for state {state} on input {symbol:?}")]
pub struct InvalidInputError {
    pub state: String,
    pub symbol: char,
}

impl InvalidInputError {
    pub(crate) fn new<S: Debug>(state: &S, symbol: char) -> Self {
        Self {
            state: format!("{state:?}"),
            symbol,
        }
    }
}

/// A single labelled transition.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rule<S> {
    pub state: S,
    pub symbol: Symbol,
    pub next_state: S,
}

impl<S: State> Rule<S> {
    pub fn new(state: S, symbol: char, next_state: S) -> Self {
        Self {
            state,
            symbol: Some(symbol),
            next_state,
        }
    }

    pub fn free_move(state: S, next_state: S) -> Self {
        Self {
            state,
            symbol: None,
            next_state,
        }
    }

    pub fn applies_to(&self, state: &S, symbol: Symbol) -> bool {
        self.state == *state && self.symbol == symbol
    }

    pub fn follow(&self) -> &S {
        &self.next_state
    }
}

impl<S: Debug> Display for Rule<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.symbol {
            Some(symbol) => write!(f, "{:?} --{symbol}--> {:?}", self.state, self.next_state),
            None => write!(f, "{:?} --ε--> {:?}", self.state, self.next_state),
        }
    }
}

/// An ordered collection of rules.
///
/// A deterministic reading takes the first rule that applies; a
/// nondeterministic reading follows all of them.
#[derive(Clone, Debug, PartialEq, Eq, Derivative)]
#[derivative(Default(bound = ""))]
pub struct Rulebook<S> {
    pub rules: Vec<Rule<S>>,
}

impl<S: State> Rulebook<S> {
    pub fn new(rules: impl IntoIterator<Item = Rule<S>>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    pub fn rule_for(&self, state: &S, symbol: Symbol) -> Option<&Rule<S>> {
        self.rules.iter().find(|rule| rule.applies_to(state, symbol))
    }

    /// The deterministic successor of `state` on `symbol`.
    pub fn next_state(&self, state: &S, symbol: char) -> Result<S, InvalidInputError> {
        self.rule_for(state, Some(symbol))
            .map(|rule| rule.follow().clone())
            .ok_or_else(|| InvalidInputError::new(state, symbol))
    }

    /// Every state reachable from one of `states` by a single `symbol` rule.
    pub fn next_states(&self, states: &BTreeSet<S>, symbol: Symbol) -> BTreeSet<S> {
        self.rules
            .iter()
            .filter(|rule| rule.symbol == symbol && states.contains(&rule.state))
            .map(|rule| rule.follow().clone())
            .collect()
    }

    /// The epsilon-closure of `states`: everything reachable through zero or
    /// more free moves.
    pub fn follow_free_moves(&self, states: &BTreeSet<S>) -> BTreeSet<S> {
        let mut closure = states.clone();
        loop {
            let more = self.next_states(&closure, None);
            if more.is_subset(&closure) {
                return closure;
            }
            closure.extend(more);
        }
    }

    /// The distinct non-epsilon symbols used by the rules.
    pub fn alphabet(&self) -> BTreeSet<char> {
        self.rules.iter().filter_map(|rule| rule.symbol).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule<S>> {
        self.rules.iter()
    }
}

impl<S: State> FromIterator<Rule<S>> for Rulebook<S> {
    fn from_iter<I: IntoIterator<Item = Rule<S>>>(iter: I) -> Self {
        Self::new(iter)
    }
}
