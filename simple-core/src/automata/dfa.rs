use std::collections::BTreeSet;

use super::{InvalidInputError, Rulebook, State};

/// A deterministic automaton part-way through reading its input.
#[derive(Clone, Debug)]
pub struct Dfa<'a, S> {
    pub current_state: S,
    pub accept_states: &'a BTreeSet<S>,
    pub rulebook: &'a Rulebook<S>,
}

impl<S: State> Dfa<'_, S> {
    pub fn is_accepting(&self) -> bool {
        self.accept_states.contains(&self.current_state)
    }

    /// Take the transition for `symbol`. A symbol with no rule from the
    /// current state is an error and leaves the automaton where it was.
    pub fn read_character(&mut self, symbol: char) -> Result<(), InvalidInputError> {
        self.current_state = self.rulebook.next_state(&self.current_state, symbol)?;
        Ok(())
    }

    pub fn read_string(&mut self, input: &str) -> Result<(), InvalidInputError> {
        input
            .chars()
            .try_for_each(|symbol| self.read_character(symbol))
    }

    /// Whether the run ends in an accept state after reading `input`.
    ///
    /// Total over all strings: input that runs off the rulebook is rejected
    /// rather than reported.
    pub fn accepts(mut self, input: &str) -> bool {
        match self.read_string(input) {
            Ok(()) => self.is_accepting(),
            Err(err) => {
                tracing::trace!(%err, input, "rejected");
                false
            }
        }
    }
}

/// The static description of a DFA, from which fresh runs are started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DfaRunner<S> {
    pub start_state: S,
    pub accept_states: BTreeSet<S>,
    pub rulebook: Rulebook<S>,
}

impl<S: State> DfaRunner<S> {
    pub fn new(
        start_state: S,
        accept_states: impl IntoIterator<Item = S>,
        rulebook: Rulebook<S>,
    ) -> Self {
        Self {
            start_state,
            accept_states: accept_states.into_iter().collect(),
            rulebook,
        }
    }

    pub fn dfa(&self) -> Dfa<'_, S> {
        Dfa {
            current_state: self.start_state.clone(),
            accept_states: &self.accept_states,
            rulebook: &self.rulebook,
        }
    }

    pub fn accepts(&self, input: &str) -> bool {
        self.dfa().accepts(input)
    }
}
