use std::collections::BTreeSet;

use super::{InvalidInputError, Rulebook, State};

/// A nondeterministic automaton part-way through reading its input.
///
/// Only the states reached by the last transition are stored; the
/// epsilon-closure is taken afresh every time the current states are read.
#[derive(Clone, Debug)]
pub struct Nfa<'a, S> {
    states: BTreeSet<S>,
    pub accept_states: &'a BTreeSet<S>,
    pub rulebook: &'a Rulebook<S>,
}

impl<'a, S: State> Nfa<'a, S> {
    pub fn new(
        states: BTreeSet<S>,
        accept_states: &'a BTreeSet<S>,
        rulebook: &'a Rulebook<S>,
    ) -> Self {
        Self {
            states,
            accept_states,
            rulebook,
        }
    }

    pub fn current_states(&self) -> BTreeSet<S> {
        self.rulebook.follow_free_moves(&self.states)
    }

    pub fn is_accepting(&self) -> bool {
        !self.current_states().is_disjoint(self.accept_states)
    }

    /// Follow every rule for `symbol` out of the current states. If none
    /// applies the automaton is stuck, which is reported as invalid input.
    pub fn read_character(&mut self, symbol: char) -> Result<(), InvalidInputError> {
        let current = self.current_states();
        let next = self.rulebook.next_states(&current, Some(symbol));
        if next.is_empty() {
            return Err(InvalidInputError::new(&current, symbol));
        }
        self.states = next;
        Ok(())
    }

    pub fn read_string(&mut self, input: &str) -> Result<(), InvalidInputError> {
        input
            .chars()
            .try_for_each(|symbol| self.read_character(symbol))
    }

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

/// The static description of an NFA, from which fresh runs are started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NfaRunner<S> {
    pub start_state: S,
    pub accept_states: BTreeSet<S>,
    pub rulebook: Rulebook<S>,
}

impl<S: State> NfaRunner<S> {
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

    pub fn nfa(&self) -> Nfa<'_, S> {
        self.nfa_from(BTreeSet::from([self.start_state.clone()]))
    }

    /// A run that starts from an arbitrary set of states.
    pub fn nfa_from(&self, states: BTreeSet<S>) -> Nfa<'_, S> {
        Nfa::new(states, &self.accept_states, &self.rulebook)
    }

    pub fn accepts(&self, input: &str) -> bool {
        self.nfa().accepts(input)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rstest::{fixture, rstest};

    use super::{Nfa, NfaRunner};
    use crate::automata::{Rule, Rulebook};

    #[fixture]
    fn third_from_last_is_b() -> Rulebook<u32> {
        Rulebook::new([
            Rule::new(1, 'a', 1),
            Rule::new(1, 'b', 1),
            Rule::new(1, 'b', 2),
            Rule::new(2, 'a', 3),
            Rule::new(2, 'b', 3),
            Rule::new(3, 'a', 4),
            Rule::new(3, 'b', 4),
        ])
    }

    #[rstest]
    #[case(BTreeSet::from([1, 2]), true)]
    #[case(BTreeSet::from([3, 4]), false)]
    fn accepting_if_any_state_accepts(#[case] states: BTreeSet<u32>, #[case] accepting: bool) {
        let accept_states = BTreeSet::from([2]);
        let rulebook = Rulebook::default();
        let nfa = Nfa::new(states, &accept_states, &rulebook);
        assert_eq!(nfa.is_accepting(), accepting);
    }

    #[rstest]
    fn reads_a_character(third_from_last_is_b: Rulebook<u32>) {
        let runner = NfaRunner::new(1, [2], third_from_last_is_b);
        let mut nfa = runner.nfa();
        assert_eq!(nfa.read_character('b'), Ok(()));
        assert_eq!(nfa.current_states(), BTreeSet::from([1, 2]));
        assert!(nfa.is_accepting());
    }

    #[rstest]
    #[case("bab", true)]
    #[case("bbbbbbbbb", true)]
    #[case("bbbbbbbb", true)]
    #[case("abb", false)]
    #[case("bbabb", false)]
    #[case("", false)]
    #[case("bac", false)]
    fn runner_accepts(
        third_from_last_is_b: Rulebook<u32>,
        #[case] input: &str,
        #[case] accepted: bool,
    ) {
        let runner = NfaRunner::new(1, [4], third_from_last_is_b);
        assert_eq!(runner.accepts(input), accepted);
    }

    #[test]
    fn current_states_include_free_moves() {
        let runner = NfaRunner::new(
            1,
            [4],
            Rulebook::new([
                Rule::free_move(1, 2),
                Rule::free_move(2, 3),
                Rule::free_move(3, 4),
            ]),
        );
        assert_eq!(runner.nfa().current_states(), BTreeSet::from([1, 2, 3, 4]));
        assert!(runner.accepts(""));
    }

    #[test]
    fn free_moves_are_followed_after_every_step() {
        // Even-length runs of `a`s, or runs of `a`s whose length is a multiple of three.
        let runner = NfaRunner::new(
            1,
            [2, 4],
            Rulebook::new([
                Rule::free_move(1, 2),
                Rule::free_move(1, 4),
                Rule::new(2, 'a', 3),
                Rule::new(3, 'a', 2),
                Rule::new(4, 'a', 5),
                Rule::new(5, 'a', 6),
                Rule::new(6, 'a', 4),
            ]),
        );
        assert!(runner.accepts("aa"));
        assert!(runner.accepts("aaa"));
        assert!(!runner.accepts("aaaaa"));
        assert!(runner.accepts("aaaaaa"));
    }

    #[test]
    fn stuck_nfa_reports_invalid_input() {
        let runner = NfaRunner::new(1, [2], Rulebook::new([Rule::new(1, 'a', 2)]));
        let mut nfa = runner.nfa();
        assert!(nfa.read_character('b').is_err());
        assert_eq!(nfa.current_states(), BTreeSet::from([1]));
        assert!(!runner.accepts("b"));
    }
}
