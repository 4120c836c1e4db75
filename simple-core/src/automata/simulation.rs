use std::collections::BTreeSet;

use indexmap::IndexSet;
use tracing::debug;

use super::{Rule, Rulebook, State, dfa::DfaRunner, nfa::NfaRunner};

/// Subset construction over an NFA: each state of the resulting DFA is the
/// set of NFA states the NFA could be in after the same input.
#[derive(Clone, Copy, Debug)]
pub struct NfaSimulation<'a, S> {
    pub nfa: &'a NfaRunner<S>,
}

impl<'a, S: State> NfaSimulation<'a, S> {
    pub fn new(nfa: &'a NfaRunner<S>) -> Self {
        Self { nfa }
    }

    /// The closed set of NFA states reached from `states` on `symbol`.
    ///
    /// Unlike running the NFA this never fails: a symbol with no rule leads
    /// to the empty set, which the DFA keeps as its dead state.
    pub fn next_state(&self, states: &BTreeSet<S>, symbol: char) -> BTreeSet<S> {
        let rulebook = &self.nfa.rulebook;
        let current = rulebook.follow_free_moves(states);
        rulebook.follow_free_moves(&rulebook.next_states(&current, Some(symbol)))
    }

    /// One DFA rule per alphabet symbol out of `states`.
    pub fn rules_for(&self, states: &BTreeSet<S>) -> Vec<Rule<BTreeSet<S>>> {
        self.nfa
            .rulebook
            .alphabet()
            .into_iter()
            .map(|symbol| Rule::new(states.clone(), symbol, self.next_state(states, symbol)))
            .collect()
    }

    pub fn start_state(&self) -> BTreeSet<S> {
        self.nfa.nfa().current_states()
    }

    /// All state sets reachable from the start, in discovery order, together
    /// with the rules between them.
    pub fn discover_states_and_rules(&self) -> (IndexSet<BTreeSet<S>>, Vec<Rule<BTreeSet<S>>>) {
        let mut states = IndexSet::from([self.start_state()]);
        let mut rules = Vec::new();
        let mut next = 0;
        while let Some(current) = states.get_index(next).cloned() {
            for rule in self.rules_for(&current) {
                states.insert(rule.next_state.clone());
                rules.push(rule);
            }
            next += 1;
        }
        debug!(states = states.len(), rules = rules.len(), "subset construction closed");
        (states, rules)
    }

    pub fn to_dfa(&self) -> DfaRunner<BTreeSet<S>> {
        let (states, rules) = self.discover_states_and_rules();
        let accept_states = states
            .into_iter()
            .filter(|states| self.nfa.nfa_from(states.clone()).is_accepting());
        DfaRunner::new(self.start_state(), accept_states, Rulebook::new(rules))
    }
}

impl<S: State> NfaRunner<S> {
    /// An equivalent deterministic automaton.
    pub fn to_dfa(&self) -> DfaRunner<BTreeSet<S>> {
        NfaSimulation::new(self).to_dfa()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use itertools::Itertools;
    use rstest::{fixture, rstest};

    use super::NfaSimulation;
    use crate::automata::{Rule, Rulebook, nfa::NfaRunner};

    #[fixture]
    fn nfa() -> NfaRunner<u32> {
        NfaRunner::new(
            1,
            [3],
            Rulebook::new([
                Rule::new(1, 'a', 1),
                Rule::new(1, 'a', 2),
                Rule::free_move(1, 2),
                Rule::new(2, 'b', 3),
                Rule::new(3, 'b', 1),
                Rule::free_move(3, 2),
            ]),
        )
    }

    #[rstest]
    #[case(&[1, 2], 'a', &[1, 2])]
    #[case(&[1, 2], 'b', &[2, 3])]
    #[case(&[2, 3], 'a', &[])]
    #[case(&[2, 3], 'b', &[1, 2, 3])]
    #[case(&[1, 2, 3], 'a', &[1, 2])]
    #[case(&[1, 2, 3], 'b', &[1, 2, 3])]
    #[case(&[], 'a', &[])]
    fn next_state_is_closed(
        nfa: NfaRunner<u32>,
        #[case] from: &[u32],
        #[case] symbol: char,
        #[case] expected: &[u32],
    ) {
        let simulation = NfaSimulation::new(&nfa);
        assert_eq!(
            simulation.next_state(&from.iter().copied().collect(), symbol),
            expected.iter().copied().collect()
        );
    }

    #[rstest]
    fn rules_cover_the_alphabet(nfa: NfaRunner<u32>) {
        let simulation = NfaSimulation::new(&nfa);
        let rules = simulation.rules_for(&BTreeSet::from([1, 2]));
        assert_eq!(
            rules,
            vec![
                Rule::new(BTreeSet::from([1, 2]), 'a', BTreeSet::from([1, 2])),
                Rule::new(BTreeSet::from([1, 2]), 'b', BTreeSet::from([2, 3])),
            ]
        );
    }

    #[rstest]
    fn discovers_every_reachable_state_set(nfa: NfaRunner<u32>) {
        let (states, rules) = NfaSimulation::new(&nfa).discover_states_and_rules();
        assert_eq!(
            states.into_iter().collect_vec(),
            vec![
                BTreeSet::from([1, 2]),
                BTreeSet::from([2, 3]),
                BTreeSet::new(),
                BTreeSet::from([1, 2, 3]),
            ]
        );
        assert_eq!(rules.len(), 8);
    }

    #[rstest]
    fn dfa_has_the_expected_shape(nfa: NfaRunner<u32>) {
        let dfa = nfa.to_dfa();
        assert_eq!(dfa.start_state, BTreeSet::from([1, 2]));
        assert_eq!(
            dfa.accept_states,
            BTreeSet::from([BTreeSet::from([2, 3]), BTreeSet::from([1, 2, 3])])
        );
    }

    #[rstest]
    #[case("")]
    #[case("a")]
    #[case("b")]
    #[case("aaa")]
    #[case("aab")]
    #[case("bbbabb")]
    #[case("abab")]
    #[case("bba")]
    fn dfa_agrees_with_nfa(nfa: NfaRunner<u32>, #[case] input: &str) {
        assert_eq!(nfa.to_dfa().accepts(input), nfa.accepts(input));
    }

    #[rstest]
    fn dead_state_rejects_everything(nfa: NfaRunner<u32>) {
        let dfa = nfa.to_dfa();
        assert!(!dfa.accepts("aaa"));
        assert!(dfa.accepts("aab"));
        assert!(dfa.accepts("bbbabb"));
        assert!(!dfa.accepts("aba"));
    }

    /// Every string over `alphabet` of length at most `max_len`.
    fn strings_up_to(alphabet: &[char], max_len: usize) -> Vec<String> {
        let mut frontier = vec![String::new()];
        let mut all = frontier.clone();
        for _ in 0..max_len {
            frontier = frontier
                .iter()
                .cartesian_product(alphabet)
                .map(|(prefix, symbol)| format!("{prefix}{symbol}"))
                .collect();
            all.extend(frontier.iter().cloned());
        }
        all
    }

    #[rstest]
    fn dfa_agrees_with_nfa_exhaustively(nfa: NfaRunner<u32>) {
        let dfa = nfa.to_dfa();
        for input in strings_up_to(&['a', 'b', 'c'], 7) {
            assert_eq!(dfa.accepts(&input), nfa.accepts(&input), "{input:?}");
        }
    }
}
