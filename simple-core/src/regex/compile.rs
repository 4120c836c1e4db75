use std::{collections::BTreeSet, fmt};

use tracing::{Level, debug};

use super::Pattern;
use crate::automata::{Rule, Rulebook, nfa::NfaRunner};

/// A state of a compiled pattern. Every compilation numbers its states from
/// zero, so ids are only meaningful within one automaton.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct StateId(usize);

impl StateId {
    fn fresh(number: usize) -> Self {
        Self(number)
    }
}

impl fmt::Debug for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A partly built automaton: the start state and accept states of one
/// subpattern. Its rules live in the shared `Builder`.
struct Fragment {
    start: StateId,
    accept: BTreeSet<StateId>,
}

#[derive(Default)]
struct Builder {
    next: usize,
    rules: Vec<Rule<StateId>>,
}

impl Builder {
    fn fresh(&mut self) -> StateId {
        let state = StateId::fresh(self.next);
        self.next += 1;
        state
    }

    fn link(&mut self, from: &BTreeSet<StateId>, to: StateId) {
        self.rules
            .extend(from.iter().map(|&state| Rule::free_move(state, to)));
    }

    fn build(&mut self, pattern: &Pattern) -> Fragment {
        match pattern {
            Pattern::Empty => {
                let start = self.fresh();
                Fragment {
                    start,
                    accept: BTreeSet::from([start]),
                }
            }
            Pattern::Literal(character) => {
                let start = self.fresh();
                let accept = self.fresh();
                self.rules.push(Rule::new(start, *character, accept));
                Fragment {
                    start,
                    accept: BTreeSet::from([accept]),
                }
            }
            Pattern::Concatenate(first, second) => {
                let first = self.build(first);
                let second = self.build(second);
                self.link(&first.accept, second.start);
                Fragment {
                    start: first.start,
                    accept: second.accept,
                }
            }
            Pattern::Choose(first, second) => {
                let start = self.fresh();
                let first = self.build(first);
                let second = self.build(second);
                self.rules.push(Rule::free_move(start, first.start));
                self.rules.push(Rule::free_move(start, second.start));
                Fragment {
                    start,
                    accept: first.accept.union(&second.accept).copied().collect(),
                }
            }
            Pattern::Repeat(inner) => {
                // The new start accepts so that zero repetitions match.
                let start = self.fresh();
                let inner = self.build(inner);
                self.rules.push(Rule::free_move(start, inner.start));
                self.link(&inner.accept, inner.start);
                let mut accept = inner.accept;
                accept.insert(start);
                Fragment { start, accept }
            }
        }
    }
}

/// Thompson-style construction of an NFA accepting exactly the language of
/// `pattern`.
#[tracing::instrument(level = Level::DEBUG, skip_all, fields(pattern = %pattern))]
pub fn compile(pattern: &Pattern) -> NfaRunner<StateId> {
    let mut builder = Builder::default();
    let Fragment { start, accept } = builder.build(pattern);
    debug!(states = builder.next, rules = builder.rules.len(), "compiled");
    NfaRunner::new(start, accept, Rulebook::new(builder.rules))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{StateId, compile};
    use crate::{automata::Rule, regex::Pattern};

    #[test]
    fn literal_is_two_states_and_one_rule() {
        let nfa = compile(&Pattern::literal('a'));
        assert_eq!(nfa.start_state, StateId(0));
        assert_eq!(nfa.accept_states, BTreeSet::from([StateId(1)]));
        assert_eq!(nfa.rulebook.rules, vec![Rule::new(StateId(0), 'a', StateId(1))]);
    }

    #[test]
    fn empty_accepts_its_start() {
        let nfa = compile(&Pattern::Empty);
        assert_eq!(nfa.accept_states, BTreeSet::from([nfa.start_state]));
        assert!(nfa.rulebook.rules.is_empty());
    }

    #[test]
    fn repeat_adds_an_accepting_start() {
        let nfa = compile(&Pattern::repeat(Pattern::literal('a')));
        assert!(nfa.accept_states.contains(&nfa.start_state));
        assert!(nfa.accepts(""));
        assert!(nfa.accepts("aaa"));
    }

    #[test]
    fn states_are_fresh() {
        let nfa = compile(&Pattern::choose(
            Pattern::concatenate(Pattern::literal('a'), Pattern::literal('b')),
            Pattern::literal('c'),
        ));
        let states: BTreeSet<_> = nfa
            .rulebook
            .iter()
            .flat_map(|rule| [rule.state, rule.next_state])
            .collect();
        assert_eq!(states.len(), 7);
    }

    #[test]
    fn state_ids_print_compactly() {
        assert_eq!(format!("{:?}", StateId(4)), "q4");
        assert_eq!(Rule::free_move(StateId(0), StateId(1)).to_string(), "q0 --ε--> q1");
    }
}
