use std::collections::BTreeSet;

use crate::automata::{dfa::DfaRunner, nfa::NfaRunner};

pub mod compile;
pub mod syntax;

pub use self::compile::StateId;

/// A regular expression over single characters.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Pattern {
    /// Matches only the empty string.
    Empty,
    Literal(char),
    Concatenate(Box<Pattern>, Box<Pattern>),
    /// Alternation, written `|`.
    Choose(Box<Pattern>, Box<Pattern>),
    /// Kleene star.
    Repeat(Box<Pattern>),
}

impl Pattern {
    pub fn literal(character: char) -> Self {
        Self::Literal(character)
    }

    pub fn concatenate(first: Pattern, second: Pattern) -> Self {
        Self::Concatenate(Box::new(first), Box::new(second))
    }

    pub fn choose(first: Pattern, second: Pattern) -> Self {
        Self::Choose(Box::new(first), Box::new(second))
    }

    pub fn repeat(pattern: Pattern) -> Self {
        Self::Repeat(Box::new(pattern))
    }

    /// Binding strength when printing; looser patterns are bracketed inside
    /// tighter ones.
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Choose(..) => 0,
            Self::Concatenate(..) => 1,
            Self::Repeat(_) => 2,
            Self::Empty | Self::Literal(_) => 3,
        }
    }

    pub fn to_nfa_runner(&self) -> NfaRunner<StateId> {
        compile::compile(self)
    }

    pub fn to_dfa_runner(&self) -> DfaRunner<BTreeSet<StateId>> {
        self.to_nfa_runner().to_dfa()
    }

    /// Whether the whole of `input` is in the language of the pattern.
    pub fn matches(&self, input: &str) -> bool {
        self.to_nfa_runner().accepts(input)
    }
}
