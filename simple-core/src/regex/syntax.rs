use from_pest::{ConversionError, FromPest, Void};
use itertools::Itertools;
use pest::iterators::{Pair, Pairs};
use pest_derive::Parser;

use super::Pattern;

#[derive(Parser)]
#[grammar = "regex/regex.pest"]
pub struct RegexParser;

impl<'pest> FromPest<'pest> for Pattern {
    type Rule = Rule;
    type FatalError = Void;

    fn from_pest(
        pest: &mut Pairs<'pest, Self::Rule>,
    ) -> Result<Self, ConversionError<Self::FatalError>> {
        let mut clone = pest.clone();
        let pair = clone.next().ok_or(ConversionError::NoMatch)?;
        let pattern = pattern_from_pair(pair)?;
        *pest = clone;
        Ok(pattern)
    }
}

fn pattern_from_pair(pair: Pair<'_, Rule>) -> Result<Pattern, ConversionError<Void>> {
    match pair.as_rule() {
        Rule::choose => {
            let mut inner = pair.into_inner();
            let first = inner
                .next()
                .ok_or(ConversionError::NoMatch)
                .and_then(pattern_from_pair)?;
            match inner.next() {
                Some(rest) => Ok(Pattern::choose(first, pattern_from_pair(rest)?)),
                None => Ok(first),
            }
        }
        // `abc` is `a(bc)`; nothing at all is the empty pattern.
        Rule::sequence => {
            let items: Vec<_> = pair.into_inner().map(pattern_from_pair).try_collect()?;
            Ok(items
                .into_iter()
                .rev()
                .reduce(|rest, item| Pattern::concatenate(item, rest))
                .unwrap_or(Pattern::Empty))
        }
        Rule::repeat => {
            let mut inner = pair.into_inner();
            let atom = inner
                .next()
                .ok_or(ConversionError::NoMatch)
                .and_then(pattern_from_pair)?;
            Ok(inner.fold(atom, |pattern, _star| Pattern::repeat(pattern)))
        }
        Rule::literal => pair
            .as_str()
            .chars()
            .next()
            .map(Pattern::literal)
            .ok_or(ConversionError::NoMatch),
        rule => {
            tracing::error!("unexpected rule {:?}", rule);
            Err(ConversionError::NoMatch)
        }
    }
}
