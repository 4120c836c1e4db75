use std::fmt::{self, Display};

use pretty::RcDoc;

use super::{PrettyPrint, bracket};
use crate::regex::Pattern;

impl Pattern {
    fn to_doc_within(&self, threshold: u8) -> RcDoc<'_, ()> {
        bracket(self.to_doc(), self.precedence(), threshold)
    }
}

impl PrettyPrint for Pattern {
    fn to_doc(&self) -> RcDoc<'_, ()> {
        match self {
            Self::Empty => RcDoc::nil(),
            Self::Literal(character) => RcDoc::text(character.to_string()),
            Self::Concatenate(first, second) => first
                .to_doc_within(self.precedence())
                .append(second.to_doc_within(self.precedence())),
            Self::Choose(first, second) => first
                .to_doc_within(self.precedence())
                .append(RcDoc::text("|"))
                .append(second.to_doc_within(self.precedence())),
            // `*` on its own would not parse back.
            Self::Repeat(inner) if **inner == Self::Empty => RcDoc::text("()*"),
            Self::Repeat(inner) => inner
                .to_doc_within(self.precedence())
                .append(RcDoc::text("*")),
        }
    }
}

impl Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_pretty())
    }
}
