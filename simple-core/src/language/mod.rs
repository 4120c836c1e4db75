use std::sync::Arc;

use derive_more::Display;
use ordered_float::OrderedFloat;
use pest_ast::FromPest;

use self::simple::Rule;

pub mod simple;

pub(crate) fn span_into_str(span: pest::Span) -> &str {
    span.as_str()
}

/// Numbers are doubles compared and hashed by value.
pub type Number = OrderedFloat<f64>;

/// The name of a variable, as used by `Variable` and `Assign`.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, FromPest)]
#[pest_ast(rule(Rule::name))]
pub struct Name(#[pest_ast(outer(with(span_into_str), with(str::to_string)))] pub String);

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name(value.to_string())
    }
}

/// A node of a SIMPLE program.
///
/// Children are reference counted so that rewriting a term only allocates the
/// nodes along the rewritten path; untouched subtrees are shared between the
/// old and the new term.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Term {
    Number(Number),
    Boolean(bool),
    Variable(Name),
    Add(Arc<Term>, Arc<Term>),
    Multiply(Arc<Term>, Arc<Term>),
    LessThan(Arc<Term>, Arc<Term>),
    Noop,
    Assign(Name, Arc<Term>),
    If {
        condition: Arc<Term>,
        consequence: Arc<Term>,
        alternative: Arc<Term>,
    },
    While {
        condition: Arc<Term>,
        body: Arc<Term>,
    },
    Sequence(Vec<Term>),
}

/// Which binary operator a binary term applies.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Display)]
pub enum BinaryOp {
    #[display("+")]
    Add,
    #[display("*")]
    Multiply,
    #[display("<")]
    LessThan,
}

impl BinaryOp {
    pub(crate) fn build(self, left: Arc<Term>, right: Arc<Term>) -> Term {
        match self {
            Self::Add => Term::Add(left, right),
            Self::Multiply => Term::Multiply(left, right),
            Self::LessThan => Term::LessThan(left, right),
        }
    }

    /// Combine two irreducible operands. `None` if they are not both numbers.
    pub(crate) fn apply(self, left: &Term, right: &Term) -> Option<Term> {
        let (Term::Number(l), Term::Number(r)) = (left, right) else {
            return None;
        };
        Some(match self {
            Self::Add => Term::Number(*l + *r),
            Self::Multiply => Term::Number(*l * *r),
            Self::LessThan => Term::Boolean(l < r),
        })
    }
}

impl Term {
    pub fn number(value: impl Into<f64>) -> Self {
        Self::Number(OrderedFloat(value.into()))
    }

    pub fn boolean(value: bool) -> Self {
        Self::Boolean(value)
    }

    pub fn variable(name: impl Into<Name>) -> Self {
        Self::Variable(name.into())
    }

    pub fn add(left: Term, right: Term) -> Self {
        Self::Add(Arc::new(left), Arc::new(right))
    }

    pub fn multiply(left: Term, right: Term) -> Self {
        Self::Multiply(Arc::new(left), Arc::new(right))
    }

    pub fn less_than(left: Term, right: Term) -> Self {
        Self::LessThan(Arc::new(left), Arc::new(right))
    }

    pub fn assign(name: impl Into<Name>, expression: Term) -> Self {
        Self::Assign(name.into(), Arc::new(expression))
    }

    pub fn if_else(condition: Term, consequence: Term, alternative: Term) -> Self {
        Self::If {
            condition: Arc::new(condition),
            consequence: Arc::new(consequence),
            alternative: Arc::new(alternative),
        }
    }

    pub fn while_loop(condition: Term, body: Term) -> Self {
        Self::While {
            condition: Arc::new(condition),
            body: Arc::new(body),
        }
    }

    pub fn sequence(statements: impl IntoIterator<Item = Term>) -> Self {
        Self::Sequence(statements.into_iter().collect())
    }

    /// Whether some rewrite rule applies to this term.
    ///
    /// This depends only on the variant: `Variable` is reducible even though it
    /// has no subterms.
    pub fn is_reducible(&self) -> bool {
        !matches!(self, Self::Number(_) | Self::Boolean(_) | Self::Noop)
    }

    /// Whether the term belongs to the expression fragment of the language
    /// (it produces a value rather than a new environment).
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            Self::Number(_)
                | Self::Boolean(_)
                | Self::Variable(_)
                | Self::Add(..)
                | Self::Multiply(..)
                | Self::LessThan(..)
        )
    }

    /// Split a binary expression into its operator and operands.
    pub fn as_binary(&self) -> Option<(BinaryOp, &Arc<Term>, &Arc<Term>)> {
        match self {
            Self::Add(left, right) => Some((BinaryOp::Add, left, right)),
            Self::Multiply(left, right) => Some((BinaryOp::Multiply, left, right)),
            Self::LessThan(left, right) => Some((BinaryOp::LessThan, left, right)),
            _ => None,
        }
    }
}

impl From<bool> for Term {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Number> for Term {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}
