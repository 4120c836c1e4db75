use std::sync::Arc;

use indexmap::IndexMap;

use crate::{
    common::EvalError,
    language::{Name, Term},
};

/// A mapping from variable names to values with value semantics.
///
/// The bindings are shared between clones; `assign` copies them on write, so a
/// caller holding an environment never observes a later assignment.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Environment {
    bindings: Arc<IndexMap<Name, Term>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &Name) -> Option<&Term> {
        self.bindings.get(name)
    }

    /// Look up a variable, failing if it is unbound.
    pub fn lookup(&self, name: &Name) -> Result<Term, EvalError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedVariable(name.clone()))
    }

    /// A new environment in which `name` is bound to `value`.
    #[must_use]
    pub fn assign(&self, name: Name, value: Term) -> Self {
        let mut bindings = Arc::clone(&self.bindings);
        Arc::make_mut(&mut bindings).insert(name, value);
        Self { bindings }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Name, &Term)> {
        self.bindings.iter()
    }
}

impl<N: Into<Name>> FromIterator<(N, Term)> for Environment {
    fn from_iter<I: IntoIterator<Item = (N, Term)>>(iter: I) -> Self {
        Self {
            bindings: Arc::new(
                iter.into_iter()
                    .map(|(name, value)| (name.into(), value))
                    .collect(),
            ),
        }
    }
}

impl<N: Into<Name>, const K: usize> From<[(N, Term); K]> for Environment {
    fn from(bindings: [(N, Term); K]) -> Self {
        bindings.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Environment;
    use crate::{common::EvalError, language::Term};

    #[test]
    fn assign_does_not_disturb_the_original() {
        let before = Environment::from([("x", Term::number(1))]);
        let after = before.assign("x".into(), Term::number(9));

        assert_eq!(before.get(&"x".into()), Some(&Term::number(1)));
        assert_eq!(after.get(&"x".into()), Some(&Term::number(9)));
    }

    #[test]
    fn assign_extends() {
        let env = Environment::new()
            .assign("x".into(), Term::number(1))
            .assign("y".into(), Term::boolean(true));

        assert_eq!(env.len(), 2);
        assert_eq!(
            env,
            Environment::from([("y", Term::boolean(true)), ("x", Term::number(1))])
        );
    }

    #[test]
    fn lookup_of_unbound_name_fails() {
        let env = Environment::new();
        assert_eq!(
            env.lookup(&"z".into()),
            Err(EvalError::UndefinedVariable("z".into()))
        );
    }
}
