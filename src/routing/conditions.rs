//! Per-parameter validation predicates.
//!
//! # Design Decisions
//! - Keyed by parameter position, not name; a missing entry always accepts
//! - Predicates are immutable shared closures, so cloning is shallow
//! - A scope and every route created from it own independent copies

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

/// A validation predicate over one captured path value.
#[derive(Clone)]
pub struct Condition(Arc<dyn Fn(&str) -> bool + Send + Sync>);

impl Condition {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Accept values matched by `regex`.
    pub fn regex(regex: Regex) -> Self {
        Self::new(move |v| regex.is_match(v))
    }

    pub fn check(&self, value: &str) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Condition(..)")
    }
}

/// Position-indexed predicates for one scope or route.
#[derive(Debug, Clone, Default)]
pub struct Conditions {
    by_index: BTreeMap<usize, Condition>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a predicate at `index`, replacing any previous one.
    pub fn set(&mut self, index: usize, condition: Condition) {
        self.by_index.insert(index, condition);
    }

    pub fn get(&self, index: usize) -> Option<&Condition> {
        self.by_index.get(&index)
    }

    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }

    /// True when every constrained position accepts its value.
    ///
    /// A constrained position with no corresponding value rejects.
    pub fn match_all<S: AsRef<str>>(&self, values: &[S]) -> bool {
        self.by_index.iter().all(|(index, condition)| {
            values
                .get(*index)
                .is_some_and(|v| condition.check(v.as_ref()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits() -> Condition {
        Condition::regex(Regex::new(r"^\d+$").unwrap())
    }

    #[test]
    fn test_unconstrained_accepts_anything() {
        let conditions = Conditions::new();
        assert!(conditions.match_all(&["anything", "at/all"]));
        assert!(conditions.match_all::<&str>(&[]));
    }

    #[test]
    fn test_match_all() {
        let mut conditions = Conditions::new();
        conditions.set(1, digits());

        assert!(conditions.match_all(&["abc", "123"]));
        assert!(!conditions.match_all(&["123", "abc"]));
        // Position 1 has a predicate but no value
        assert!(!conditions.match_all(&["123"]));
    }

    #[test]
    fn test_set_overwrites() {
        let mut conditions = Conditions::new();
        conditions.set(0, digits());
        conditions.set(0, Condition::new(|v| v == "abc"));

        assert_eq!(conditions.len(), 1);
        assert!(conditions.match_all(&["abc"]));
        assert!(!conditions.match_all(&["123"]));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut parent = Conditions::new();
        parent.set(0, digits());

        let mut child = parent.clone();
        child.set(1, Condition::new(|_| false));

        assert_eq!(parent.len(), 1);
        assert_eq!(child.len(), 2);
        assert!(parent.match_all(&["1", "x"]));
        assert!(!child.match_all(&["1", "x"]));
    }
}
