//! Adapter over the `matchit` path matcher.
//!
//! # Responsibilities
//! - Keep one radix tree per HTTP method
//! - Resolve a path to at most one endpoint plus its raw captures
//! - Report trailing-slash near misses and which methods accept a path
//!
//! # Design Decisions
//! - Match priority (static over dynamic, longest match) belongs to matchit
//! - Captures are returned in placeholder order; names are positional
//! - Endpoints are plain indices into the dispatch table

use std::collections::HashMap;

use axum::http::Method;
use matchit::{InsertError, MatchError};

/// Result of looking up a path for one method.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Lookup {
    /// An endpoint accepts the path; captures in placeholder order.
    Found { endpoint: usize, values: Vec<String> },
    /// The path would match at this location instead.
    TrailingSlash(String),
    NotFound,
}

#[derive(Default)]
pub(crate) struct Matcher {
    trees: HashMap<Method, matchit::Router<usize>>,
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, method: &Method, pattern: &str, endpoint: usize) -> Result<(), InsertError> {
        self.trees
            .entry(method.clone())
            .or_insert_with(matchit::Router::new)
            .insert(pattern, endpoint)
    }

    pub fn lookup(&self, method: &Method, path: &str) -> Lookup {
        let Some(tree) = self.trees.get(method) else {
            return Lookup::NotFound;
        };

        match tree.at(path) {
            Ok(found) => Lookup::Found {
                endpoint: *found.value,
                values: found.params.iter().map(|(_, v)| v.to_string()).collect(),
            },
            Err(MatchError::ExtraTrailingSlash) => {
                Lookup::TrailingSlash(path.trim_end_matches('/').to_string())
            }
            Err(MatchError::MissingTrailingSlash) => Lookup::TrailingSlash(format!("{path}/")),
            Err(_) => Lookup::NotFound,
        }
    }

    /// Methods other than `except` whose tree accepts `path`.
    pub fn allowed(&self, path: &str, except: &Method) -> Vec<Method> {
        let mut methods: Vec<Method> = self
            .trees
            .iter()
            .filter(|(method, tree)| *method != except && tree.at(path).is_ok())
            .map(|(method, _)| method.clone())
            .collect();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_captures_in_order() {
        let mut matcher = Matcher::new();
        matcher.insert(&Method::GET, "/users/:0/articles/:1", 7).unwrap();

        let lookup = matcher.lookup(&Method::GET, "/users/111/articles/222");
        assert_eq!(
            lookup,
            Lookup::Found {
                endpoint: 7,
                values: vec!["111".to_string(), "222".to_string()],
            }
        );

        assert_eq!(matcher.lookup(&Method::POST, "/users/111/articles/222"), Lookup::NotFound);
    }

    #[test]
    fn test_remainder_capture() {
        let mut matcher = Matcher::new();
        matcher.insert(&Method::GET, "/files/*0", 0).unwrap();

        match matcher.lookup(&Method::GET, "/files/a/b.txt") {
            Lookup::Found { values, .. } => assert_eq!(values[0].trim_matches('/'), "a/b.txt"),
            other => panic!("unexpected lookup: {other:?}"),
        }
    }

    #[test]
    fn test_trailing_slash() {
        let mut matcher = Matcher::new();
        matcher.insert(&Method::GET, "/about", 0).unwrap();

        assert_eq!(
            matcher.lookup(&Method::GET, "/about/"),
            Lookup::TrailingSlash("/about".to_string())
        );
    }

    #[test]
    fn test_allowed() {
        let mut matcher = Matcher::new();
        matcher.insert(&Method::GET, "/test", 0).unwrap();
        matcher.insert(&Method::POST, "/test", 1).unwrap();
        matcher.insert(&Method::DELETE, "/other", 2).unwrap();

        assert_eq!(matcher.allowed("/test", &Method::PUT), vec![Method::GET, Method::POST]);
        assert_eq!(matcher.allowed("/test", &Method::GET), vec![Method::POST]);
        assert!(matcher.allowed("/missing", &Method::GET).is_empty());
    }
}
