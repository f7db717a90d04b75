//! Named path parameters bound to a request.
//!
//! # Design Decisions
//! - Stored in request extensions, so bindings never leak across requests
//! - Keeps placeholder order; lookups are linear (routes have few params)

use std::collections::HashMap;

use axum::http::Request;

/// One bound `name = value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub key: String,
    pub value: String,
}

/// Parameters bound by the route that handled the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<Param>);

impl Params {
    /// Pair `names` with `values` position by position.
    pub(crate) fn bind(names: &[String], values: &[String]) -> Self {
        Self(
            names
                .iter()
                .zip(values)
                .map(|(key, value)| Param {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
        )
    }

    /// Parameters attached to `req`, or an empty set.
    pub fn from_request<B>(req: &Request<B>) -> Self {
        req.extensions().get::<Params>().cloned().unwrap_or_default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|p| p.key == name)
            .map(|p| p.value.as_str())
    }

    /// Value of `name`, or `""` when absent.
    pub fn by_name(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.0.iter()
    }

    pub fn values(&self) -> Vec<&str> {
        self.0.iter().map(|p| p.value.as_str()).collect()
    }

    pub fn to_map(&self) -> HashMap<String, String> {
        self.0
            .iter()
            .map(|p| (p.key.clone(), p.value.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = &'a Param;
    type IntoIter = std::slice::Iter<'a, Param>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Read bound parameters straight off a request.
pub trait ParamsExt {
    fn params(&self) -> Option<&Params>;
}

impl<B> ParamsExt for Request<B> {
    fn params(&self) -> Option<&Params> {
        self.extensions().get::<Params>()
    }
}
