//! Declarative route maps.
//!
//! # Data Flow
//! ```text
//! toml::Table (from a .toml or .json file, or built in code)
//!     → keys visited in sorted order
//!         "$where"          → scope conditions (param → regex)
//!         "$use"            → scope middleware, by name
//!         "GET, POST /path" → route named by the value, handler by name
//!         "(label)" = table → group
//!         "/path" = table   → prefix
//! ```
//!
//! # Design Decisions
//! - Sorted traversal puts `$` keys ahead of routes and nested scopes
//! - Regex strings are compiled once per parse and shared between routes
//! - Malformed values are returned as errors; unknown parameter names still
//!   panic like any other registration mistake
//! - Unknown middleware names are skipped, unknown handler names leave the
//!   route without a handler

use std::collections::HashMap;

use axum::http::Method;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use toml::Value;

use crate::http::handler::Handler;
use crate::http::middleware::Middleware;
use crate::routing::scope::Registrar;

static ROUTE_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(((GET|POST|PUT|PATCH|DELETE|OPTIONS)\b(,\s*)?)+)(\s+(.*))?$")
        .expect("route key regex is valid")
});

static GROUP_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(.*\)$").expect("group key regex is valid"));

/// Problems found while reading a route map.
#[derive(Debug, Error)]
pub enum RouteMapError {
    #[error("{param}: invalid regex: {source}")]
    InvalidRegex {
        param: String,
        #[source]
        source: regex::Error,
    },

    #[error("{key}: expected {expected}, found {found}")]
    UnexpectedType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// Walks a route map and registers what it describes.
pub struct RouteMapParser<'a> {
    handler_by_name: &'a dyn Fn(&str) -> Option<Handler>,
    middleware_by_name: &'a dyn Fn(&str) -> Option<Middleware>,
    regexes: HashMap<String, Regex>,
}

impl<'a> RouteMapParser<'a> {
    pub fn new(
        handler_by_name: &'a dyn Fn(&str) -> Option<Handler>,
        middleware_by_name: &'a dyn Fn(&str) -> Option<Middleware>,
    ) -> Self {
        Self {
            handler_by_name,
            middleware_by_name,
            regexes: HashMap::new(),
        }
    }

    pub fn parse<R: Registrar>(&mut self, target: &mut R, map: &toml::Table) -> Result<(), RouteMapError> {
        let mut keys: Vec<&String> = map.keys().collect();
        keys.sort();

        for key in keys {
            self.parse_entry(target, key, &map[key.as_str()])?;
        }
        Ok(())
    }

    fn parse_entry<R: Registrar>(&mut self, target: &mut R, key: &str, value: &Value) -> Result<(), RouteMapError> {
        if key.starts_with('$') {
            return self.parse_keyword(target, key, value);
        }

        if let Some(caps) = ROUTE_KEY.captures(key) {
            let methods: Vec<Method> = caps[1]
                .split(',')
                .filter_map(|m| method(m.trim()))
                .collect();
            let path = caps.get(6).map_or("", |m| m.as_str());
            return self.parse_route(target, key, &methods, path, value);
        }

        match value {
            Value::Table(table) if GROUP_KEY.is_match(key) => {
                target.group(|scope| self.parse(scope, table))
            }
            Value::Table(table) => target.prefix(key, |scope| self.parse(scope, table)),
            other => {
                tracing::debug!(key, found = other.type_str(), "Route map entry ignored");
                Ok(())
            }
        }
    }

    fn parse_keyword<R: Registrar>(&mut self, target: &mut R, key: &str, value: &Value) -> Result<(), RouteMapError> {
        match key {
            "$where" => {
                let table = expect_table(key, value)?;
                for (param, pattern) in table {
                    let regex = self.regex(param, pattern)?;
                    target.where_regex(param, regex);
                }
            }
            "$use" => {
                let names: Vec<&str> = match value {
                    Value::String(name) => vec![name.as_str()],
                    Value::Array(items) => items
                        .iter()
                        .map(|item| expect_str(key, item))
                        .collect::<Result<_, _>>()?,
                    other => {
                        return Err(RouteMapError::UnexpectedType {
                            key: key.to_string(),
                            expected: "string or array",
                            found: other.type_str(),
                        })
                    }
                };

                for name in names {
                    match (self.middleware_by_name)(name) {
                        Some(middleware) => target.use_middleware(middleware),
                        None => tracing::warn!(name, "Unknown middleware in route map"),
                    }
                }
            }
            _ => tracing::debug!(key, "Unknown route map keyword ignored"),
        }
        Ok(())
    }

    fn parse_route<R: Registrar>(
        &mut self,
        target: &mut R,
        key: &str,
        methods: &[Method],
        path: &str,
        value: &Value,
    ) -> Result<(), RouteMapError> {
        let mut name = String::new();
        let mut conditions = Vec::new();

        match value {
            Value::String(s) => name = s.clone(),
            Value::Table(table) => {
                for (k, v) in table {
                    if k == "$name" {
                        name = expect_str(k, v)?.to_string();
                    } else if !k.starts_with('$') {
                        conditions.push((k.as_str(), self.regex(k, v)?));
                    }
                }
            }
            other => {
                return Err(RouteMapError::UnexpectedType {
                    key: key.to_string(),
                    expected: "string or table",
                    found: other.type_str(),
                })
            }
        }

        let mut route = target.route(path, methods);
        for (param, regex) in conditions {
            route = route.where_regex(param, regex);
        }
        if name.is_empty() {
            return Ok(());
        }

        let route = route.name(&name);
        match (self.handler_by_name)(&name) {
            Some(handler) => {
                let _ = route.handle(handler);
            }
            None => tracing::warn!(name = %name, "No handler for route map entry"),
        }
        Ok(())
    }

    fn regex(&mut self, param: &str, value: &Value) -> Result<Regex, RouteMapError> {
        let pattern = expect_str(param, value)?;
        if let Some(regex) = self.regexes.get(pattern) {
            return Ok(regex.clone());
        }

        let regex = Regex::new(pattern).map_err(|source| RouteMapError::InvalidRegex {
            param: param.to_string(),
            source,
        })?;
        self.regexes.insert(pattern.to_string(), regex.clone());
        Ok(regex)
    }
}

fn method(name: &str) -> Option<Method> {
    match name {
        "GET" => Some(Method::GET),
        "POST" => Some(Method::POST),
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        "OPTIONS" => Some(Method::OPTIONS),
        _ => None,
    }
}

fn expect_str<'v>(key: &str, value: &'v Value) -> Result<&'v str, RouteMapError> {
    value.as_str().ok_or_else(|| RouteMapError::UnexpectedType {
        key: key.to_string(),
        expected: "string",
        found: value.type_str(),
    })
}

fn expect_table<'v>(key: &str, value: &'v Value) -> Result<&'v toml::Table, RouteMapError> {
    value.as_table().ok_or_else(|| RouteMapError::UnexpectedType {
        key: key.to_string(),
        expected: "table",
        found: value.type_str(),
    })
}
