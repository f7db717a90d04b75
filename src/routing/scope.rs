//! Scoped route registration.
//!
//! # Data Flow
//! ```text
//! Router (root scope)
//!     → group(f)          snapshot prefix/conditions/middleware, run f
//!     → prefix(path, f)   snapshot, extend prefix, run f
//!     → get/post/route    build Route from the current snapshot
//! ```
//!
//! # Design Decisions
//! - Child scopes copy their parent's state; edits never flow back up or
//!   across to siblings
//! - The registry is shared by every scope, so names registered anywhere are
//!   visible from the root
//! - A route captures the scope's conditions and middleware at creation;
//!   later scope edits do not reach it
//! - Unknown parameter names in conditions are setup bugs and panic

use std::fmt::Display;

use axum::{http::Method, response::Response};
use regex::Regex;

use crate::config::route_map::{RouteMapError, RouteMapParser};
use crate::http::handler::Handler;
use crate::http::middleware::{Middleware, MiddlewareChain};
use crate::http::response::PanicReport;
use crate::routing::conditions::{Condition, Conditions};
use crate::routing::error::{RouteError, UrlError};
use crate::routing::pattern::Pattern;
use crate::routing::registry::{url_for, Registry};
use crate::routing::route::{Route, RouteBuilder};

/// Accumulated prefix, conditions and middleware of one scope.
#[derive(Debug, Clone, Default)]
pub struct ScopeState {
    prefix: Pattern,
    conditions: Conditions,
    middleware: MiddlewareChain,
}

impl ScopeState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Snapshot for a child scope, optionally extending the prefix.
    fn branch(&self, path: &str) -> Self {
        Self {
            prefix: &self.prefix + path,
            conditions: self.conditions.clone(),
            middleware: self.middleware.clone(),
        }
    }

    pub fn prefix(&self) -> &Pattern {
        &self.prefix
    }

    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    pub fn middleware(&self) -> &MiddlewareChain {
        &self.middleware
    }
}

/// A nested registration context handed out by [`Registrar::group`] and
/// [`Registrar::prefix`].
pub struct Scope<'r> {
    registry: &'r mut Registry,
    state: &'r mut ScopeState,
}

impl Registrar for Scope<'_> {
    fn parts(&mut self) -> (&mut Registry, &mut ScopeState) {
        (&mut *self.registry, &mut *self.state)
    }

    fn registry(&self) -> &Registry {
        &*self.registry
    }

    fn state(&self) -> &ScopeState {
        &*self.state
    }
}

/// Route registration API shared by the root router and nested scopes.
pub trait Registrar: Sized {
    #[doc(hidden)]
    fn parts(&mut self) -> (&mut Registry, &mut ScopeState);

    #[doc(hidden)]
    fn registry(&self) -> &Registry;

    /// Prefix, conditions and middleware currently in effect.
    fn state(&self) -> &ScopeState;

    /// Register routes in an isolated child scope.
    fn group<T>(&mut self, f: impl FnOnce(&mut Scope<'_>) -> T) -> T {
        self.prefix("", f)
    }

    /// Register routes in a child scope whose prefix is extended by `path`.
    /// The prefix may contain placeholders.
    fn prefix<T>(&mut self, path: &str, f: impl FnOnce(&mut Scope<'_>) -> T) -> T {
        let (registry, state) = self.parts();
        let mut child = state.branch(path);
        f(&mut Scope {
            registry,
            state: &mut child,
        })
    }

    /// Append middleware for routes created later in this scope.
    fn use_middleware(&mut self, middleware: Middleware) {
        let (_, state) = self.parts();
        state.middleware.append([middleware]);
    }

    /// Require the prefix parameter `param` to match `regex`.
    ///
    /// # Panics
    /// If `param` is not a placeholder of this scope's prefix.
    fn where_regex(&mut self, param: &str, regex: Regex) {
        self.where_condition(param, Condition::regex(regex));
    }

    /// Require the prefix parameter `param` to satisfy `f`.
    ///
    /// # Panics
    /// If `param` is not a placeholder of this scope's prefix.
    fn where_fn<F>(&mut self, param: &str, f: F)
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.where_condition(param, Condition::new(f));
    }

    #[doc(hidden)]
    fn where_condition(&mut self, param: &str, condition: Condition) {
        let (_, state) = self.parts();
        let Some(index) = state.prefix.param_index(param) else {
            panic!(
                "{}",
                RouteError::UnknownParameter {
                    name: param.to_string(),
                    pattern: state.prefix.to_string(),
                }
            );
        };
        state.conditions.set(index, condition);
    }

    /// Create a route for `prefix + path` answering `methods`.
    ///
    /// # Panics
    /// If the path matcher rejects the compiled pattern.
    fn route(&mut self, path: &str, methods: &[Method]) -> RouteBuilder<'_> {
        let (registry, state) = self.parts();
        let route = Route::new(
            &state.prefix + path,
            methods.to_vec(),
            state.conditions.clone(),
            state.middleware.clone(),
        );
        let id = registry.add_route(route);
        RouteBuilder::new(registry, id)
    }

    fn get(&mut self, path: &str) -> RouteBuilder<'_> {
        self.route(path, &[Method::GET])
    }

    fn post(&mut self, path: &str) -> RouteBuilder<'_> {
        self.route(path, &[Method::POST])
    }

    fn put(&mut self, path: &str) -> RouteBuilder<'_> {
        self.route(path, &[Method::PUT])
    }

    fn patch(&mut self, path: &str) -> RouteBuilder<'_> {
        self.route(path, &[Method::PATCH])
    }

    fn delete(&mut self, path: &str) -> RouteBuilder<'_> {
        self.route(path, &[Method::DELETE])
    }

    fn options(&mut self, path: &str) -> RouteBuilder<'_> {
        self.route(path, &[Method::OPTIONS])
    }

    /// Generate a URL for the route registered as `name`.
    fn url(&self, name: &str, params: &[&dyn Display]) -> Result<String, UrlError> {
        let registry = self.registry();
        url_for(name, registry.named(name), params)
    }

    /// Handler for requests no route accepts, wrapped in this scope's
    /// middleware.
    fn handle_not_found(&mut self, handler: Handler) {
        let (registry, state) = self.parts();
        registry.not_found = state.middleware.wrap(handler);
    }

    /// Handler for paths that exist under other methods, wrapped in this
    /// scope's middleware.
    fn handle_method_not_allowed(&mut self, handler: Handler) {
        let (registry, state) = self.parts();
        registry.method_not_allowed = state.middleware.wrap(handler);
    }

    /// Recover from handler panics with `f`.
    fn handle_panic<F>(&mut self, f: F)
    where
        F: Fn(PanicReport) -> Response + Send + Sync + 'static,
    {
        let (registry, _) = self.parts();
        registry.panic_handler = Some(std::sync::Arc::new(f));
    }

    /// Register routes described by a route map table.
    fn parse_map<H, M>(
        &mut self,
        map: &toml::Table,
        handler_by_name: H,
        middleware_by_name: M,
    ) -> Result<(), RouteMapError>
    where
        H: Fn(&str) -> Option<Handler>,
        M: Fn(&str) -> Option<Middleware>,
    {
        RouteMapParser::new(&handler_by_name, &middleware_by_name).parse(self, map)
    }
}
