//! Process-wide route registries.
//!
//! # Data Flow
//! ```text
//! Scope::route(path, methods)
//!     → Route (pattern, names, condition snapshot, middleware snapshot)
//!     → registry.add_route
//!         → (method, compiled pattern) seen before? append to its candidates
//!         → otherwise create an endpoint and insert it into the matcher
//! ```
//!
//! # Design Decisions
//! - One registry per top-level router, shared by every scope in its tree
//! - Candidate lists are append-only; order is registration order
//! - An endpoint is inserted into the matcher exactly once per key
//! - Registration is single-threaded; `&mut` access enforces it

use std::collections::HashMap;
use std::fmt::Display;

use axum::http::Method;

use crate::http::handler::Handler;
use crate::http::response::{self, PanicHandler};
use crate::routing::error::{RouteError, UrlError};
use crate::routing::matcher::Matcher;
use crate::routing::route::{Route, RouteId};

/// One (method, compiled pattern) key and the routes sharing it.
pub(crate) struct Endpoint {
    pub method: Method,
    pub pattern: String,
    pub candidates: Vec<RouteId>,
}

/// Routes, disambiguation table, names, matcher and fallbacks of one router.
pub struct Registry {
    pub(crate) routes: Vec<Route>,
    pub(crate) endpoints: Vec<Endpoint>,
    pub(crate) by_key: HashMap<(Method, String), usize>,
    pub(crate) names: HashMap<String, RouteId>,
    pub(crate) matcher: Matcher,
    pub(crate) not_found: Handler,
    pub(crate) method_not_allowed: Handler,
    pub(crate) panic_handler: Option<PanicHandler>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            routes: Vec::new(),
            endpoints: Vec::new(),
            by_key: HashMap::new(),
            names: HashMap::new(),
            matcher: Matcher::new(),
            not_found: response::not_found(),
            method_not_allowed: response::method_not_allowed(),
            panic_handler: None,
        }
    }

    pub(crate) fn route(&self, id: RouteId) -> &Route {
        &self.routes[id.0]
    }

    pub(crate) fn route_mut(&mut self, id: RouteId) -> &mut Route {
        &mut self.routes[id.0]
    }

    /// Store `route` and file it under every one of its methods.
    ///
    /// # Panics
    /// If the matcher rejects the compiled pattern.
    pub(crate) fn add_route(&mut self, route: Route) -> RouteId {
        let id = RouteId(self.routes.len());
        let compiled = route.pattern.matcher_pattern();

        for method in &route.methods {
            let key = (method.clone(), compiled.clone());
            let endpoint = match self.by_key.get(&key) {
                Some(&endpoint) => endpoint,
                None => {
                    let endpoint = self.endpoints.len();
                    if let Err(source) = self.matcher.insert(method, &compiled, endpoint) {
                        panic!(
                            "{}",
                            RouteError::Conflict {
                                method: method.clone(),
                                pattern: compiled.clone(),
                                source,
                            }
                        );
                    }

                    tracing::debug!(
                        method = %method,
                        pattern = %compiled,
                        "Dispatch endpoint registered"
                    );
                    self.endpoints.push(Endpoint {
                        method: method.clone(),
                        pattern: compiled.clone(),
                        candidates: Vec::new(),
                    });
                    self.by_key.insert(key, endpoint);
                    endpoint
                }
            };
            self.endpoints[endpoint].candidates.push(id);
        }

        tracing::debug!(
            route = id.0,
            methods = ?route.methods,
            pattern = %route.pattern,
            "Route added"
        );
        self.routes.push(route);
        id
    }

    pub(crate) fn set_name(&mut self, name: &str, id: RouteId) {
        if let Some(previous) = self.names.insert(name.to_string(), id) {
            if previous != id {
                tracing::debug!(name, "Route name reassigned");
            }
        }
    }

    pub(crate) fn named(&self, name: &str) -> Option<&Route> {
        self.names.get(name).map(|id| self.route(*id))
    }

    /// Candidates registered for `method` and a compiled pattern.
    #[cfg(test)]
    pub(crate) fn candidates(&self, method: &Method, compiled: &str) -> &[RouteId] {
        self.by_key
            .get(&(method.clone(), compiled.to_string()))
            .map(|&endpoint| self.endpoints[endpoint].candidates.as_slice())
            .unwrap_or_default()
    }
}

/// Generate a URL for the route registered as `name`.
pub(crate) fn url_for(
    name: &str,
    route: Option<&Route>,
    params: &[&dyn Display],
) -> Result<String, UrlError> {
    let Some(route) = route else {
        tracing::warn!(name, "URL requested for unknown route");
        return Err(UrlError::RouteNotFound {
            name: name.to_string(),
        });
    };

    route.url(params).inspect_err(|err| {
        tracing::warn!(name, error = %err, "URL generation failed");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::middleware::MiddlewareChain;
    use crate::routing::conditions::Conditions;
    use crate::routing::pattern::Pattern;

    fn route(template: &str, methods: &[Method]) -> Route {
        Route::new(
            Pattern::new(template),
            methods.to_vec(),
            Conditions::new(),
            MiddlewareChain::new(),
        )
    }

    #[test]
    fn test_same_pattern_shares_endpoint() {
        let mut registry = Registry::new();
        let a = registry.add_route(route("/{id}", &[Method::GET]));
        let b = registry.add_route(route("/{name}", &[Method::GET]));

        assert_eq!(registry.endpoints.len(), 1);
        assert_eq!(registry.candidates(&Method::GET, "/:0"), &[a, b]);
    }

    #[test]
    fn test_multi_method_route() {
        let mut registry = Registry::new();
        let id = registry.add_route(route("/test/{id}", &[Method::GET, Method::POST]));

        assert_eq!(registry.endpoints.len(), 2);
        assert_eq!(registry.candidates(&Method::GET, "/test/:0"), &[id]);
        assert_eq!(registry.candidates(&Method::POST, "/test/:0"), &[id]);
        assert!(registry.candidates(&Method::PUT, "/test/:0").is_empty());
    }

    #[test]
    fn test_last_name_wins() {
        let mut registry = Registry::new();
        let a = registry.add_route(route("/a", &[Method::GET]));
        let b = registry.add_route(route("/b", &[Method::GET]));

        registry.set_name("page", a);
        registry.set_name("page", b);
        assert_eq!(registry.named("page").unwrap().pattern().as_str(), "/b");
    }

    #[test]
    fn test_url_for_unknown_name() {
        let registry = Registry::new();
        assert_eq!(
            url_for("unknown.name", registry.named("unknown.name"), &[]),
            Err(UrlError::RouteNotFound { name: "unknown.name".into() })
        );
    }

    #[test]
    #[should_panic(expected = "cannot register")]
    fn test_matcher_conflict_panics() {
        let mut registry = Registry::new();
        registry.add_route(route("/files/{path...}", &[Method::GET]));
        registry.add_route(route("/files/{path...}/x", &[Method::GET]));
    }
}
