//! Top-level router: the root registration scope.
//!
//! # Responsibilities
//! - Own the registry shared by every nested scope
//! - Carry the root scope's prefix, conditions and middleware
//! - Freeze into a [`RouterService`] once registration is done
//!
//! # Design Decisions
//! - Registration takes `&mut self`; serving takes an immutable snapshot
//! - Two routers never share state; there is no process-wide default
//! - Behavior switches come from [`RouterConfig`], not globals

use crate::config::schema::RouterConfig;
use crate::observability::metrics;
use crate::routing::dispatch::RouterService;
use crate::routing::registry::Registry;
use crate::routing::scope::{Registrar, ScopeState};

/// Root of a route tree.
pub struct Router {
    registry: Registry,
    scope: ScopeState,
    config: RouterConfig,
}

impl Router {
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            registry: Registry::new(),
            scope: ScopeState::new(),
            config,
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Number of routes registered so far.
    pub fn route_count(&self) -> usize {
        self.registry.routes.len()
    }

    /// Freeze the route tree into a cloneable request handler.
    pub fn into_service(self) -> RouterService {
        tracing::info!(
            routes = self.registry.routes.len(),
            endpoints = self.registry.endpoints.len(),
            names = self.registry.names.len(),
            "Router frozen"
        );
        metrics::record_route_count(self.registry.routes.len());
        RouterService::build(self.registry, self.config)
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Registrar for Router {
    fn parts(&mut self) -> (&mut Registry, &mut ScopeState) {
        (&mut self.registry, &mut self.scope)
    }

    fn registry(&self) -> &Registry {
        &self.registry
    }

    fn state(&self) -> &ScopeState {
        &self.scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::error::UrlError;
    use regex::Regex;

    #[test]
    fn test_url_from_root_after_nested_registration() {
        let mut router = Router::new();
        router.prefix("/users/{userId}", |users| {
            users.where_regex("userId", Regex::new(r"^\d+$").unwrap());
            users.prefix("/articles", |articles| {
                let _ = articles
                    .get("/{articleId}")
                    .where_regex("articleId", Regex::new(r"^\d+$").unwrap())
                    .name("user.article");
            });
        });

        assert_eq!(
            router.url("user.article", &[&111, &222]).unwrap(),
            "/users/111/articles/222"
        );
        assert_eq!(
            router.url("user.article", &[&"abc", &222]),
            Err(UrlError::InvalidParameter { value: "abc".into() })
        );
    }

    #[test]
    fn test_routers_are_independent() {
        let mut a = Router::new();
        let b = Router::new();
        let _ = a.get("/x").name("x");

        assert!(a.url("x", &[]).is_ok());
        assert_eq!(b.url("x", &[]), Err(UrlError::RouteNotFound { name: "x".into() }));
        assert_eq!(a.route_count(), 1);
        assert_eq!(b.route_count(), 0);
    }

    #[test]
    fn test_default_config() {
        let router = Router::default();
        assert!(router.config().redirect_trailing_slash);
        assert!(router.config().handle_method_not_allowed);
    }
}
