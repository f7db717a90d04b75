//! Route records, their builder, and reverse URL generation.
//!
//! # Responsibilities
//! - Hold the full pattern, parameter names and condition snapshot of a route
//! - Attach per-parameter conditions, a name and a handler while building
//! - Generate URLs from positional values
//!
//! # Design Decisions
//! - Route identity is its position in the registry, never its content
//! - Conditions see values as the caller gave them; the URL carries them
//!   percent-encoded, and dispatch decodes them back
//! - Conditions use one index space across prefix and route placeholders
//! - A route without a handler is skipped during dispatch, not an error

use std::fmt::Display;
use std::future::Future;

use axum::{body::Body, http::Method, http::Request, response::IntoResponse};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use regex::Regex;

use crate::http::handler::Handler;
use crate::http::middleware::MiddlewareChain;
use crate::routing::conditions::{Condition, Conditions};
use crate::routing::error::{RouteError, UrlError};
use crate::routing::pattern::{Pattern, Placeholder};
use crate::routing::registry::Registry;

/// Characters escaped in a value spanning several path segments.
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Characters escaped in a single path segment.
const SEGMENT: &AsciiSet = &PATH.add(b'/');

/// Handle to a route inside its [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteId(pub(crate) usize);

/// A registered route.
#[derive(Debug, Clone)]
pub struct Route {
    pub(crate) methods: Vec<Method>,
    pub(crate) pattern: Pattern,
    pub(crate) placeholders: Vec<Placeholder>,
    pub(crate) param_names: Vec<String>,
    pub(crate) conditions: Conditions,
    pub(crate) middleware: MiddlewareChain,
    pub(crate) handler: Option<Handler>,
}

impl Route {
    pub(crate) fn new(
        pattern: Pattern,
        methods: Vec<Method>,
        conditions: Conditions,
        middleware: MiddlewareChain,
    ) -> Self {
        let placeholders = pattern.placeholders();
        let param_names = placeholders.iter().map(|p| p.name.clone()).collect();
        Self {
            methods,
            pattern,
            placeholders,
            param_names,
            conditions,
            middleware,
            handler: None,
        }
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Set the condition for the placeholder called `param`.
    ///
    /// # Panics
    /// If `param` is not one of this route's placeholders.
    pub(crate) fn set_condition(&mut self, param: &str, condition: Condition) {
        let Some(index) = self.param_names.iter().position(|n| n == param) else {
            panic!(
                "{}",
                RouteError::UnknownParameter {
                    name: param.to_string(),
                    pattern: self.pattern.to_string(),
                }
            );
        };
        self.conditions.set(index, condition);
    }

    /// Build a URL from positional values.
    ///
    /// Every value is checked against the condition at its position, then
    /// percent-encoded. Values beyond the placeholder count are appended as
    /// extra path segments.
    pub fn url(&self, params: &[&dyn Display]) -> Result<String, UrlError> {
        let expected = self.placeholders.len();
        if params.len() < expected {
            return Err(UrlError::NotEnoughParameters {
                given: params.len(),
                expected,
            });
        }

        let values: Vec<String> = params.iter().map(|p| p.to_string()).collect();
        for (index, value) in values.iter().enumerate() {
            if let Some(condition) = self.conditions.get(index) {
                if !condition.check(value) {
                    return Err(UrlError::InvalidParameter {
                        value: value.clone(),
                    });
                }
            }
        }

        let encoded: Vec<String> = values[..expected]
            .iter()
            .zip(&self.placeholders)
            .map(|(value, placeholder)| {
                let set = if placeholder.remainder { PATH } else { SEGMENT };
                utf8_percent_encode(value, set).to_string()
            })
            .collect();

        // TODO: decide whether trailing extras should be validated or rejected
        let mut url = self.pattern.substitute(&encoded);
        for extra in &values[expected..] {
            url.push('/');
            url.extend(utf8_percent_encode(extra, SEGMENT));
        }
        Ok(url)
    }
}

/// Chainable builder returned when a route is created.
#[must_use = "a route builder does nothing unless configured"]
pub struct RouteBuilder<'a> {
    registry: &'a mut Registry,
    id: RouteId,
}

impl<'a> RouteBuilder<'a> {
    pub(crate) fn new(registry: &'a mut Registry, id: RouteId) -> Self {
        Self { registry, id }
    }

    pub fn id(&self) -> RouteId {
        self.id
    }

    pub fn route(&self) -> &Route {
        self.registry.route(self.id)
    }

    /// Require `param` to match `regex`.
    ///
    /// # Panics
    /// If `param` is not a placeholder of this route.
    pub fn where_regex(self, param: &str, regex: Regex) -> Self {
        self.where_condition(param, Condition::regex(regex))
    }

    /// Require `param` to satisfy `f`.
    ///
    /// # Panics
    /// If `param` is not a placeholder of this route.
    pub fn where_fn<F>(self, param: &str, f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.where_condition(param, Condition::new(f))
    }

    fn where_condition(self, param: &str, condition: Condition) -> Self {
        self.registry.route_mut(self.id).set_condition(param, condition);
        self
    }

    /// Register this route under `name`; a later route with the same name
    /// replaces it.
    pub fn name(self, name: &str) -> Self {
        self.registry.set_name(name, self.id);
        self
    }

    pub fn handle(self, handler: Handler) -> Self {
        self.registry.route_mut(self.id).handler = Some(handler);
        self
    }

    pub fn handle_fn<F, Fut, R>(self, f: F) -> Self
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        self.handle(Handler::new(f))
    }

    pub fn url(&self, params: &[&dyn Display]) -> Result<String, UrlError> {
        self.route().url(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits() -> Condition {
        Condition::regex(Regex::new(r"^\d+$").unwrap())
    }

    fn route(template: &str) -> Route {
        Route::new(
            Pattern::new(template),
            vec![Method::GET],
            Conditions::new(),
            MiddlewareChain::new(),
        )
    }

    #[test]
    fn test_url() {
        let route = route("/users/{userId}/articles/{articleId}");
        assert_eq!(route.url(&[&111, &222]).unwrap(), "/users/111/articles/222");
        assert_eq!(route.url(&[&"a", &"b"]).unwrap(), "/users/a/articles/b");
    }

    #[test]
    fn test_url_not_enough_parameters() {
        let route = route("/articles/{id}");
        assert_eq!(
            route.url(&[]),
            Err(UrlError::NotEnoughParameters { given: 0, expected: 1 })
        );
    }

    #[test]
    fn test_url_invalid_parameter() {
        let mut route = route("/articles/{id}");
        route.set_condition("id", digits());

        assert_eq!(route.url(&[&111]).unwrap(), "/articles/111");
        assert_eq!(
            route.url(&[&"abc"]),
            Err(UrlError::InvalidParameter { value: "abc".to_string() })
        );
    }

    #[test]
    fn test_url_extra_values_become_segments() {
        let route = route("/files/{dir}");
        assert_eq!(route.url(&[&"docs", &"a", &1]).unwrap(), "/files/docs/a/1");
    }

    #[test]
    fn test_url_remainder_placeholder() {
        let route = route("/static/{path...}");
        assert_eq!(route.url(&[&"css/site.css"]).unwrap(), "/static/css/site.css");
    }

    #[test]
    fn test_url_encodes_values() {
        let files = route("/static/{path...}");
        assert_eq!(files.url(&[&"a b/c%d"]).unwrap(), "/static/a%20b/c%25d");
        assert_eq!(files.url(&[&"x", &"1/2"]).unwrap(), "/static/x/1%2F2");

        let mut article = route("/articles/{title}");
        article.set_condition("title", Condition::regex(Regex::new(r"^[a-z ]+$").unwrap()));
        assert_eq!(article.url(&[&"a b"]).unwrap(), "/articles/a%20b");
        assert_eq!(article.url(&[&"a/b"]), Err(UrlError::InvalidParameter { value: "a/b".into() }));
    }

    #[test]
    #[should_panic(expected = "unknown parameter: name")]
    fn test_unknown_parameter_panics() {
        let mut route = route("/articles/{id}");
        route.set_condition("name", digits());
    }
}
