//! Request dispatch over a frozen route tree.
//!
//! # Data Flow
//! ```text
//! Request (method, path)
//!     → matcher lookup
//!         Found        → endpoint handler (middleware every candidate shares)
//!                          → captures percent-decoded, slashes trimmed
//!                          → candidate scan: first route whose conditions
//!                            accept the captures wins
//!                          → route handler (the rest of its own chain)
//!                          → no candidate accepts: not-found handler
//!         TrailingSlash → redirect, when enabled
//!         NotFound     → OPTIONS: 200 with `Allow`, when enabled
//!                      → 405 if another method accepts the path, else 404
//! ```
//!
//! # Design Decisions
//! - Built once from the registry; immutable and lock-free while serving
//! - Captured values travel to the candidate scan in a request extension
//! - A route never runs middleware it did not inherit, even when it shares a
//!   compiled pattern with routes from sibling scopes
//! - Panics are only caught when a panic handler was registered

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt::Display;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
};
use futures_util::future::{BoxFuture, FutureExt};
use percent_encoding::percent_decode_str;
use tower::Service;

use crate::config::schema::RouterConfig;
use crate::http::handler::{Handler, HandlerFuture};
use crate::http::middleware::MiddlewareChain;
use crate::http::params::Params;
use crate::http::response::{self, AllowedMethods, PanicHandler, PanicReport};
use crate::observability::metrics::{self, DispatchOutcome};
use crate::routing::error::UrlError;
use crate::routing::matcher::{Lookup, Matcher};
use crate::routing::registry::{url_for, Registry};
use crate::routing::route::Route;

/// Raw captures of the matched endpoint, in placeholder order.
#[derive(Clone)]
struct Captures(Vec<String>);

/// A route able to answer for an endpoint.
struct Candidate {
    route: Arc<Route>,
    handler: Handler,
}

struct Inner {
    matcher: Matcher,
    endpoints: Vec<Handler>,
    not_found: Handler,
    method_not_allowed: Handler,
    panic_handler: Option<PanicHandler>,
    names: HashMap<String, Arc<Route>>,
    config: RouterConfig,
}

/// Immutable, cloneable request handler produced by
/// [`Router::into_service`](crate::routing::router::Router::into_service).
#[derive(Clone)]
pub struct RouterService {
    inner: Arc<Inner>,
}

impl RouterService {
    pub(crate) fn build(registry: Registry, config: RouterConfig) -> Self {
        let Registry {
            routes,
            endpoints,
            names,
            matcher,
            not_found,
            method_not_allowed,
            panic_handler,
            ..
        } = registry;

        let routes: Vec<Arc<Route>> = routes.into_iter().map(Arc::new).collect();

        let endpoints = endpoints
            .into_iter()
            .map(|endpoint| {
                let shared = shared_middleware(
                    endpoint.candidates.iter().map(|id| &routes[id.0].middleware),
                );

                let candidates: Arc<[Candidate]> = endpoint
                    .candidates
                    .iter()
                    .filter_map(|id| {
                        let route = &routes[id.0];
                        let handler = route.handler.clone()?;
                        let extra = route.middleware.remaining_after(&shared);
                        Some(Candidate {
                            route: route.clone(),
                            handler: extra.wrap(handler),
                        })
                    })
                    .collect();

                if candidates.is_empty() {
                    tracing::warn!(
                        method = %endpoint.method,
                        pattern = %endpoint.pattern,
                        "Endpoint has no route with a handler"
                    );
                }

                shared.wrap(select_candidate(candidates, not_found.clone()))
            })
            .collect();

        let names = names
            .into_iter()
            .map(|(name, id)| (name, routes[id.0].clone()))
            .collect();

        Self {
            inner: Arc::new(Inner {
                matcher,
                endpoints,
                not_found,
                method_not_allowed,
                panic_handler,
                names,
                config,
            }),
        }
    }

    /// Dispatch one request.
    pub fn handle(&self, req: Request<Body>) -> HandlerFuture {
        let inner = self.inner.clone();
        let Some(on_panic) = inner.panic_handler.clone() else {
            return Box::pin(async move { inner.dispatch(req).await });
        };

        let method = req.method().clone();
        let uri = req.uri().clone();
        Box::pin(async move {
            match AssertUnwindSafe(inner.dispatch(req)).catch_unwind().await {
                Ok(res) => res,
                Err(payload) => {
                    let report = PanicReport {
                        method,
                        uri,
                        payload,
                    };
                    tracing::error!(
                        method = %report.method,
                        uri = %report.uri,
                        message = report.message().unwrap_or("<non-string payload>"),
                        "Handler panicked"
                    );
                    metrics::record_dispatch(DispatchOutcome::Panic);
                    on_panic(report)
                }
            }
        })
    }

    /// Generate a URL for the route registered as `name`.
    pub fn url(&self, name: &str, params: &[&dyn Display]) -> Result<String, UrlError> {
        url_for(name, self.inner.names.get(name).map(Arc::as_ref), params)
    }

    pub fn config(&self) -> &RouterConfig {
        &self.inner.config
    }

    /// Mount as the fallback of an empty axum router.
    pub fn into_axum(self) -> axum::Router {
        axum::Router::new().fallback_service(self)
    }
}

impl Inner {
    async fn dispatch(&self, mut req: Request<Body>) -> Response {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        match self.matcher.lookup(&method, &path) {
            Lookup::Found { endpoint, values } => {
                req.extensions_mut().insert(Captures(values));
                self.endpoints[endpoint].call(req).await
            }
            Lookup::TrailingSlash(location)
                if self.config.redirect_trailing_slash
                    && method != Method::CONNECT
                    && path != "/" =>
            {
                tracing::debug!(%method, %path, %location, "Trailing slash redirect");
                metrics::record_dispatch(DispatchOutcome::Redirect);
                response::redirect(&method, req.uri(), &location)
            }
            _ => self.fallback(req, &method, &path).await,
        }
    }

    async fn fallback(&self, mut req: Request<Body>, method: &Method, path: &str) -> Response {
        if *method == Method::OPTIONS && self.config.handle_options {
            let mut allowed = self.matcher.allowed(path, method);
            if !allowed.is_empty() {
                allowed.push(Method::OPTIONS);
                allowed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
                tracing::debug!(path, ?allowed, "Automatic OPTIONS response");
                metrics::record_dispatch(DispatchOutcome::Options);
                return response::options(&AllowedMethods(allowed));
            }
        }

        if self.config.handle_method_not_allowed {
            let allowed = self.matcher.allowed(path, method);
            if !allowed.is_empty() {
                tracing::debug!(%method, path, ?allowed, "Method not allowed");
                metrics::record_dispatch(DispatchOutcome::MethodNotAllowed);
                req.extensions_mut().insert(AllowedMethods(allowed));
                return self.method_not_allowed.call(req).await;
            }
        }

        tracing::debug!(%method, path, "No route matched");
        metrics::record_dispatch(DispatchOutcome::NotFound);
        self.not_found.call(req).await
    }
}

/// Middleware at the front of every chain in `chains`, by identity.
fn shared_middleware<'a>(mut chains: impl Iterator<Item = &'a MiddlewareChain>) -> MiddlewareChain {
    let Some(first) = chains.next() else {
        return MiddlewareChain::new();
    };
    chains.fold(first.clone(), |shared, chain| shared.shared_prefix(chain))
}

/// Innermost handler of an endpoint: picks the first candidate whose
/// conditions accept the captured values.
fn select_candidate(candidates: Arc<[Candidate]>, not_found: Handler) -> Handler {
    Handler::new(move |mut req: Request<Body>| {
        let candidates = candidates.clone();
        let not_found = not_found.clone();
        async move {
            let values: Vec<String> = req
                .extensions_mut()
                .remove::<Captures>()
                .map(|captures| captures.0)
                .unwrap_or_default()
                .into_iter()
                .map(|value| {
                    percent_decode_str(&value)
                        .decode_utf8_lossy()
                        .trim_matches('/')
                        .to_string()
                })
                .collect();

            let Some(candidate) = candidates
                .iter()
                .find(|c| c.route.conditions.match_all(&values))
            else {
                tracing::debug!(path = %req.uri().path(), "Conditions rejected every route");
                metrics::record_dispatch(DispatchOutcome::NotFound);
                return not_found.call(req).await;
            };

            tracing::trace!(pattern = %candidate.route.pattern, "Route selected");
            metrics::record_dispatch(DispatchOutcome::Matched);
            if !candidate.route.param_names.is_empty() {
                req.extensions_mut()
                    .insert(Params::bind(&candidate.route.param_names, &values));
            }
            candidate.handler.call(req).await
        }
    })
}

impl Service<Request<Body>> for RouterService {
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let fut = self.handle(req);
        Box::pin(async move { Ok(fut.await) })
    }
}
