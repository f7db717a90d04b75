//! Scoped router demo server.
//!
//! Builds a router from a route map, answers every route with an echo of
//! its name and bound parameters, and serves it over HTTP.
//!
//! ```text
//!     Client Request
//!     ──────────────▶ axum::serve ─▶ TraceLayer ─▶ RouterService
//!                                                     │
//!                                    request_id ◀─────┤ (route middleware)
//!                                                     ▼
//!                                              echo handler
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use axum::{body::Body, http::Request};
use clap::Parser;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use scoped_router::config::{load_config, load_route_map, AppConfig};
use scoped_router::http::{request_id, Handler, Middleware, Params, RequestIdExt};
use scoped_router::observability::{logging, metrics};
use scoped_router::{Registrar, Router};

/// Route map used when neither the CLI nor the config names one.
const DEFAULT_ROUTE_MAP: &str = r#"
"GET /" = "pages.main"

["(pages)"]
"$use" = "request_id"
"GET, POST /test/{id}" = { "$name" = "pages.test", id = '^\d+$' }

["/api"]
"$use" = "request_id"
GET = "api.index"

["/api"."/articles"]
GET = "articles.index"
POST = "articles.create"

["/api"."/articles"."/{id}"]
"$where" = { id = '^\d+$' }
GET = "articles.get"
PUT = "articles.update"
DELETE = "articles.delete"
"#;

#[derive(Parser)]
#[command(name = "scoped-router")]
#[command(about = "Serve a route map with echo handlers", long_about = None)]
struct Cli {
    /// Configuration file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Route map file (.toml or .json); overrides the config.
    #[arg(short, long)]
    route_map: Option<PathBuf>,

    /// Bind address; overrides the config.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(Some(config.observability.log_level.as_str()))?;
    tracing::info!("scoped-router v{} starting", env!("CARGO_PKG_VERSION"));

    let route_map_path = cli.route_map.or_else(|| config.route_map.as_ref().map(PathBuf::from));
    let route_map = match &route_map_path {
        Some(path) => load_route_map(path)?,
        None => toml::from_str(DEFAULT_ROUTE_MAP)?,
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        route_map = ?route_map_path,
        redirect_trailing_slash = config.router.redirect_trailing_slash,
        handle_method_not_allowed = config.router.handle_method_not_allowed,
        handle_options = config.router.handle_options,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let mut router = Router::with_config(config.router.clone());
    router.parse_map(&route_map, |name| Some(echo(name)), middleware_by_name)?;
    let app = router.into_service().into_axum().layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn middleware_by_name(name: &str) -> Option<Middleware> {
    match name {
        "request_id" => Some(request_id()),
        _ => None,
    }
}

/// Answer with the route name, bound parameters and request ID.
fn echo(name: &str) -> Handler {
    let name = name.to_string();
    Handler::new(move |req: Request<Body>| {
        let params: BTreeMap<String, String> = Params::from_request(&req).to_map().into_iter().collect();
        let request_id = req.request_id().map(|id| id.0.clone());
        let name = name.clone();
        async move {
            match request_id {
                Some(id) => format!("route: {name}, params: {params:?}, request: {id}\n"),
                None => format!("route: {name}, params: {params:?}\n"),
            }
        }
    })
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for Ctrl+C");
        return;
    }
    tracing::info!("Shutdown signal received");
}
