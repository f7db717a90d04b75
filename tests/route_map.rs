//! Routes declared through a route map.

use axum::http::{Method, StatusCode};
use scoped_router::{Middleware, Registrar, Router};

mod common;
use common::send;

const ROUTES: &str = r#"
"GET /" = "pages.main"

["(group name)"]
"$use" = "test"
"GET, POST /test/{id}" = { "$name" = "pages.test", id = '^\d+$' }

["/api"]
"$use" = "test"
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

fn middleware_by_name(name: &str) -> Option<Middleware> {
    match name {
        "test" => Some(Middleware::from_fn(
            |req: axum::http::Request<axum::body::Body>, next: scoped_router::Handler| async move {
                let mut res = next.call(req).await;
                res.headers_mut()
                    .insert("x-test", axum::http::HeaderValue::from_static("OK"));
                res
            },
        )),
        _ => None,
    }
}

fn build() -> scoped_router::RouterService {
    let table: toml::Table = toml::from_str(ROUTES).unwrap();
    let mut router = Router::new();
    router
        .parse_map(&table, |name| Some(common::echo(route_name(name))), middleware_by_name)
        .unwrap();
    router.into_service()
}

/// Leak the route name so it can label the echo handler.
fn route_name(name: &str) -> &'static str {
    Box::leak(name.to_string().into_boxed_str())
}

#[tokio::test]
async fn test_root_route_without_middleware() {
    let service = build();

    let res = send(&service, Method::GET, "/").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.header("x-test"), None);
    assert_eq!(res.body, "pages.main: ");
}

#[tokio::test]
async fn test_scoped_routes() {
    let service = build();

    let cases = [
        (Method::GET, "/test/111", "pages.test: id=111"),
        (Method::POST, "/test/111", "pages.test: id=111"),
        (Method::GET, "/api", "api.index: "),
        (Method::GET, "/api/articles", "articles.index: "),
        (Method::POST, "/api/articles", "articles.create: "),
        (Method::GET, "/api/articles/111", "articles.get: id=111"),
        (Method::PUT, "/api/articles/111", "articles.update: id=111"),
        (Method::DELETE, "/api/articles/111", "articles.delete: id=111"),
    ];

    for (method, uri, body) in cases {
        let res = send(&service, method.clone(), uri).await;
        assert_eq!(res.status, StatusCode::OK, "{method} {uri}");
        assert_eq!(res.header("x-test"), Some("OK"), "{method} {uri}");
        assert_eq!(res.body, body, "{method} {uri}");
    }
}

#[tokio::test]
async fn test_conditions_from_map() {
    let service = build();

    assert_eq!(
        send(&service, Method::GET, "/api/articles/abc").await.status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        send(&service, Method::GET, "/test/abc").await.status,
        StatusCode::NOT_FOUND
    );
}

#[test]
fn test_names_from_map() {
    let table: toml::Table = toml::from_str(ROUTES).unwrap();
    let mut router = Router::new();
    router.parse_map(&table, |_| None, middleware_by_name).unwrap();

    assert_eq!(router.url("articles.update", &[&9]).unwrap(), "/api/articles/9");
    assert_eq!(router.url("pages.test", &[&1]).unwrap(), "/test/1");
    assert!(router.url("articles.update", &[&"x"]).is_err());
}

#[test]
fn test_json_route_map() {
    let table: toml::Table = serde_json::from_str(
        r#"{
            "/v1": {
                "$where": {},
                "GET /ping": "ping"
            }
        }"#,
    )
    .unwrap();

    let mut router = Router::new();
    router.parse_map(&table, |_| None, |_| None).unwrap();
    assert_eq!(router.url("ping", &[]).unwrap(), "/v1/ping");
}
