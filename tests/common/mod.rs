//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::{
    body::Body,
    http::{Method, Request, Response, StatusCode},
};
use scoped_router::{Handler, Params, RouterService};
use tokio::net::TcpListener;
use tower::ServiceExt;

/// Status, body and the response itself after sending one request.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
    pub response: Response<()>,
}

impl TestResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.response.headers().get(name).and_then(|v| v.to_str().ok())
    }
}

pub async fn send(service: &RouterService, method: Method, uri: &str) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send_request(service, request).await
}

pub async fn send_request(service: &RouterService, request: Request<Body>) -> TestResponse {
    let res = service.clone().oneshot(request).await.unwrap();
    let (parts, body) = res.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    TestResponse {
        status: parts.status,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
        response: Response::from_parts(parts, ()),
    }
}

/// Handler answering `"<label>: <name>=<value>,..."` with bound params in
/// placeholder order.
pub fn echo(label: &'static str) -> Handler {
    Handler::new(move |req: Request<Body>| async move {
        let params = Params::from_request(&req);
        let pairs: Vec<String> = params
            .iter()
            .map(|p| format!("{}={}", p.key, p.value))
            .collect();
        format!("{label}: {}", pairs.join(","))
    })
}

/// Serve `service` on an ephemeral local port.
pub async fn start_server(service: RouterService) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, service.into_axum()).await;
    });

    addr
}
