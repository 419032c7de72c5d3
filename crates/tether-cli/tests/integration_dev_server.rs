//! Integration tests for the development server.
//!
//! Requests go straight through the router, no socket involved.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use tether_cli::dev::{DevConfig, DevServer, DevServerState};
use tether_config::{MiddlewareKind, ServerConfig};
use tokio_stream::StreamExt;
use tower::ServiceExt;

const INDEX_HTML: &str = "<html><body><div id=\"app\"></div></body></html>";

fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let dist = temp.path().join("dist");
    fs::create_dir_all(&dist).unwrap();
    fs::write(dist.join("index.html"), INDEX_HTML).unwrap();
    fs::write(dist.join("main.css"), "body { margin: 0; }").unwrap();
    fs::write(dist.join("elm.js"), "var Elm = {};").unwrap();
    fs::write(dist.join("logo.png"), [0x89, b'P', b'N', b'G']).unwrap();
    temp
}

fn router_with(temp: &TempDir, server: ServerConfig) -> Router {
    let config = DevConfig::new(
        server,
        temp.path().to_path_buf(),
        "127.0.0.1:1337".parse().unwrap(),
    );
    DevServer::new(config, Arc::new(DevServerState::new()))
        .router()
        .unwrap()
}

fn router(temp: &TempDir) -> Router {
    router_with(temp, ServerConfig::default())
}

fn page_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::ACCEPT, "text/html,application/xhtml+xml,*/*;q=0.8")
        .body(Body::empty())
        .unwrap()
}

fn content_type(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_app_route_serves_entry_document() {
    let temp = project();
    let response = router(&temp)
        .oneshot(page_request(Method::GET, "/some/app/route"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "text/html; charset=UTF-8");

    let body = body_string(response).await;
    assert!(body.contains(r#"<div id="app">"#));
    assert!(body.contains(r#"<script src="/__tether__/reload.js"></script>"#));
}

#[tokio::test]
async fn test_root_serves_entry_document() {
    let temp = project();
    let response = router(&temp)
        .oneshot(page_request(Method::GET, "/"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "text/html; charset=UTF-8");
}

#[tokio::test]
async fn test_assets_get_corrected_content_type() {
    let temp = project();
    let app = router(&temp);

    let css = app
        .clone()
        .oneshot(page_request(Method::GET, "/main.css"))
        .await
        .unwrap();
    assert_eq!(css.status(), StatusCode::OK);
    assert_eq!(content_type(&css), "text/css; charset=UTF-8");
    assert_eq!(body_string(css).await, "body { margin: 0; }");

    let js = app
        .clone()
        .oneshot(page_request(Method::GET, "/elm.js"))
        .await
        .unwrap();
    assert_eq!(js.status(), StatusCode::OK);
    assert!(content_type(&js).ends_with("; charset=UTF-8"));

    let png = app
        .oneshot(page_request(Method::GET, "/logo.png"))
        .await
        .unwrap();
    assert_eq!(png.status(), StatusCode::OK);
    assert_eq!(content_type(&png), "image/png");
}

#[tokio::test]
async fn test_missing_file_with_extension_is_not_rewritten() {
    let temp = project();
    let response = router(&temp)
        .oneshot(page_request(Method::GET, "/missing.png"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_json_request_is_not_rewritten() {
    let temp = project();
    let request = Request::builder()
        .uri("/api/users")
        .header(header::ACCEPT, "application/json")
        .body(Body::empty())
        .unwrap();

    let response = router(&temp).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_is_not_rewritten() {
    let temp = project();
    let response = router(&temp)
        .oneshot(page_request(Method::POST, "/some/app/route"))
        .await
        .unwrap();

    assert!(!response.status().is_success());
}

#[tokio::test]
async fn test_head_is_rewritten_without_body() {
    let temp = project();
    let response = router(&temp)
        .oneshot(page_request(Method::HEAD, "/some/app/route"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(content_type(&response), "text/html; charset=UTF-8");
    assert!(body_string(response).await.is_empty());
}

#[tokio::test]
async fn test_reload_script_is_served() {
    let temp = project();
    let response = router(&temp)
        .oneshot(page_request(Method::GET, "/__tether__/reload.js"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("application/javascript"));
    assert!(body_string(response).await.contains("EventSource"));
}

#[tokio::test]
async fn test_events_stream_starts_with_connected() {
    let temp = project();
    let response = router(&temp)
        .oneshot(page_request(Method::GET, "/__tether__/events"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("text/event-stream"));

    let mut stream = response.into_body().into_data_stream();
    let chunk = stream.next().await.unwrap().unwrap();
    let frame = String::from_utf8(chunk.to_vec()).unwrap();
    assert!(frame.contains(r#""type":"connected""#), "{frame}");
}

#[tokio::test]
async fn test_reload_disabled_serves_plain_html() {
    let temp = project();
    let server = ServerConfig {
        reload: false,
        ..ServerConfig::default()
    };
    let app = router_with(&temp, server);

    let page = app
        .clone()
        .oneshot(page_request(Method::GET, "/some/app/route"))
        .await
        .unwrap();
    assert_eq!(body_string(page).await, INDEX_HTML);

    let script = app
        .oneshot(page_request(Method::GET, "/__tether__/reload.js"))
        .await
        .unwrap();
    assert_eq!(script.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_chain_serves_files_only() {
    let temp = project();
    let mut server = ServerConfig::default();
    server.server.middleware = vec![];
    server.reload = false;

    let response = router_with(&temp, server)
        .oneshot(page_request(Method::GET, "/some/app/route"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_fallback_without_content_type_stage() {
    let temp = project();
    let mut server = ServerConfig::default();
    server.server.middleware = vec![MiddlewareKind::HistoryApiFallback];
    server.reload = false;

    let response = router_with(&temp, server)
        .oneshot(page_request(Method::GET, "/some/app/route"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(content_type(&response).starts_with("text/html"));
}
