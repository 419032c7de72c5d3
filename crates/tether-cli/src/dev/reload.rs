//! Browser reload channel.
//!
//! Browsers subscribe over Server-Sent Events; HTML responses get a script
//! tag injected that opens the subscription.

use crate::dev::{ReloadEvent, SharedState};
use axum::{
    body::{Body, to_bytes},
    extract::{Request, State},
    http::{Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response, Sse, sse::Event, sse::KeepAlive},
};
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::{Stream, StreamExt, wrappers::ReceiverStream};

/// SSE endpoint browsers subscribe to.
pub const EVENTS_PATH: &str = "/__tether__/events";

/// Reload client script path.
pub const SCRIPT_PATH: &str = "/__tether__/reload.js";

const RELOAD_SCRIPT: &str = include_str!("../../assets/reload-client.js");

/// Largest HTML document the snippet is injected into.
const MAX_INJECT_BYTES: usize = 16 * 1024 * 1024;

/// Handle SSE connections for reload events.
pub async fn handle_events(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (id, rx) = state.register_client();
    tracing::debug!(client = id, "reload client connected");

    state.send_to(id, &ReloadEvent::Connected { id }).await;

    let stream = ReceiverStream::new(rx).map(|data| Ok(Event::default().data(data)));

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

/// Serve the reload client script.
pub async fn handle_reload_script() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/javascript; charset=UTF-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        RELOAD_SCRIPT,
    )
}

/// Middleware stage: inject the reload script into HTML responses.
pub async fn reload_snippet(req: Request, next: Next) -> Response {
    let is_head = req.method() == Method::HEAD;
    let response = next.run(req).await;

    let is_html = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("text/html"));

    if is_head || response.status() != StatusCode::OK || !is_html {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_INJECT_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "failed to buffer HTML for reload injection");
            return (StatusCode::INTERNAL_SERVER_ERROR, "failed to read HTML body").into_response();
        }
    };

    let html = inject_reload_script(&bytes);
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-cache"),
    );
    Response::from_parts(parts, Body::from(html))
}

/// Insert the reload script tag before `</body>`, or append it.
pub fn inject_reload_script(content: &[u8]) -> Vec<u8> {
    let html = String::from_utf8_lossy(content);
    let script_tag = format!(r#"<script src="{}"></script>"#, SCRIPT_PATH);

    if let Some(pos) = html.rfind("</body>") {
        let mut result = String::with_capacity(html.len() + script_tag.len() + 4);
        result.push_str(&html[..pos]);
        result.push_str(&script_tag);
        result.push('\n');
        result.push_str(&html[pos..]);
        return result.into_bytes();
    }

    let mut result = html.into_owned();
    result.push('\n');
    result.push_str(&script_tag);
    result.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAG: &str = r#"<script src="/__tether__/reload.js"></script>"#;

    #[test]
    fn test_inject_reload_script_with_body() {
        let result = inject_reload_script(b"<html><body><h1>Test</h1></body></html>");
        let result_str = String::from_utf8(result).unwrap();

        let script_pos = result_str.find(TAG).unwrap();
        let body_pos = result_str.find("</body>").unwrap();
        assert!(script_pos < body_pos);
    }

    #[test]
    fn test_inject_reload_script_without_body() {
        let result = inject_reload_script(b"<html><h1>Test</h1></html>");
        let result_str = String::from_utf8(result).unwrap();
        assert!(result_str.ends_with(TAG));
    }

    #[test]
    fn test_reload_script_handles_both_event_kinds() {
        assert!(RELOAD_SCRIPT.contains(EVENTS_PATH));
        assert!(RELOAD_SCRIPT.contains("'css'"));
        assert!(RELOAD_SCRIPT.contains("'reload'"));
    }
}
