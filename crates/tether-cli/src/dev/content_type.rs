//! Content-type correction.
//!
//! Derives `Content-Type` from the request path's extension and appends a
//! charset for textual types, e.g. `text/html; charset=UTF-8`. Runs after the
//! history fallback so rewritten routes are typed as the entry document.

use axum::{
    extract::Request,
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::Response,
};
use mime_guess::mime::{self, Mime};

/// File served for directory requests by the static file service.
const DIRECTORY_INDEX: &str = "index.html";

/// MIME type for a request path. Unknown extensions map to
/// `application/octet-stream`.
pub fn lookup(path: &str) -> Mime {
    let path = if path.is_empty() || path.ends_with('/') {
        DIRECTORY_INDEX
    } else {
        path
    };
    mime_guess::from_path(path).first_or_octet_stream()
}

/// Default charset for a MIME type, if it has one.
pub fn charset(mime: &Mime) -> Option<&'static str> {
    let textual = mime.type_() == mime::TEXT
        || (mime.type_() == mime::APPLICATION
            && (mime.subtype() == mime::JAVASCRIPT || mime.subtype() == mime::JSON));
    textual.then_some("UTF-8")
}

/// Full header value: `<type>` or `<type>; charset=<charset>`.
pub fn header_value(path: &str) -> String {
    let mime = lookup(path);
    let essence = mime.essence_str();
    match charset(&mime) {
        Some(charset) => format!("{}; charset={}", essence, charset),
        None => essence.to_string(),
    }
}

/// Middleware stage: overwrite `Content-Type` on successful responses.
pub async fn content_type(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_owned();
    let mut response = next.run(req).await;

    let status = response.status();
    if status.is_success() || status == StatusCode::NOT_MODIFIED {
        match HeaderValue::from_str(&header_value(&path)) {
            Ok(value) => {
                response.headers_mut().insert(header::CONTENT_TYPE, value);
            }
            Err(e) => tracing::warn!(path = path.as_str(), error = %e, "unrepresentable content type"),
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textual_types_get_charset() {
        assert_eq!(header_value("/index.html"), "text/html; charset=UTF-8");
        assert_eq!(header_value("/main.css"), "text/css; charset=UTF-8");
        assert_eq!(header_value("/data.json"), "application/json; charset=UTF-8");

        let js = header_value("/elm.js");
        assert!(js.ends_with("; charset=UTF-8"), "{js}");
        assert!(js.contains("javascript"), "{js}");
    }

    #[test]
    fn test_binary_types_have_no_charset() {
        assert_eq!(header_value("/logo.png"), "image/png");
        assert_eq!(header_value("/photo.jpg"), "image/jpeg");
    }

    #[test]
    fn test_unknown_extension_degrades() {
        assert_eq!(header_value("/blob.unknownext"), "application/octet-stream");
        assert_eq!(header_value("/some/app/route"), "application/octet-stream");
    }

    #[test]
    fn test_directory_uses_index_type() {
        assert_eq!(header_value("/"), "text/html; charset=UTF-8");
        assert_eq!(header_value("/docs/"), "text/html; charset=UTF-8");
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(header_value("/INDEX.HTML"), "text/html; charset=UTF-8");
    }
}
