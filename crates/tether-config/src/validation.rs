//! Schema-level validation (no filesystem checks).

use crate::config::{MiddlewareKind, ServerConfig};
use crate::error::{ConfigError, Result};
use crate::watch::WatchMatcher;
use regex::Regex;

/// Validate a loaded configuration.
///
/// Compiles watch globs and rewrite patterns so that typos surface before
/// the server starts rather than on the first request.
pub fn validate(config: &ServerConfig) -> Result<()> {
    if config.port == 0 {
        return Err(invalid("port", "port 0 is not allowed, pick a fixed port"));
    }

    if config.host.trim().is_empty() {
        return Err(invalid("host", "host cannot be empty"));
    }

    WatchMatcher::new(&config.files)?;

    let server = &config.server;
    for (i, kind) in server.middleware.iter().enumerate() {
        if server.middleware[..i].contains(kind) {
            return Err(invalid(
                "server.middleware",
                &format!("{kind:?} appears more than once"),
            ));
        }
    }

    if let (Some(fallback), Some(content_type)) = (
        position(&server.middleware, MiddlewareKind::HistoryApiFallback),
        position(&server.middleware, MiddlewareKind::ContentType),
    ) {
        // Content type is derived from the rewritten path.
        if content_type < fallback {
            return Err(invalid(
                "server.middleware",
                "historyApiFallback must come before contentType",
            ));
        }
    }

    let fallback = &server.history_api_fallback;
    if !fallback.index.starts_with('/') {
        return Err(invalid(
            "server.historyApiFallback.index",
            "fallback index must be an absolute request path like '/index.html'",
        ));
    }

    if fallback.accepts.is_empty() {
        return Err(invalid(
            "server.historyApiFallback.accepts",
            "at least one accepted media type is required",
        ));
    }

    for rewrite in &fallback.rewrites {
        Regex::new(&rewrite.from).map_err(|source| ConfigError::InvalidRewrite {
            pattern: rewrite.from.clone(),
            source,
        })?;
    }

    Ok(())
}

fn position(chain: &[MiddlewareKind], kind: MiddlewareKind) -> Option<usize> {
    chain.iter().position(|k| *k == kind)
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
}
