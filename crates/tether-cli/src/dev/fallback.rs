//! History-API fallback.
//!
//! Page navigations to client-side routes (`/some/app/route`) have no file
//! behind them; they are rewritten to the entry document so the front-end
//! router can take over. Asset requests, API calls and non-GET requests pass
//! through untouched.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method, Uri, header},
    middleware::Next,
    response::Response,
};
use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tether_config::{ConfigError, HistoryFallbackConfig};

/// Compiled fallback rules.
#[derive(Debug)]
pub struct HistoryFallback {
    index: String,
    accepts: Vec<String>,
    disable_dot_rule: bool,
    rewrites: Vec<(Regex, String)>,
    base_dir: PathBuf,
}

impl HistoryFallback {
    pub fn new(config: &HistoryFallbackConfig, base_dir: PathBuf) -> Result<Self, ConfigError> {
        let rewrites = config
            .rewrites
            .iter()
            .map(|rule| {
                Regex::new(&rule.from)
                    .map(|re| (re, rule.to.clone()))
                    .map_err(|source| ConfigError::InvalidRewrite {
                        pattern: rule.from.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            index: config.index.clone(),
            accepts: config.accepts.clone(),
            disable_dot_rule: config.disable_dot_rule,
            rewrites,
            base_dir,
        })
    }

    /// Decide whether a request is rewritten, and to what.
    ///
    /// Returns `None` when the request should reach the static files as-is.
    pub fn rewrite_target(&self, method: &Method, headers: &HeaderMap, path: &str) -> Option<String> {
        if method != Method::GET && method != Method::HEAD {
            tracing::trace!(%method, path, "not rewriting: method is not GET or HEAD");
            return None;
        }

        let accept = headers.get(header::ACCEPT)?.to_str().ok()?;
        if accept.starts_with("application/json") {
            tracing::trace!(path, "not rewriting: client prefers JSON");
            return None;
        }
        if !self.accepts.iter().any(|media| accept.contains(media.as_str())) {
            tracing::trace!(path, accept, "not rewriting: client does not accept HTML");
            return None;
        }

        if self.is_existing_file(path) {
            return None;
        }

        for (pattern, target) in &self.rewrites {
            if pattern.is_match(path) {
                if !target.starts_with('/') {
                    tracing::warn!(
                        rewrite_to = target.as_str(),
                        "rewrite target should be an absolute path starting with '/'"
                    );
                }
                return Some(target.clone());
            }
        }

        if !self.disable_dot_rule && last_segment_has_dot(path) {
            tracing::trace!(path, "not rewriting: path includes a dot");
            return None;
        }

        Some(self.index.clone())
    }

    fn is_existing_file(&self, path: &str) -> bool {
        let relative = Path::new(path.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        !escapes && self.base_dir.join(relative).is_file()
    }
}

fn last_segment_has_dot(path: &str) -> bool {
    match (path.rfind('.'), path.rfind('/')) {
        (Some(dot), Some(slash)) => dot > slash,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Middleware stage: rewrite the request URI to the fallback target.
pub async fn history_api_fallback(
    State(fallback): State<Arc<HistoryFallback>>,
    mut req: Request,
    next: Next,
) -> Response {
    let target = fallback.rewrite_target(req.method(), req.headers(), req.uri().path());

    if let Some(target) = target {
        match target.parse::<Uri>() {
            Ok(uri) => {
                tracing::debug!(from = %req.uri(), to = %uri, "history fallback rewrite");
                *req.uri_mut() = uri;
            }
            Err(e) => tracing::warn!(rewrite_to = target.as_str(), error = %e, "invalid rewrite target"),
        }
    }

    next.run(req).await
}
