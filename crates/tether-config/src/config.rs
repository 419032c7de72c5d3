//! Development server configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level dev server configuration, as found in `tether.config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServerConfig {
    /// Globs of files whose changes reload connected browsers.
    ///
    /// Both `dist/*.(html|css|js)` and `dist/*.{html,css,js}` alternation
    /// forms are accepted.
    #[serde(default = "default_files")]
    pub files: Vec<String>,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub server: StaticServerConfig,

    /// Push reload events to browsers when watched files change.
    #[serde(default = "default_reload")]
    pub reload: bool,

    /// Window in which repeated events for the same path are dropped.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            files: default_files(),
            host: default_host(),
            port: default_port(),
            server: StaticServerConfig::default(),
            reload: default_reload(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl ServerConfig {
    /// Generate example `tether.config.json` content.
    pub fn example_config() -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(&Self::default())?)
    }
}

/// Static file serving options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StaticServerConfig {
    /// Directory static assets are resolved against.
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Ordered middleware chain. Earlier entries see the request first.
    #[serde(default = "default_middleware")]
    pub middleware: Vec<MiddlewareKind>,

    #[serde(default)]
    pub history_api_fallback: HistoryFallbackConfig,
}

impl Default for StaticServerConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            middleware: default_middleware(),
            history_api_fallback: HistoryFallbackConfig::default(),
        }
    }
}

/// A stage of the request middleware chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MiddlewareKind {
    /// Rewrite application routes to the entry document.
    HistoryApiFallback,
    /// Set `Content-Type` from the request path's extension, with charset.
    ContentType,
}

/// History-API fallback options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct HistoryFallbackConfig {
    /// Entry document requests are rewritten to.
    #[serde(default = "default_fallback_index")]
    pub index: String,

    /// `Accept` header fragments that mark a request as a page navigation.
    #[serde(default = "default_accepts")]
    pub accepts: Vec<String>,

    /// Rewrite paths even when the last segment contains a dot.
    #[serde(default)]
    pub disable_dot_rule: bool,

    /// Explicit rewrites, tried in order before the index rewrite.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rewrites: Vec<RewriteRule>,
}

impl Default for HistoryFallbackConfig {
    fn default() -> Self {
        Self {
            index: default_fallback_index(),
            accepts: default_accepts(),
            disable_dot_rule: false,
            rewrites: Vec::new(),
        }
    }
}

/// Rewrite request paths matching `from` (a regex) to `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RewriteRule {
    pub from: String,
    pub to: String,
}

pub fn default_files() -> Vec<String> {
    vec!["dist/*.(html|css|js)".to_string()]
}

pub fn default_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_port() -> u16 {
    1337
}

pub fn default_reload() -> bool {
    true
}

pub fn default_debounce_ms() -> u64 {
    100
}

pub fn default_base_dir() -> PathBuf {
    PathBuf::from("dist")
}

pub fn default_middleware() -> Vec<MiddlewareKind> {
    vec![MiddlewareKind::HistoryApiFallback, MiddlewareKind::ContentType]
}

pub fn default_fallback_index() -> String {
    "/index.html".to_string()
}

pub fn default_accepts() -> Vec<String> {
    vec!["text/html".to_string(), "*/*".to_string()]
}
