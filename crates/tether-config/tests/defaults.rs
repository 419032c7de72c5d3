//! Tests for default values and validation edge cases.

use tether_config::{
    ConfigError, HistoryFallbackConfig, MiddlewareKind, RewriteRule, ServerConfig,
    StaticServerConfig, validate,
};
use std::path::PathBuf;

#[test]
fn server_config_defaults() {
    let config = ServerConfig::default();
    assert_eq!(config.files, vec!["dist/*.(html|css|js)".to_string()]);
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 1337);
    assert!(config.reload);
    assert_eq!(config.debounce_ms, 100);
}

#[test]
fn static_server_defaults() {
    let server = StaticServerConfig::default();
    assert_eq!(server.base_dir, PathBuf::from("dist"));
    assert_eq!(
        server.middleware,
        vec![MiddlewareKind::HistoryApiFallback, MiddlewareKind::ContentType]
    );
}

#[test]
fn history_fallback_defaults() {
    let fallback = HistoryFallbackConfig::default();
    assert_eq!(fallback.index, "/index.html");
    assert_eq!(fallback.accepts, vec!["text/html", "*/*"]);
    assert!(!fallback.disable_dot_rule);
    assert!(fallback.rewrites.is_empty());
}

#[test]
fn defaults_validate() {
    validate(&ServerConfig::default()).expect("defaults are valid");
}

#[test]
fn validate_rejects_content_type_before_fallback() {
    let mut config = ServerConfig::default();
    config.server.middleware = vec![MiddlewareKind::ContentType, MiddlewareKind::HistoryApiFallback];

    match validate(&config) {
        Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "server.middleware"),
        other => panic!("expected InvalidValue, got {other:?}"),
    }
}

#[test]
fn validate_rejects_duplicate_stage() {
    let mut config = ServerConfig::default();
    config.server.middleware = vec![MiddlewareKind::ContentType, MiddlewareKind::ContentType];
    assert!(validate(&config).is_err());
}

#[test]
fn validate_allows_single_stage_chain() {
    let mut config = ServerConfig::default();
    config.server.middleware = vec![MiddlewareKind::ContentType];
    assert!(validate(&config).is_ok());
}

#[test]
fn validate_rejects_bad_rewrite_regex() {
    let mut config = ServerConfig::default();
    config.server.history_api_fallback.rewrites.push(RewriteRule {
        from: "^/docs/(".to_string(),
        to: "/docs.html".to_string(),
    });

    assert!(matches!(
        validate(&config),
        Err(ConfigError::InvalidRewrite { .. })
    ));
}

#[test]
fn validate_rejects_relative_fallback_index() {
    let mut config = ServerConfig::default();
    config.server.history_api_fallback.index = "index.html".to_string();
    assert!(validate(&config).is_err());
}

#[test]
fn validate_rejects_port_zero() {
    let mut config = ServerConfig::default();
    config.port = 0;
    assert!(validate(&config).is_err());
}

#[test]
fn validate_rejects_bad_glob() {
    let mut config = ServerConfig::default();
    config.files = vec!["dist/[".to_string()];
    assert!(matches!(validate(&config), Err(ConfigError::InvalidGlob { .. })));
}
