//! Tests for multi-source configuration loading.

use figment::Jail;
use std::path::{Path, PathBuf};
use tether_config::{ConfigError, ConfigOverrides, MiddlewareKind, ServerConfig};

#[test]
fn load_without_file_uses_defaults() {
    Jail::expect_with(|jail| {
        let config = ServerConfig::load(jail.directory(), None, &ConfigOverrides::default())
            .map_err(|e| e.to_string())?;
        assert_eq!(config, ServerConfig::default());
        Ok(())
    });
}

#[test]
fn load_reads_default_config_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "tether.config.json",
            r#"{
                "port": 4000,
                "files": ["public/*.{html,js}"],
                "server": {
                    "baseDir": "public",
                    "historyApiFallback": { "disableDotRule": true }
                }
            }"#,
        )?;

        let config = ServerConfig::load(jail.directory(), None, &ConfigOverrides::default())
            .map_err(|e| e.to_string())?;

        assert_eq!(config.port, 4000);
        assert_eq!(config.files, vec!["public/*.{html,js}"]);
        assert_eq!(config.server.base_dir, PathBuf::from("public"));
        assert!(config.server.history_api_fallback.disable_dot_rule);
        assert_eq!(config.server.history_api_fallback.index, "/index.html");
        Ok(())
    });
}

#[test]
fn env_overrides_file_and_cli_overrides_env() {
    Jail::expect_with(|jail| {
        jail.create_file("tether.config.json", r#"{ "port": 4000, "reload": true }"#)?;
        jail.set_env("TETHER_PORT", 5000);
        jail.set_env("TETHER_RELOAD", "false");

        let from_env = ServerConfig::load(jail.directory(), None, &ConfigOverrides::default())
            .map_err(|e| e.to_string())?;
        assert_eq!(from_env.port, 5000);
        assert!(!from_env.reload);

        let overrides = ConfigOverrides {
            port: Some(6000),
            ..Default::default()
        };
        let from_cli = ServerConfig::load(jail.directory(), None, &overrides)
            .map_err(|e| e.to_string())?;
        assert_eq!(from_cli.port, 6000);
        assert!(!from_cli.reload);
        Ok(())
    });
}

#[test]
fn cli_base_dir_override_keeps_other_server_fields() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "tether.config.json",
            r#"{ "server": { "middleware": ["contentType"] } }"#,
        )?;

        let mut overrides = ConfigOverrides::default();
        overrides.server.base_dir = Some(PathBuf::from("build"));

        let config = ServerConfig::load(jail.directory(), None, &overrides)
            .map_err(|e| e.to_string())?;
        assert_eq!(config.server.base_dir, PathBuf::from("build"));
        assert_eq!(config.server.middleware, vec![MiddlewareKind::ContentType]);
        Ok(())
    });
}

#[test]
fn explicit_missing_config_is_an_error() {
    let result = ServerConfig::load(
        Path::new("/nonexistent-project"),
        Some(Path::new("custom.json")),
        &ConfigOverrides::default(),
    );

    match result {
        Err(ConfigError::NotFound(path)) => {
            assert!(path.ends_with("custom.json"));
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn invalid_field_type_is_reported() {
    Jail::expect_with(|jail| {
        jail.create_file("tether.config.json", r#"{ "port": "not-a-port" }"#)?;

        let result = ServerConfig::load(jail.directory(), None, &ConfigOverrides::default());
        assert!(matches!(result, Err(ConfigError::Extract(_))));
        Ok(())
    });
}

#[test]
fn resolved_base_dir_is_relative_to_cwd() {
    let config = ServerConfig::default();
    assert_eq!(
        config.resolved_base_dir(Path::new("/project")),
        PathBuf::from("/project/dist")
    );
}
