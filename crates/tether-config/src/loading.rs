//! Multi-source configuration loading.

use crate::config::ServerConfig;
use crate::error::{ConfigError, Result};
use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "tether.config.json";

/// Prefix of environment variables that override config values.
pub const ENV_PREFIX: &str = "TETHER_";

/// Top-level keys that may be set from the environment.
const ENV_KEYS: &[&str] = &["host", "port", "reload"];

/// Values supplied on the command line. Unset fields leave lower-priority
/// sources untouched.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reload: Option<bool>,

    #[serde(skip_serializing_if = "StaticOverrides::is_empty")]
    pub server: StaticOverrides,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
}

impl StaticOverrides {
    fn is_empty(&self) -> bool {
        self.base_dir.is_none()
    }
}

impl ServerConfig {
    /// Load configuration from multiple sources.
    /// Priority: CLI overrides > environment variables > config file > defaults
    ///
    /// An explicit `config_path` must exist; otherwise `tether.config.json`
    /// in `cwd` is used when present.
    pub fn load(
        cwd: &Path,
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = Self::locate(cwd, config_path)? {
            tracing::debug!(path = %path.display(), "loading config file");
            figment = figment.merge(Json::file(path));
        }

        figment = figment
            .merge(Env::prefixed(ENV_PREFIX).only(ENV_KEYS))
            .merge(Serialized::defaults(overrides));

        Ok(figment.extract()?)
    }

    /// Resolve which config file applies, if any.
    pub fn locate(cwd: &Path, config_path: Option<&Path>) -> Result<Option<PathBuf>> {
        match config_path {
            Some(path) => {
                let path = if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    cwd.join(path)
                };
                if path.is_file() {
                    Ok(Some(path))
                } else {
                    Err(ConfigError::NotFound(path))
                }
            }
            None => {
                let default_path = cwd.join(DEFAULT_CONFIG_FILE);
                Ok(default_path.is_file().then_some(default_path))
            }
        }
    }

    /// Base directory resolved against `cwd`.
    pub fn resolved_base_dir(&self, cwd: &Path) -> PathBuf {
        if self.server.base_dir.is_absolute() {
            self.server.base_dir.clone()
        } else {
            cwd.join(&self.server.base_dir)
        }
    }
}
