//! Configuration for the tether development server.
//!
//! A [`ServerConfig`] describes which files to watch, which port to listen on,
//! the directory static assets are served from, and the ordered middleware
//! chain every request runs through before static file resolution.
//!
//! Configuration is merged from several sources with [`figment`]:
//! CLI overrides > `TETHER_*` environment variables > `tether.config.json` > defaults.

pub mod config;
pub mod error;
pub mod loading;
pub mod validation;
pub mod watch;

// Re-export main types
pub use config::*;
pub use error::*;
pub use loading::{ConfigOverrides, DEFAULT_CONFIG_FILE, ENV_PREFIX};
pub use validation::validate;
pub use watch::WatchMatcher;
