//! Runtime configuration for the development server.
//!
//! Resolves a loaded [`ServerConfig`] against the project directory and
//! picks the socket address the server binds to.

use crate::cli::ServeArgs;
use crate::error::{CliError, Result};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use tether_config::{ConfigOverrides, ServerConfig};

/// How many ports above the requested one are probed.
const PORT_PROBE_RANGE: u16 = 10;

/// Development server configuration.
#[derive(Debug, Clone)]
pub struct DevConfig {
    /// Merged configuration (file, env, CLI)
    pub server: ServerConfig,

    /// Project directory; watch globs are relative to it
    pub cwd: PathBuf,

    /// Absolute directory static assets are served from
    pub base_dir: PathBuf,

    /// Server socket address (IP + port)
    pub addr: SocketAddr,

    /// Open browser automatically on start
    pub open: bool,
}

impl DevConfig {
    /// Create DevConfig from CLI arguments.
    ///
    /// Loads and validates configuration, then binds-probes the port.
    pub fn from_args(args: &ServeArgs) -> Result<Self> {
        let cwd = resolve_cwd(args.cwd.as_deref())?;

        let mut overrides = ConfigOverrides {
            port: args.port,
            reload: args.no_reload.then_some(false),
            ..Default::default()
        };
        overrides.server.base_dir = args.base_dir.clone();

        let server = ServerConfig::load(&cwd, args.config.as_deref(), &overrides)?;
        tether_config::validate(&server)?;

        let ip = parse_host(&server.host)?;
        let addr = Self::find_available_port(ip, server.port)?;

        let mut config = Self::new(server, cwd, addr);
        config.open = args.open;
        Ok(config)
    }

    /// Build a config without touching the network.
    pub fn new(server: ServerConfig, cwd: PathBuf, addr: SocketAddr) -> Self {
        let base_dir = server.resolved_base_dir(&cwd);
        Self {
            server,
            cwd,
            base_dir,
            addr,
            open: false,
        }
    }

    /// Find an available port starting from the requested port.
    ///
    /// Tries the requested port first, then the next ten.
    fn find_available_port(ip: IpAddr, requested_port: u16) -> Result<SocketAddr> {
        use std::net::TcpListener;

        if requested_port < 1024 {
            crate::ui::warning(&format!(
                "Port {} is in privileged range, may require root access",
                requested_port
            ));
        }

        let last = requested_port.saturating_add(PORT_PROBE_RANGE);
        for port in requested_port..=last {
            let addr = SocketAddr::new(ip, port);
            if TcpListener::bind(addr).is_ok() {
                if port != requested_port {
                    crate::ui::warning(&format!(
                        "Port {} is busy, using port {} instead",
                        requested_port, port
                    ));
                }
                return Ok(addr);
            }
        }

        Err(CliError::PortsExhausted {
            first: requested_port,
            last,
        })
    }

    /// Validate that the served directory exists.
    pub fn validate(&self) -> Result<()> {
        if !self.base_dir.is_dir() {
            return Err(CliError::FileNotFound(self.base_dir.clone()));
        }
        Ok(())
    }

    /// Get the server URL as a string.
    pub fn server_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Resolve and canonicalize the project directory.
///
/// Watcher events carry canonical paths, so the root must match them.
pub(crate) fn resolve_cwd(cwd: Option<&Path>) -> Result<PathBuf> {
    let cwd = match cwd {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()?,
    };

    cwd.canonicalize().map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CliError::FileNotFound(cwd.clone()),
        _ => CliError::Io(e),
    })
}

fn parse_host(host: &str) -> Result<IpAddr> {
    if host.eq_ignore_ascii_case("localhost") {
        return Ok(IpAddr::V4(Ipv4Addr::LOCALHOST));
    }
    host.parse().map_err(|_| {
        CliError::InvalidArgument(format!(
            "host '{}' is not an IP address (use e.g. 127.0.0.1 or 0.0.0.0)",
            host
        ))
    })
}
