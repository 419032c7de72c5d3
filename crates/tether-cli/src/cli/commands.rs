use clap::{Args, Subcommand};
use std::path::PathBuf;

/// Available tether subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the development server
    ///
    /// Serves the base directory, applies the configured middleware chain
    /// (history-API fallback, content-type correction) and reloads connected
    /// browsers when watched files change.
    Serve(ServeArgs),

    /// Validate configuration
    ///
    /// Loads tether.config.json together with TETHER_* environment
    /// overrides and reports problems without starting the server.
    Check(CheckArgs),

    /// Write a starter tether.config.json
    Init(InitArgs),
}

/// Arguments for the serve command
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Path to a config file (defaults to ./tether.config.json when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Port to listen on
    ///
    /// When the port is busy the next ten ports are tried.
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory static assets are served from
    #[arg(short = 'd', long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Disable file watching and browser reload
    #[arg(long)]
    pub no_reload: bool,

    /// Open the browser once the server is running
    #[arg(long)]
    pub open: bool,

    /// Project directory (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}

/// Arguments for the check command
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Path to a config file (defaults to ./tether.config.json when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the fully resolved configuration as JSON
    #[arg(long)]
    pub print: bool,

    /// Project directory (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}

/// Arguments for the init command
#[derive(Args, Debug, Clone, Default)]
pub struct InitArgs {
    /// Overwrite an existing tether.config.json
    #[arg(short, long)]
    pub force: bool,

    /// Project directory (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,
}
