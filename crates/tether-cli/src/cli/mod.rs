//! Command-line interface definition for tether.
//!
//! # Command Structure
//!
//! - `tether serve` - Run the development server
//! - `tether check` - Validate configuration without serving
//! - `tether init` - Write a starter `tether.config.json`

mod commands;
mod tests;

use clap::Parser;

pub use commands::{CheckArgs, Command, InitArgs, ServeArgs};

/// Tether - a development server for single-page applications
#[derive(Parser, Debug)]
#[command(
    name = "tether",
    version,
    about = "A development server for single-page applications",
    long_about = "Tether serves a compiled front-end from a base directory, rewrites\n\
                  client-side routes to the entry document, fixes Content-Type headers\n\
                  and reloads the browser when watched files change."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
