//! Tether CLI entry point.
//!
//! Handles command-line argument parsing, logging initialization, and
//! command dispatch.

use clap::Parser;
use miette::Result;
use tether_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging and colors based on global flags
    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Serve(serve_args) => commands::serve_execute(serve_args).await,
        cli::Command::Check(check_args) => commands::check_execute(check_args).await,
        cli::Command::Init(init_args) => commands::init_execute(init_args).await,
    };

    // Convert CLI errors to miette diagnostics for readable reporting
    result.map_err(error::cli_error_to_miette)
}
