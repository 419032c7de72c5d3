//! Init command implementation.
//!
//! Writes a starter `tether.config.json` with every option at its default.

use crate::cli::InitArgs;
use crate::dev::config::resolve_cwd;
use crate::error::{CliError, Result, ResultExt};
use crate::ui;
use std::fs;
use tether_config::{DEFAULT_CONFIG_FILE, ServerConfig};

/// Execute the init command.
///
/// # Errors
///
/// Returns [`CliError::AlreadyExists`] when the file exists and `--force`
/// was not passed, or an I/O error if it cannot be written.
pub async fn execute(args: InitArgs) -> Result<()> {
    let cwd = resolve_cwd(args.cwd.as_deref())?;
    let path = cwd.join(DEFAULT_CONFIG_FILE);

    if path.exists() && !args.force {
        return Err(CliError::AlreadyExists(path));
    }

    let content = ServerConfig::example_config()?;
    fs::write(&path, content).with_path(&path)?;

    ui::success(&format!("Created {}", path.display()));
    ui::info("Run `tether serve` to start the development server");
    Ok(())
}
