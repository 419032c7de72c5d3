//! Check command implementation.
//!
//! Validates configuration without starting the server.

use crate::cli::CheckArgs;
use crate::dev::config::resolve_cwd;
use crate::error::Result;
use crate::ui;
use tether_config::{ConfigOverrides, DEFAULT_CONFIG_FILE, ServerConfig};

/// Execute the check command.
///
/// # Validation Steps
///
/// 1. Load the config file (if any) merged with `TETHER_*` overrides
/// 2. Validate values, globs, middleware order and rewrite patterns
/// 3. Warn when the base directory or fallback document is missing
/// 4. Print the resolved configuration (if --print)
///
/// # Errors
///
/// Returns errors for unreadable or invalid configuration.
pub async fn execute(args: CheckArgs) -> Result<()> {
    ui::info("Checking configuration...");

    let cwd = resolve_cwd(args.cwd.as_deref())?;

    match ServerConfig::locate(&cwd, args.config.as_deref())? {
        Some(path) => ui::info(&format!("Using {}", path.display())),
        None => ui::warning(&format!("No {} found, using defaults", DEFAULT_CONFIG_FILE)),
    }

    let config = ServerConfig::load(&cwd, args.config.as_deref(), &ConfigOverrides::default())?;
    tether_config::validate(&config)?;
    ui::success("Configuration is valid!");

    let base_dir = config.resolved_base_dir(&cwd);
    if base_dir.is_dir() {
        let index = &config.server.history_api_fallback.index;
        let index_path = base_dir.join(index.trim_start_matches('/'));
        if !index_path.is_file() {
            ui::warning(&format!(
                "Fallback document {} does not exist yet",
                index_path.display()
            ));
        }
    } else {
        ui::warning(&format!(
            "Base directory {} does not exist yet",
            base_dir.display()
        ));
    }

    if args.print {
        println!("{}", serde_json::to_string_pretty(&config)?);
    }

    Ok(())
}
