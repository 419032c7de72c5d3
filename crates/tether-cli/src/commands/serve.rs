//! Serve command implementation.
//!
//! Runs the development server until Ctrl+C, broadcasting a reload event
//! to connected browsers for every watched file change.

use crate::cli::ServeArgs;
use crate::dev::{
    DevConfig, DevServer, DevServerState, FileChange, FileWatcher, ReloadEvent, SharedState,
};
use crate::error::{CliError, Result};
use crate::ui;
use std::sync::Arc;
use tether_config::WatchMatcher;
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinError;

/// Execute the serve command.
///
/// # Process Flow
///
/// 1. Load, merge and validate configuration, pick a free port
/// 2. Start the file watcher when reload is enabled
/// 3. Start the HTTP server in the background
/// 4. Forward file changes to browsers until Ctrl+C
///
/// # Errors
///
/// Returns errors for invalid configuration, a missing base directory,
/// exhausted ports, watcher failures or a server that fails to bind or
/// stops with an error.
pub async fn execute(args: ServeArgs) -> Result<()> {
    let config = DevConfig::from_args(&args)?;
    config.validate()?;

    ui::info(&format!("Working directory: {}", config.cwd.display()));

    let state: SharedState = Arc::new(DevServerState::new());

    // Keep the watcher alive for the lifetime of the loop
    let (_watcher, mut change_rx) = if config.server.reload {
        start_watcher(&config)?
    } else {
        ui::info("Live reload disabled");
        (None, None)
    };

    let server = DevServer::new(config.clone(), state.clone());
    let mut server_handle = tokio::spawn(server.start());

    if config.open {
        open_browser(&config.server_url());
    }

    ui::info("Press Ctrl+C to stop");

    loop {
        tokio::select! {
            Some(change) = next_change(&mut change_rx) => {
                handle_file_change(change, &state).await;
            }

            _ = signal::ctrl_c() => {
                ui::info("Shutting down development server...");
                break;
            }

            joined = &mut server_handle => {
                server_exit(joined)?;
                ui::warning("Server task completed unexpectedly");
                break;
            }
        }
    }

    server_handle.abort();
    ui::success("Development server stopped");
    Ok(())
}

/// Result of the finished server task.
fn server_exit(joined: std::result::Result<Result<()>, JoinError>) -> Result<()> {
    match joined {
        Ok(result) => result,
        Err(e) => Err(CliError::Server(format!("server task failed: {}", e))),
    }
}

type WatcherParts = (Option<FileWatcher>, Option<mpsc::Receiver<FileChange>>);

fn start_watcher(config: &DevConfig) -> Result<WatcherParts> {
    let matcher = WatchMatcher::new(&config.server.files)?;
    if matcher.is_empty() {
        ui::warning("No watch patterns configured, live reload will never trigger");
        return Ok((None, None));
    }

    let (watcher, rx) = FileWatcher::new(config.cwd.clone(), matcher, config.server.debounce_ms)?;
    for dir in watcher.watched() {
        ui::info(&format!("Watching for changes in: {}", dir.display()));
    }
    Ok((Some(watcher), Some(rx)))
}

async fn next_change(rx: &mut Option<mpsc::Receiver<FileChange>>) -> Option<FileChange> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

/// Broadcast the reload event for a changed file.
async fn handle_file_change(change: FileChange, state: &SharedState) {
    let event = ReloadEvent::for_path(change.path());
    ui::info(&format!("File changed: {}", change.path().display()));
    tracing::debug!(?event, clients = state.client_count(), "broadcasting reload event");
    state.broadcast(&event).await;
}

/// Open the server URL in the default browser.
///
/// Uses platform-specific commands:
/// - macOS: `open`
/// - Windows: `start`
/// - Linux: `xdg-open`
fn open_browser(url: &str) {
    use std::process::Command;

    let result = if cfg!(target_os = "macos") {
        Command::new("open").arg(url).spawn()
    } else if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", "start", url]).spawn()
    } else {
        Command::new("xdg-open").arg(url).spawn()
    };

    match result {
        Ok(_) => ui::info(&format!("Opened browser at {}", url)),
        Err(e) => ui::warning(&format!("Failed to open browser: {}", e)),
    }
}
