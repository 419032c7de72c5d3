//! Development server module.
//!
//! - Static file serving from the base directory
//! - History-API fallback and content-type correction
//! - File watching with debouncing
//! - Live reload via Server-Sent Events

pub mod config;
pub mod content_type;
pub mod fallback;
pub mod middleware;
pub mod reload;
pub mod server;
pub mod state;
pub mod watcher;

// Re-exports
pub use config::DevConfig;
pub use fallback::HistoryFallback;
pub use server::DevServer;
pub use state::{DevServerState, ReloadEvent, SharedState};
pub use watcher::{FileChange, FileWatcher};
