//! Tether CLI - a small development server for single-page applications.
//!
//! Serves a compiled front-end out of a base directory, rewrites client-side
//! routes to the entry document, corrects `Content-Type` headers and pushes
//! reload events to the browser when watched files change.
//!
//! # Architecture
//!
//! - [`cli`] - clap argument definitions
//! - [`commands`] - `serve`, `check` and `init`
//! - [`dev`] - the axum server, middleware chain, watcher and reload channel
//! - [`error`] - error types with actionable messages
//! - [`logger`] - structured logging with tracing
//! - [`ui`] - terminal status messages

pub mod cli;
pub mod commands;
pub mod dev;
pub mod error;
pub mod logger;
pub mod ui;

// Re-export commonly used types
pub use error::{CliError, Result, ResultExt};
