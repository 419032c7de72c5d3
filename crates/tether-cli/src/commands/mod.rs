//! Command implementations for the tether CLI.
//!
//! - [`serve`] - Development server with live reload
//! - [`check`] - Configuration validation
//! - [`init`] - Starter configuration
//!
//! Each command provides an `execute` function that takes the parsed
//! command arguments and returns a Result.

pub mod check;
pub mod init;
pub mod serve;

// Re-export execute functions for convenience
pub use check::execute as check_execute;
pub use init::execute as init_execute;
pub use serve::execute as serve_execute;
