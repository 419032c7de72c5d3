//! Error types for the bootstrap bridge.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BridgeError>;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// The persisted blob is not valid JSON. Startup does not fall back to
    /// a default state.
    #[error("stored state under '{key}' is not valid JSON: {source}")]
    MalformedState {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize application state: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A port handed over a value whose stringified form does not parse.
    #[error("value sent on port '{port}' is not valid JSON: {source}")]
    PortValue {
        port: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage is not available: {0}")]
    StorageUnavailable(String),

    #[error("failed to read '{key}' from storage: {message}")]
    StorageRead { key: String, message: String },

    #[error("failed to write '{key}' to storage: {message}")]
    StorageWrite { key: String, message: String },

    #[error("invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("DOM operation failed: {0}")]
    Dom(String),

    #[error("application failed to launch: {0}")]
    Launch(String),
}

impl BridgeError {
    /// Shorthand for [`BridgeError::StorageWrite`].
    pub fn storage_write(key: &str, message: impl Into<String>) -> Self {
        Self::StorageWrite {
            key: key.to_string(),
            message: message.into(),
        }
    }
}
