//! Error types for the foreman library.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all foreman operations.
#[derive(Error, Debug)]
pub enum ForemanError {
    /// Plan store connection or query errors
    #[error("Store error: {message}")]
    Store {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// A step's action failed during execution
    #[error("{message}")]
    StepFailed { message: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ForemanError {
    /// Creates a step-failure error from any displayable cause.
    pub fn step_failed(message: impl Into<String>) -> Self {
        Self::StepFailed {
            message: message.into(),
        }
    }

    /// Creates a store error with additional context.
    pub fn store_error(message: &str, source: rusqlite::Error) -> Self {
        Self::Store {
            message: message.to_string(),
            source,
        }
    }
}

/// Extension trait for store-related Results.
pub trait StoreResultExt<T> {
    /// Map rusqlite errors into [`ForemanError::Store`] with a message.
    fn store_context(self, message: &str) -> Result<T>;
}

impl<T> StoreResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn store_context(self, message: &str) -> Result<T> {
        self.map_err(|e| ForemanError::store_error(message, e))
    }
}

/// Result type alias for foreman operations
pub type Result<T> = std::result::Result<T, ForemanError>;
