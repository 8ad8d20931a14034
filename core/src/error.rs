//! Error types for core operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors while querying the power subsystem
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("battery status unavailable: {0}")]
    Unavailable(String),

    #[error("battery status is not supported on this platform")]
    Unsupported,
}

/// Errors during settings persistence
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve configuration path")]
    Path(#[source] confy::ConfyError),

    #[error("failed to load settings from {path}")]
    Load {
        path: PathBuf,
        #[source]
        source: confy::ConfyError,
    },

    #[error("failed to save settings to {path}")]
    Save {
        path: PathBuf,
        #[source]
        source: confy::ConfyError,
    },
}
