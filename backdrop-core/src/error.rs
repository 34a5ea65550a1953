//! Error types for backdrop-core.

use thiserror::Error;

/// Main error type for the backdrop-core library.
#[derive(Error, Debug)]
pub enum Error {
    // Config errors
    #[error("Failed to load config '{0}': {1}")]
    ConfigLoad(String, String),

    #[error("Failed to parse config '{0}': {1}")]
    ConfigParse(String, String),

    #[error("Config validation error in '{0}': {1}")]
    ConfigValidation(String, String),

    // Manual override errors
    #[error("Invalid manual override: {0}")]
    InvalidOverride(String),

    // Notification errors
    #[error("Malformed payload for {0}: {1}")]
    EventPayload(String, String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
