//! Error types for the core crate.

use thiserror::Error;

/// Core error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
