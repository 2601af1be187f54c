//! Client error types.

use std::fmt;
use thiserror::Error;

/// The catalog operation a request belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Message reported when the server gives no usable detail.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::List => "Failed to fetch catalogs",
            Self::Get => "Failed to fetch catalog",
            Self::Create => "Failed to create catalog",
            Self::Update => "Failed to update catalog",
            Self::Delete => "Failed to delete catalog",
        }
    }

    /// Whether a failed response's `message` field is surfaced to the caller.
    pub fn reads_error_body(self) -> bool {
        matches!(self, Self::Update | Self::Delete)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalog client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request did not produce a 2xx response.
    ///
    /// `status` is `None` when no response was received at all.
    #[error("{message}")]
    RequestFailed {
        operation: Operation,
        status: Option<u16>,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("failed to decode {operation} response: {source}")]
    Decode {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build request URL: {0}")]
    Url(String),

    #[error(transparent)]
    Config(#[from] ucat_core::Error),
}

impl ClientError {
    /// HTTP status of the failed response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// The operation that failed, when known.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::RequestFailed { operation, .. } | Self::Decode { operation, .. } => {
                Some(*operation)
            }
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type ClientResult<T> = std::result::Result<T, ClientError>;
