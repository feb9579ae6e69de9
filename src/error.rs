//! Error types for CSE operations and client configuration
//!
//! Every failed resource operation surfaces as a [`CseOperationError`]. The only
//! statuses the client normalizes to success are 409 on creation and 200 on the
//! container existence check; everything else propagates to the caller.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CSE operations
pub type Result<T, E = CseOperationError> = std::result::Result<T, E>;

/// The resource operation that was being performed when an error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Application Entity registration
    RegisterAe,
    /// Existence check for the data container
    CheckContainer,
    /// Data container creation
    CreateContainer,
    /// DESCRIPTOR container creation
    CreateDescriptor,
    /// ContentInstance upload
    SendData,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RegisterAe => "AE registration",
            Self::CheckContainer => "container check",
            Self::CreateContainer => "container creation",
            Self::CreateDescriptor => "descriptor creation",
            Self::SendData => "data upload",
        };
        f.write_str(name)
    }
}

/// Failure of a single CSE resource operation
#[derive(Error, Debug)]
pub enum CseOperationError {
    /// The CSE answered with a status the operation does not accept
    #[error("{operation} failed. Status code: {status}, Response: {body}")]
    Status {
        operation: Operation,
        status: u16,
        body: String,
    },

    /// The request never produced a usable response (DNS, connect, timeout, malformed reply)
    #[error("Exception during {operation}: {reason}")]
    Transport { operation: Operation, reason: String },

    /// The request body could not be encoded
    #[error("Failed to encode {operation} payload: {reason}")]
    Serialization { operation: Operation, reason: String },
}

impl CseOperationError {
    /// Operation that failed
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::Status { operation, .. }
            | Self::Transport { operation, .. }
            | Self::Serialization { operation, .. } => *operation,
        }
    }

    /// HTTP status code returned by the CSE, if the request got that far
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body returned by the CSE, if any
    #[must_use]
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Whether repeating the same request could plausibly succeed
    ///
    /// The client never retries on its own; this only informs callers that
    /// implement their own policy.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Serialization { .. } => false,
        }
    }

    /// Get the exit code for this error
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Transport { .. } => 4,
            Self::Status { .. } => 5,
            Self::Serialization { .. } => 2,
        }
    }

    pub(crate) fn transport(operation: Operation, err: &reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            format!("request timed out: {err}")
        } else if err.is_connect() {
            format!("connection failed: {err}")
        } else {
            err.to_string()
        };
        Self::Transport { operation, reason }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config from {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    /// Failed to write configuration file
    #[error("Failed to write config to {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    /// Configuration file exists but could not be parsed
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// Configuration values are unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Configuration file not found
    #[error("Configuration not found at {0}")]
    NotFound(PathBuf),

    /// Could not determine where the configuration lives
    #[error("Could not determine config directory: XDG_CONFIG_HOME not set and no home directory found")]
    NoConfigDir,

    /// HTTP transport could not be built from the configuration
    #[error("Failed to create HTTP client: {0}")]
    Transport(String),
}

impl ConfigError {
    /// Get the exit code for this error
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Invalid(_) | Self::Parse(_) => 2,
            _ => 1,
        }
    }
}
