//! Error types for the exchange client
//!
//! Every failure aborts the run, so each variant carries enough context to be
//! printed to the operator as-is. Server-provided messages arrive here already
//! decoded to UTF-8.

use std::fmt;

/// Main error type for an exchange run
#[derive(Debug)]
pub enum ExchangeError {
    /// Server rejected the credentials or the session
    Authentication { message: String },

    /// Malformed `init` response that cannot fall back to a default
    Policy { reason: String },

    /// Local file missing or unreadable
    FileAccess { path: String, reason: String },

    /// Server refused a file chunk
    Transfer { filename: String, message: String },

    /// Server reported a failed import
    Import { filename: String, message: String },

    /// Network failure or non-2xx HTTP status
    Transport(TransportError),

    /// Response body did not have the expected line layout
    Decode { mode: String, reason: String },

    /// Configuration file could not be loaded
    Config { path: String, reason: String },
}

/// HTTP-layer failure details
#[derive(Debug)]
pub enum TransportError {
    /// Endpoint URL unusable for the exchange
    InvalidEndpoint { url: String, reason: String },

    /// HTTP client could not be constructed
    ClientBuild { reason: String },

    /// Request never produced a response
    RequestFailed { mode: String, reason: String },

    /// Server answered with an error status; body kept for diagnostics
    ServerError {
        mode: String,
        status: u16,
        body: String,
    },
}

impl ExchangeError {
    pub fn authentication(message: impl Into<String>) -> Self {
        ExchangeError::Authentication {
            message: message.into(),
        }
    }

    pub fn policy(reason: impl Into<String>) -> Self {
        ExchangeError::Policy {
            reason: reason.into(),
        }
    }

    pub fn file_access(path: impl Into<String>, reason: impl fmt::Display) -> Self {
        ExchangeError::FileAccess {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn decode(mode: &str, reason: impl Into<String>) -> Self {
        ExchangeError::Decode {
            mode: mode.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExchangeError::Authentication { message } => {
                write!(f, "Authentication failed: {}", message)
            }
            ExchangeError::Policy { reason } => {
                write!(f, "Invalid transfer policy: {}", reason)
            }
            ExchangeError::FileAccess { path, reason } => {
                write!(f, "Cannot access file \"{}\": {}", path, reason)
            }
            ExchangeError::Transfer { filename, message } => {
                write!(f, "Upload of '{}' failed: {}", filename, message)
            }
            ExchangeError::Import { filename, message } => {
                write!(f, "Import of '{}' failed: {}", filename, message)
            }
            ExchangeError::Transport(e) => write!(f, "Transport error: {}", e),
            ExchangeError::Decode { mode, reason } => {
                write!(f, "Malformed '{}' response: {}", mode, reason)
            }
            ExchangeError::Config { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path, reason)
            }
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::InvalidEndpoint { url, reason } => {
                write!(f, "invalid endpoint '{}': {}", url, reason)
            }
            TransportError::ClientBuild { reason } => {
                write!(f, "cannot build HTTP client: {}", reason)
            }
            TransportError::RequestFailed { mode, reason } => {
                write!(f, "mode={} request failed: {}", mode, reason)
            }
            TransportError::ServerError { mode, status, body } => {
                write!(f, "mode={} returned status {}: {}", mode, status, body)
            }
        }
    }
}

impl std::error::Error for ExchangeError {}
impl std::error::Error for TransportError {}

impl From<TransportError> for ExchangeError {
    fn from(err: TransportError) -> Self {
        ExchangeError::Transport(err)
    }
}

pub type Result<T> = std::result::Result<T, ExchangeError>;
