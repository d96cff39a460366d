//! Error types for the quietwire bootstrap protocol.

use thiserror::Error;

/// Result type alias for quietwire operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while bootstrapping a disguised session.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or incomplete option string
    #[error("configuration error: {0}")]
    Config(String),

    /// Handshake requested before any successful configure
    #[error("session not configured")]
    NotConfigured,

    /// Inbound bytes violate the record-layer framing
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a new record-framing error
    pub fn record(msg: impl Into<String>) -> Self {
        Error::InvalidRecord(msg.into())
    }

    /// Check if this error surfaces as a nonzero status at the C
    /// boundary (as opposed to an empty output buffer).
    pub fn is_config_failure(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}
