//! Gate error model.

use thiserror::Error;

/// Result type used across the gate crates.
pub type GateResult<T> = Result<T, GateError>;

/// Gate-level error.
///
/// Access decisions themselves never fail (an unresolvable destination is an
/// allow, not an error). These variants cover the edges: decoding stored
/// settings, parsing identifiers, and store access.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    /// Stored or submitted settings could not be decoded.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A backing store could not be read or written.
    #[error("store unavailable: {0}")]
    Store(String),
}

impl GateError {
    pub fn invalid_settings(msg: impl Into<String>) -> Self {
        Self::InvalidSettings(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}

impl From<serde_json::Error> for GateError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidSettings(value.to_string())
    }
}
