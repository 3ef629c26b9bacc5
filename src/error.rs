//! Error surface of the client.
//!
//! Validation errors (`InvalidParameter`, `EmptyMethod`, `UnknownMethod`) are
//! raised before any network activity. `Transport` and `Decode` wrap the two
//! failure classes of the round trip itself. Nothing is retried, logged, or
//! translated internally; every error propagates to the caller as-is.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the Onionoo client.
#[derive(Debug, Error)]
pub enum Error {
    /// A query filter key is not a recognized Onionoo parameter.
    #[error("invalid parameter '{0}' in query")]
    InvalidParameter(String),

    /// An empty string was supplied as the method name.
    #[error("method cannot be empty")]
    EmptyMethod,

    /// The method name is not one of the six Onionoo document types.
    #[error("invalid method '{0}'")]
    UnknownMethod(String),

    /// The network round trip failed: connection, write, or read error, or a
    /// non-success HTTP status. The underlying cause is preserved.
    #[error("request failed: {0}")]
    Transport(#[from] ureq::Error),

    /// The response body could not be decompressed or was not a valid JSON
    /// document of the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),
}
