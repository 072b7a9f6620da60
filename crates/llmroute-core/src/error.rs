//! Error taxonomy shared by the forwarder and the HTTP front door.
//!
//! Only two classes ever reach a caller: configuration problems detected at
//! dispatch time and transport problems talking to the backend. Malformed
//! lines inside a streaming body are not errors at all; decoders skip them.

use thiserror::Error;

/// Failure while routing a generation request to a backend.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The configured provider cannot be dispatched to.
    /// Raised before any network I/O happens.
    #[error("{0}")]
    Configuration(String),

    /// Connection refused, timeout, or the body could not be read.
    #[error("{0}")]
    Transport(String),

    /// Backend answered with a non-2xx status.
    #[error("Upstream returned {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    /// A buffered backend body was not the JSON object we expected.
    #[error("Invalid upstream response: {0}")]
    Decode(String),
}

impl RouteError {
    /// Build a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Build a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Returns true for errors caused by process configuration rather than
    /// by the backend.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Startup configuration errors.
///
/// These abort the process before the listener is bound.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value that could not be parsed.
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}
