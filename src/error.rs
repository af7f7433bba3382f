//! Error types for the coin ticker

use thiserror::Error;

/// Errors that can occur while refreshing the price table
///
/// None of these are fatal. The scheduler logs them, keeps the last known
/// prices on screen and tries again at the next refresh interval.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    /// Network did not come back within the reconnect window
    #[error("Not connected to the network")]
    Disconnected,

    /// Price feed answered with a non-200 status
    #[error("HTTP status {0}")]
    Http(u16),

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    Parse(String),

    /// Request never produced a response (DNS, TLS, timeout, body read)
    #[error("Transport error: {0}")]
    Transport(String),
}

impl FetchError {
    /// Creates a Parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Short label used in log fields and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Disconnected => "disconnected",
            FetchError::Http(_) => "http",
            FetchError::Parse(_) => "parse",
            FetchError::Transport(_) => "transport",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Errors reported by a display sink
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DisplayError {
    /// Display could not be brought up; the ticker cannot run without it
    #[error("Display initialization failed: {0}")]
    InitFailed(String),

    /// Writing to an initialized display failed
    #[error("Display I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for DisplayError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Errors in a ticker configuration
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No coins to display
    #[error("Coin set is empty")]
    EmptyCoinSet,

    /// An interval that must be positive is zero
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),

    /// Precision buckets are not ordered from largest threshold down
    #[error("Precision buckets must be sorted by descending threshold")]
    UnsortedBuckets,

    /// Response shape cannot carry the requested change fields
    #[error("Response shape does not provide the requested change fields")]
    UnsupportedChanges,

    /// Feed variant name not recognized
    #[error("Unknown feed variant: {0}")]
    UnknownVariant(String),
}
