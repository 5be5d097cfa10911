//! Error types for the leaderboard store and its configuration

use std::fmt;

/// Failure talking to the score store
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// No usable store was configured for this session
    Disabled,
    /// The request could not be sent or the response never arrived
    Request(String),
    /// The backend answered with a non-success HTTP status
    Status(u16),
    /// The response body was not the expected JSON shape
    Decode(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "score store is disabled"),
            Self::Request(msg) => write!(f, "store request failed: {msg}"),
            Self::Status(code) => write!(f, "store returned HTTP {code}"),
            Self::Decode(msg) => write!(f, "could not decode store response: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Invalid or missing remote store configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    MissingUrl,
    MissingKey,
    InvalidUrl(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingUrl => write!(f, "store URL is not set"),
            Self::MissingKey => write!(f, "store API key is not set"),
            Self::InvalidUrl(url) => write!(f, "store URL must use https: {url}"),
        }
    }
}

impl std::error::Error for ConfigError {}
