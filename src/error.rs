//! Error types for configuration, payload encoding and receiver transport

use thiserror::Error;

/// Rejected configuration, detected once at load time before any cycle runs
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("receiver url must not be empty")]
    MissingReceiverUrl,

    #[error("receiver token must not be empty")]
    MissingToken,

    #[error("interval must be at least one second")]
    ZeroInterval,

    #[error("timeout must be at least one second")]
    ZeroTimeout,

    #[error("hostname override must not be empty")]
    EmptyHostname,

    #[error("{metric}: {threshold} threshold is required when alerting is enabled")]
    MissingThreshold {
        metric: &'static str,
        threshold: &'static str,
    },

    #[error("{metric}: {threshold} threshold must be a non-negative integer, got {value:?}")]
    InvalidCount {
        metric: &'static str,
        threshold: &'static str,
        value: String,
    },

    #[error("invalid data size {0:?}")]
    InvalidDataSize(String),
}

/// The check-result document could not be serialized
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("{field} contains a character that is not allowed in XML: {value:?}")]
    InvalidCharacter { field: &'static str, value: String },

    #[error("failed to write XML: {0}")]
    Xml(String),

    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Anything that went wrong between sending the payload and understanding the answer
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("receiver answered with HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed receiver response: {0}")]
    MalformedResponse(String),

    #[error("receiver status is not a number: {0:?}")]
    InvalidStatus(String),
}

/// Failure that prevented a process group's check results from being submitted
#[derive(Debug, Error)]
pub enum GroupError {
    #[error("failed to resolve local host name: {0}")]
    Hostname(String),

    #[error(transparent)]
    Encoding(#[from] EncodingError),
}
