//! Error types shared across the workspace.
//!
//! The `FeedError` enum unifies the failure cases of the data sources, the
//! ticker configuration and the telemetry sink so that every layer can
//! propagate a single error type with `?`. `FeedError::is_fatal` separates
//! permanent misconfiguration from transient failures.
use std::io;

use thiserror::Error;

/// Workspace-wide `Result` alias with `FeedError` as the default error.
pub type Result<T, E = FeedError> = std::result::Result<T, E>;

/// Unified error type for data sources, configuration and publishing.
#[derive(Error, Debug)]
pub enum FeedError {
    /// I/O error while reading configuration or credential files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Transport-level HTTP failure (DNS, TLS, connection reset, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A data source answered with a non-success HTTP status.
    #[error("{provider} responded with HTTP {status} for {url}")]
    HttpStatus {
        /// Name of the data source.
        provider: &'static str,
        /// Returned status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// Session handshake with a data source failed (cookie, crumb, headers).
    #[error("{provider} handshake failed: {message}")]
    Handshake {
        /// Name of the data source.
        provider: &'static str,
        /// What went wrong.
        message: String,
    },

    /// A data source answered, but the payload lacks a required field.
    #[error("Missing field `{field}` for {symbol}")]
    MissingField {
        /// Symbol being processed.
        symbol: String,
        /// Name of the absent field.
        field: &'static str,
    },

    /// A numeric field could not be parsed.
    #[error("Invalid number in `{field}`: {value:?}")]
    InvalidNumber {
        /// Name of the field.
        field: &'static str,
        /// Raw value received.
        value: String,
    },

    /// The primary source does not know this ticker.
    #[error("Unknown scrip: {0}")]
    UnknownScrip(String),

    /// A ticker symbol could not be parsed.
    #[error("Invalid ticker: {0:?}")]
    InvalidTicker(String),

    /// Error while parsing the ticker file into `Ticker` values.
    #[error("Parse tickers file error: {0}")]
    ParseTickersFile(String),

    /// Invalid runtime configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The telemetry sink rejected an operation.
    #[error("Telemetry sink error: {0}")]
    Sink(String),
}

impl FeedError {
    /// Returns `true` when retrying the same call will not help.
    ///
    /// Permanent errors are misconfiguration or unknown symbols; everything
    /// else (network trouble, throttling, expired sessions) is transient.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Io(_) | Self::Http(_) | Self::Handshake { .. } | Self::Sink(_) => false,
            Self::HttpStatus { status, .. } => is_permanent_status(*status),
            Self::SerdeJson(_)
            | Self::MissingField { .. }
            | Self::InvalidNumber { .. }
            | Self::UnknownScrip(_)
            | Self::InvalidTicker(_)
            | Self::ParseTickersFile(_)
            | Self::Config(_) => true,
        }
    }
}

/// 4xx other than auth/throttling means the request itself is wrong.
fn is_permanent_status(status: u16) -> bool {
    (400..500).contains(&status) && !matches!(status, 401 | 403 | 408 | 429)
}
