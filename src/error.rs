//! Error handling for chainreq

use thiserror::Error;

/// Main error type for chainreq operations
#[derive(Error, Debug)]
pub enum NetError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[source] reqwest::Error),

    #[error("Network timeout")]
    Timeout,

    #[error("Decoding failed: {0}")]
    DecodingFailed(String),

    #[error("Server trust evaluation failed: {0}")]
    ServerTrustFailed(String),

    #[error("SSL/TLS error: {0}")]
    Ssl(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for chainreq operations
pub type Result<T> = std::result::Result<T, NetError>;
