//! Error types for route53-ddns.

use crate::config::RecordType;
use thiserror::Error;

/// Result type alias for route53-ddns.
pub type Result<T> = std::result::Result<T, DdnsError>;

/// DDNS error types.
#[derive(Error, Debug)]
pub enum DdnsError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network/HTTP error.
    #[error("Network error: {0}")]
    Network(String),

    /// Provider-specific error, carrying the provider's diagnostic text.
    #[error("Provider error ({provider}): {message}")]
    Provider { provider: String, message: String },

    /// The current IP could not be determined.
    #[error("IP detection failed: {0}")]
    IpDetection(String),

    /// The current IP does not look like an address of the record type.
    #[error("Invalid {record_type} address: {ip:?}")]
    InvalidIp { ip: String, record_type: RecordType },

    /// The change-notification script failed.
    #[error("Notifier failed: {0}")]
    Notifier(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for DdnsError {
    fn from(e: reqwest::Error) -> Self {
        DdnsError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for DdnsError {
    fn from(e: serde_json::Error) -> Self {
        DdnsError::Serialization(e.to_string())
    }
}
