use thiserror::Error;

/// Faults raised while moving a request over the wire.
///
/// These never cross the outcome resolver on the approval path; there they become a
/// `PaymentResult::Failure`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request timed out")]
    Timeout,
    #[error("I/O error: {0}")]
    Io(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

#[derive(Error, Debug)]
pub enum PaymentError {
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),
    #[error("Provider {provider} does not support {operation}")]
    UnsupportedProvider { provider: String, operation: String },
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PaymentError>;
