use super::request::HttpRequestSpec;
use crate::error::{PaymentError, Result, TransportError};
use async_trait::async_trait;
use std::sync::Arc;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self::new(status, body.to_string())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the body, which providers send as a JSON object on every status.
    pub fn json_body(&self) -> Result<serde_json::Value> {
        let value: serde_json::Value = serde_json::from_slice(&self.body)
            .map_err(|e| PaymentError::MalformedResponse(e.to_string()))?;
        if value.is_object() {
            Ok(value)
        } else {
            Err(PaymentError::MalformedResponse(format!(
                "expected a JSON object, got {value}"
            )))
        }
    }
}

/// Sends a built request to the provider and returns whatever came back.
///
/// Non-2xx statuses are still `Ok`; only failures to complete the exchange are errors.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(
        &self,
        request: &HttpRequestSpec,
    ) -> std::result::Result<RawResponse, TransportError>;
}

pub type TransportBox = Arc<dyn Transport>;
