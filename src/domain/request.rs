use super::payment::PaymentRequest;
use super::provider::{Operation, PaymentModule};
use crate::error::{PaymentError, Result};

pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
        }
    }
}

/// A fully specified outbound request, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequestSpec {
    pub method: HttpMethod,
    pub url: String,
    /// Header pairs in the order they are sent.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequestSpec {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Turns a module, a payload and a secret key into an [`HttpRequestSpec`].
///
/// Output depends only on the inputs; nothing time- or randomness-based is added here.
pub struct RequestBuilder;

impl RequestBuilder {
    pub fn build_session_request(
        module: &dyn PaymentModule,
        payload: &PaymentRequest,
        secret_key: &str,
    ) -> Result<HttpRequestSpec> {
        Self::build(module, Operation::Session, payload, secret_key)
    }

    pub fn build_approval_request(
        module: &dyn PaymentModule,
        payload: &PaymentRequest,
        secret_key: &str,
    ) -> Result<HttpRequestSpec> {
        Self::build(module, Operation::Approval, payload, secret_key)
    }

    fn build(
        module: &dyn PaymentModule,
        operation: Operation,
        payload: &PaymentRequest,
        secret_key: &str,
    ) -> Result<HttpRequestSpec> {
        let url = module
            .endpoint(operation)
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| PaymentError::UnsupportedProvider {
                provider: module.name().to_string(),
                operation: operation.to_string(),
            })?;

        Ok(HttpRequestSpec {
            method: HttpMethod::Post,
            url: url.to_string(),
            headers: vec![
                (AUTHORIZATION.to_string(), module.authorization(secret_key)),
                (CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()),
            ],
            body: payload.to_bytes()?,
        })
    }
}
