use crate::domain::payment::Credentials;
use crate::domain::ports::{RawResponse, Transport};
use crate::domain::request::{HttpMethod, HttpRequestSpec};
use crate::error::{PaymentError, Result, TransportError};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use tracing::{debug, error};

/// Sends requests over HTTP(S) with `reqwest`.
///
/// The client is built once with the credential timeout. That timeout covers the whole
/// exchange, so a silent provider surfaces as [`TransportError::Timeout`].
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let timeout = credentials.effective_timeout();
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PaymentError::Config(format!("HTTP client setup failed: {e}")))?;
        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn headers(request: &HttpRequestSpec) -> std::result::Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::with_capacity(request.headers.len());
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
            // Header values may carry secrets; keep them out of the error text.
            let value = HeaderValue::from_str(value).map_err(|_| {
                TransportError::InvalidRequest(format!("invalid value for header {name}"))
            })?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else if e.is_builder() {
        TransportError::InvalidRequest(e.to_string())
    } else {
        TransportError::Io(e.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        request: &HttpRequestSpec,
    ) -> std::result::Result<RawResponse, TransportError> {
        let headers = Self::headers(request)?;
        let builder = match request.method {
            HttpMethod::Post => self.client.post(&request.url),
        };

        let response = builder
            .headers(headers)
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| {
                error!(url = %request.url, error = %e, "Error writing request");
                classify(e)
            })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| {
            error!(url = %request.url, error = %e, "Error reading response");
            classify(e)
        })?;
        debug!(url = %request.url, status, bytes = body.len(), "provider responded");

        Ok(RawResponse::new(status, body.to_vec()))
    }
}
