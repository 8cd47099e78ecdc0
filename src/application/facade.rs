use crate::application::outcome::OutcomeResolver;
use crate::domain::payment::{Credentials, PaymentRequest, PaymentResult};
use crate::domain::ports::{RawResponse, TransportBox};
use crate::domain::provider::{PaymentModule, ProviderKey};
use crate::domain::registry::ModuleRegistry;
use crate::domain::request::{HttpRequestSpec, RequestBuilder};
use crate::error::{Result, TransportError};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Structured provider reply returned by [`PaymentFacade::create_payment_session`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

/// The single entry point callers use to talk to any registered payment provider.
///
/// `PaymentFacade` owns the module registry, the credentials it was configured with and
/// the transport that carries requests. Each call is independent; the registry is the
/// only state shared between calls. Every provider call is bounded by the credential
/// timeout, whatever transport is plugged in.
pub struct PaymentFacade {
    credentials: Credentials,
    registry: ModuleRegistry,
    transport: TransportBox,
}

impl PaymentFacade {
    /// Creates a facade with the built-in `TOSS` and `KAKAO` modules registered.
    pub fn new(credentials: Credentials, transport: TransportBox) -> Self {
        let registry = ModuleRegistry::with_builtin_modules();
        Self::with_registry(credentials, registry, transport)
    }

    /// Creates a facade around an existing registry.
    pub fn with_registry(
        credentials: Credentials,
        registry: ModuleRegistry,
        transport: TransportBox,
    ) -> Self {
        Self {
            credentials,
            registry,
            transport,
        }
    }

    /// Registers a module and hands the facade back so calls can be chained.
    pub fn register_module(
        self,
        key: impl Into<ProviderKey>,
        module: impl PaymentModule + 'static,
    ) -> Self {
        self.registry.register(key, Arc::new(module));
        self
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Opens a payment session with the provider and returns its raw reply.
    ///
    /// Any fault, including a transport failure or an unreadable body, is returned as an
    /// error. No outcome resolution happens on this path.
    pub async fn create_payment_session(
        &self,
        payload: &PaymentRequest,
        secret_key: &str,
        provider: &str,
    ) -> Result<ProviderResponse> {
        let module = self.registry.resolve(provider)?;
        let request =
            RequestBuilder::build_session_request(module.as_ref(), payload, secret_key)?;
        debug!(provider, url = %request.url, "creating payment session");

        let response = self.send(&request).await?;
        let body = response.json_body()?;
        Ok(ProviderResponse {
            status: response.status,
            body,
        })
    }

    /// Approves a payment with an empty confirmation body.
    pub async fn approve_payment(
        &self,
        secret_key: &str,
        provider: &str,
    ) -> Result<PaymentResult> {
        self.approve_payment_with(&PaymentRequest::new(), secret_key, provider)
            .await
    }

    /// Approves a payment and resolves the exchange into a [`PaymentResult`].
    ///
    /// The `Err` arm only carries problems found before anything is sent: an unknown
    /// provider key, a provider without an approval endpoint, or an unserializable payload.
    /// Everything after that, including transport faults, comes back as `Ok(Failure)`.
    pub async fn approve_payment_with(
        &self,
        payload: &PaymentRequest,
        secret_key: &str,
        provider: &str,
    ) -> Result<PaymentResult> {
        let module = self.registry.resolve(provider)?;
        let request =
            RequestBuilder::build_approval_request(module.as_ref(), payload, secret_key)?;
        debug!(provider, url = %request.url, "approving payment");

        let exchange = self.send(&request).await;
        let outcome = OutcomeResolver::resolve(module.response_contract(), exchange);
        Ok(outcome)
    }

    async fn send(
        &self,
        request: &HttpRequestSpec,
    ) -> std::result::Result<RawResponse, TransportError> {
        let limit = self.credentials.effective_timeout();
        match tokio::time::timeout(limit, self.transport.execute(request)).await {
            Ok(exchange) => exchange,
            Err(_) => {
                warn!(url = %request.url, ?limit, "provider call timed out");
                Err(TransportError::Timeout)
            }
        }
    }
}
