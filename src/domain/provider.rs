use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const TOSS: &str = "TOSS";
pub const KAKAO: &str = "KAKAO";

/// Name under which a module is registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderKey(String);

impl ProviderKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProviderKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for ProviderKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two calls a provider endpoint can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Session,
    Approval,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Session => f.write_str("payment session"),
            Operation::Approval => f.write_str("payment approval"),
        }
    }
}

/// How a secret key turns into an `Authorization` header value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum AuthScheme {
    /// `Basic base64(secret + ":")`, the secret used as a username with an empty password.
    Basic,
    /// A fixed token placed directly before the raw secret, e.g. `SECRET_KEY <secret>`.
    Prefixed { prefix: String },
}

impl AuthScheme {
    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self::Prefixed {
            prefix: prefix.into(),
        }
    }

    pub fn authorization(&self, secret_key: &str) -> String {
        match self {
            AuthScheme::Basic => {
                let credentials = format!("{secret_key}:");
                format!("Basic {}", general_purpose::STANDARD.encode(credentials))
            }
            AuthScheme::Prefixed { prefix } => format!("{prefix} {secret_key}"),
        }
    }
}

/// Where a provider puts the fields the outcome resolver needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseContract {
    /// Indicator field checked on top of a 2xx status. When `None`, the status alone decides.
    pub status_field: Option<String>,
    /// Indicator values that mean success.
    pub success_values: Vec<String>,
    pub payment_id_field: String,
    /// Candidates for the error code, tried in order.
    pub error_code_fields: Vec<String>,
    /// Candidates for the error message, tried in order.
    pub error_message_fields: Vec<String>,
}

impl Default for ResponseContract {
    fn default() -> Self {
        Self {
            status_field: None,
            success_values: Vec::new(),
            payment_id_field: "paymentId".to_string(),
            error_code_fields: vec!["code".to_string()],
            error_message_fields: vec!["message".to_string()],
        }
    }
}

impl ResponseContract {
    /// Whether the response counts as an approved payment under this contract.
    ///
    /// A non-2xx status is never a success, whatever the body says.
    pub fn indicates_success(&self, http_status: u16, body: &serde_json::Value) -> bool {
        if !(200..300).contains(&http_status) {
            return false;
        }
        match &self.status_field {
            None => true,
            Some(field) => body
                .get(field)
                .and_then(|v| v.as_str())
                .is_some_and(|value| self.success_values.iter().any(|s| s == value)),
        }
    }
}

/// One payment company: its endpoints, its auth scheme and its response shape.
///
/// Implementations are immutable once built and are shared behind `Arc`.
pub trait PaymentModule: Send + Sync {
    fn name(&self) -> &str;

    /// URL for the operation, or `None` if the provider has no such endpoint.
    fn endpoint(&self, operation: Operation) -> Option<&str>;

    fn authorization(&self, secret_key: &str) -> String;

    fn response_contract(&self) -> &ResponseContract;
}

/// Toss Payments.
#[derive(Debug, Clone)]
pub struct TossPaymentsModule {
    contract: ResponseContract,
}

impl TossPaymentsModule {
    pub const SESSION_URL: &'static str = "https://api.tosspayments.com/v1/payments";
    pub const APPROVAL_URL: &'static str =
        "https://api.tosspayments.com/v1/payments/confirm";

    pub fn new() -> Self {
        Self {
            contract: ResponseContract {
                status_field: Some("status".to_string()),
                success_values: vec!["DONE".to_string()],
                payment_id_field: "paymentKey".to_string(),
                error_code_fields: vec!["code".to_string()],
                error_message_fields: vec!["message".to_string()],
            },
        }
    }
}

impl Default for TossPaymentsModule {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentModule for TossPaymentsModule {
    fn name(&self) -> &str {
        "Toss Payments"
    }

    fn endpoint(&self, operation: Operation) -> Option<&str> {
        match operation {
            Operation::Session => Some(Self::SESSION_URL),
            Operation::Approval => Some(Self::APPROVAL_URL),
        }
    }

    fn authorization(&self, secret_key: &str) -> String {
        AuthScheme::Basic.authorization(secret_key)
    }

    fn response_contract(&self) -> &ResponseContract {
        &self.contract
    }
}

/// KakaoPay (open API).
#[derive(Debug, Clone)]
pub struct KakaoPayModule {
    auth: AuthScheme,
    contract: ResponseContract,
}

impl KakaoPayModule {
    pub const SESSION_URL: &'static str = "https://open-api.kakaopay.com/v1/payment";
    pub const APPROVAL_URL: &'static str =
        "https://open-api.kakaopay.com/online/v1/payment/approve";

    pub fn new() -> Self {
        Self {
            auth: AuthScheme::prefixed("SECRET_KEY"),
            contract: ResponseContract {
                status_field: None,
                success_values: Vec::new(),
                payment_id_field: "tid".to_string(),
                error_code_fields: vec!["error_code".to_string(), "code".to_string()],
                error_message_fields: vec![
                    "error_message".to_string(),
                    "message".to_string(),
                ],
            },
        }
    }
}

impl Default for KakaoPayModule {
    fn default() -> Self {
        Self::new()
    }
}

impl PaymentModule for KakaoPayModule {
    fn name(&self) -> &str {
        "KakaoPay"
    }

    fn endpoint(&self, operation: Operation) -> Option<&str> {
        match operation {
            Operation::Session => Some(Self::SESSION_URL),
            Operation::Approval => Some(Self::APPROVAL_URL),
        }
    }

    fn authorization(&self, secret_key: &str) -> String {
        self.auth.authorization(secret_key)
    }

    fn response_contract(&self) -> &ResponseContract {
        &self.contract
    }
}

/// A module assembled from configuration rather than code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfiguredModule {
    name: String,
    session_url: Option<String>,
    approval_url: Option<String>,
    auth: AuthScheme,
    contract: ResponseContract,
}

impl ConfiguredModule {
    pub fn new(name: impl Into<String>, auth: AuthScheme) -> Self {
        Self {
            name: name.into(),
            session_url: None,
            approval_url: None,
            auth,
            contract: ResponseContract::default(),
        }
    }

    pub fn session_url(mut self, url: impl Into<String>) -> Self {
        self.session_url = Some(url.into());
        self
    }

    pub fn approval_url(mut self, url: impl Into<String>) -> Self {
        self.approval_url = Some(url.into());
        self
    }

    pub fn contract(mut self, contract: ResponseContract) -> Self {
        self.contract = contract;
        self
    }
}

impl PaymentModule for ConfiguredModule {
    fn name(&self) -> &str {
        &self.name
    }

    fn endpoint(&self, operation: Operation) -> Option<&str> {
        match operation {
            Operation::Session => self.session_url.as_deref(),
            Operation::Approval => self.approval_url.as_deref(),
        }
    }

    fn authorization(&self, secret_key: &str) -> String {
        self.auth.authorization(secret_key)
    }

    fn response_contract(&self) -> &ResponseContract {
        &self.contract
    }
}
