use crate::error::{PaymentError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;

/// Timeout applied to provider calls when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Outbound payload sent to a provider.
///
/// A thin wrapper around a JSON object. `serde_json::Map` keeps its keys sorted,
/// so serializing the same payload always yields the same bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentRequest(Map<String, Value>);

impl PaymentRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, replacing any previous value under the same name.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.0)?)
    }
}

impl From<Map<String, Value>> for PaymentRequest {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl TryFrom<Value> for PaymentRequest {
    type Error = PaymentError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(PaymentError::Config(format!(
                "payload must be a JSON object, got {other}"
            ))),
        }
    }
}

/// Typed outcome of an approval call.
///
/// Exactly one branch exists at a time. Callers consume it with `match` or with
/// [`PaymentResult::handle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum PaymentResult {
    Success {
        payment_id: String,
    },
    Failure {
        error_code: i32,
        error_message: String,
    },
}

impl PaymentResult {
    pub fn success(payment_id: impl Into<String>) -> Self {
        Self::Success {
            payment_id: payment_id.into(),
        }
    }

    pub fn failure(error_code: i32, error_message: impl Into<String>) -> Self {
        Self::Failure {
            error_code,
            error_message: error_message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Routes the result to one of two continuations.
    ///
    /// The success continuation receives the payment id; the failure continuation
    /// receives the error code and message. Both must produce the same type.
    pub fn handle<T>(
        self,
        on_success: impl FnOnce(String) -> T,
        on_failure: impl FnOnce(i32, String) -> T,
    ) -> T {
        match self {
            Self::Success { payment_id } => on_success(payment_id),
            Self::Failure {
                error_code,
                error_message,
            } => on_failure(error_code, error_message),
        }
    }
}

/// Secret key and timeout supplied once when the facade is built.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    secret_key: String,
    timeout: Option<Duration>,
}

impl Credentials {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The configured timeout, or [`DEFAULT_TIMEOUT`] when none was set.
    pub fn effective_timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("secret_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
