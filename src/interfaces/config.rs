use crate::domain::payment::Credentials;
use crate::domain::provider::{AuthScheme, ConfiguredModule, ResponseContract};
use crate::domain::registry::ModuleRegistry;
use crate::error::{PaymentError, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Extra provider registration read from the config file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModuleConfig {
    pub key: String,
    pub name: Option<String>,
    pub session_url: Option<String>,
    pub approval_url: Option<String>,
    pub auth: AuthScheme,
    #[serde(default)]
    pub contract: ResponseContract,
}

impl ModuleConfig {
    pub fn to_module(&self) -> ConfiguredModule {
        let name = self.name.clone().unwrap_or_else(|| self.key.clone());
        let mut module = ConfiguredModule::new(name, self.auth.clone())
            .contract(self.contract.clone());
        if let Some(url) = &self.session_url {
            module = module.session_url(url);
        }
        if let Some(url) = &self.approval_url {
            module = module.approval_url(url);
        }
        module
    }
}

/// Settings supplied by whoever boots the facade.
///
/// ```toml
/// secret_key = "test_sk_..."
/// timeout_secs = 10
///
/// [[modules]]
/// key = "TOSS_SANDBOX"
/// approval_url = "http://localhost:8080/v1/payments/confirm"
/// auth = { scheme = "basic" }
///
/// [modules.contract]
/// status_field = "status"
/// success_values = ["DONE"]
/// payment_id_field = "paymentKey"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaymentConfig {
    pub secret_key: Option<String>,
    /// Timeout for each provider call, in seconds.
    pub timeout_secs: Option<u64>,
    pub modules: Vec<ModuleConfig>,
}

impl PaymentConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PaymentError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| PaymentError::Config(e.to_string()))
    }

    /// Builds credentials, letting explicit overrides win over file values.
    pub fn credentials(
        &self,
        secret_key: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Result<Credentials> {
        let secret_key = secret_key
            .or_else(|| self.secret_key.clone())
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| PaymentError::Config("secret key is not configured".to_string()))?;

        let mut credentials = Credentials::new(secret_key);
        match timeout_secs.or(self.timeout_secs) {
            Some(0) => return Err(PaymentError::Config("timeout must be positive".to_string())),
            Some(secs) => credentials = credentials.with_timeout(Duration::from_secs(secs)),
            None => {}
        }
        Ok(credentials)
    }

    /// Built-in modules plus the configured ones; a configured key replaces a built-in.
    pub fn registry(&self) -> ModuleRegistry {
        let registry = ModuleRegistry::with_builtin_modules();
        for module in &self.modules {
            registry.register(module.key.as_str(), Arc::new(module.to_module()));
        }
        registry
    }
}
