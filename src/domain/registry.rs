use super::provider::{
    KAKAO, KakaoPayModule, PaymentModule, ProviderKey, TOSS, TossPaymentsModule,
};
use crate::error::{PaymentError, Result};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Maps provider keys to payment modules.
///
/// Registration takes the write lock and lookups take the read lock, so modules may be
/// added while other tasks resolve. Re-registering a key replaces the previous module.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: RwLock<HashMap<ProviderKey, Arc<dyn PaymentModule>>>,
}

impl ModuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the `TOSS` and `KAKAO` modules.
    pub fn with_builtin_modules() -> Self {
        let registry = Self::new();
        registry.register(TOSS, Arc::new(TossPaymentsModule::new()));
        registry.register(KAKAO, Arc::new(KakaoPayModule::new()));
        registry
    }

    pub fn register(&self, key: impl Into<ProviderKey>, module: Arc<dyn PaymentModule>) {
        let key = key.into();
        let mut modules = self.modules.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = modules.insert(key.clone(), module) {
            debug!(provider = %key, replaced = previous.name(), "payment module overwritten");
        } else {
            debug!(provider = %key, "payment module registered");
        }
    }

    pub fn resolve(&self, key: &str) -> Result<Arc<dyn PaymentModule>> {
        let modules = self.modules.read().unwrap_or_else(PoisonError::into_inner);
        modules
            .get(&ProviderKey::from(key))
            .cloned()
            .ok_or_else(|| PaymentError::UnknownProvider(key.to_string()))
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> Vec<ProviderKey> {
        let modules = self.modules.read().unwrap_or_else(PoisonError::into_inner);
        let mut keys: Vec<_> = modules.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.modules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::provider::{AuthScheme, ConfiguredModule};

    #[test]
    fn test_builtin_modules_resolve() {
        let registry = ModuleRegistry::with_builtin_modules();
        assert_eq!(registry.resolve(TOSS).unwrap().name(), "Toss Payments");
        assert_eq!(registry.resolve(KAKAO).unwrap().name(), "KakaoPay");
        assert_eq!(
            registry.keys(),
            vec![ProviderKey::from(KAKAO), ProviderKey::from(TOSS)]
        );
    }

    #[test]
    fn test_unknown_key_fails() {
        let registry = ModuleRegistry::new();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.resolve("NAVER"),
            Err(PaymentError::UnknownProvider(key)) if key == "NAVER"
        ));
    }

    #[test]
    fn test_last_registration_wins() {
        let registry = ModuleRegistry::new();
        for name in ["first", "second", "third"] {
            registry.register(
                "FastCampus",
                Arc::new(ConfiguredModule::new(name, AuthScheme::Basic)),
            );
        }

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve("FastCampus").unwrap().name(), "third");
    }

    #[test]
    fn test_concurrent_register_and_resolve() {
        let registry = Arc::new(ModuleRegistry::with_builtin_modules());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    registry.register(
                        format!("P{i}"),
                        Arc::new(ConfiguredModule::new(format!("m{i}"), AuthScheme::Basic)),
                    );
                    registry.resolve(TOSS).unwrap().name().to_string()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "Toss Payments");
        }
        assert_eq!(registry.len(), 10);
    }
}
