use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::error::LLMError;
use crate::provider::DynProvider;

/// Provider 注册表 以 provider id 为键 查找时忽略大小写
///
/// 内部映射由 `RwLock` 保护 所有操作只需 `&self` 可以通过 `Arc` 在多个任务间共享
#[derive(Default)]
pub struct ProviderFactory {
    providers: RwLock<HashMap<String, DynProvider>>,
}

impl ProviderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册 Provider 相同 id（任意大小写）的旧注册会被覆盖
    ///
    /// # Errors
    ///
    /// Returns [`LLMError::InvalidArgument`] when the provider reports an empty id.
    pub fn register(&self, provider: DynProvider) -> Result<(), LLMError> {
        let id = provider.provider_id().to_string();
        if id.trim().is_empty() {
            return Err(LLMError::invalid_argument(
                "provider id cannot be null or empty",
            ));
        }
        info!(
            provider_id = %id,
            provider = provider.provider_name(),
            model = provider.model_name(),
            "registering provider"
        );
        self.write().insert(normalize(&id), provider);
        Ok(())
    }

    /// 按 id 查找 Provider
    ///
    /// # Errors
    ///
    /// Returns [`LLMError::NotFound`] listing the currently registered ids.
    pub fn lookup(&self, provider_id: &str) -> Result<DynProvider, LLMError> {
        let providers = self.read();
        if let Some(provider) = providers.get(&normalize(provider_id)) {
            return Ok(provider.clone());
        }
        let mut available: Vec<&str> = providers.values().map(|p| p.provider_id()).collect();
        available.sort_unstable();
        Err(LLMError::not_found(format!(
            "provider with id '{provider_id}' not found. Available providers: {}",
            available.join(", ")
        )))
    }

    /// 返回全部已注册的 Provider
    pub fn list_all(&self) -> Vec<DynProvider> {
        self.read().values().cloned().collect()
    }

    /// 返回当前已注册的 id（保留注册时的大小写）
    pub fn provider_ids(&self) -> Vec<String> {
        self.read()
            .values()
            .map(|provider| provider.provider_id().to_string())
            .collect()
    }

    /// 移除 Provider 不存在时什么也不做
    pub fn remove(&self, provider_id: &str) {
        if self.write().remove(&normalize(provider_id)).is_some() {
            debug!(provider_id, "removed provider");
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, DynProvider>> {
        self.providers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, DynProvider>> {
        self.providers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn normalize(key: &str) -> String {
    key.to_lowercase()
}
