//! Scenario-based provider selection.
//!
//! A scenario is an application-defined label such as `chat` or `code-review`. The registry
//! only stores `scenario -> provider id`; the provider itself is looked up in the wrapped
//! [`ProviderFactory`] at resolution time, so re-registering a provider under the same id
//! is picked up by every scenario bound to it.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::error::LLMError;
use crate::factory::ProviderFactory;
use crate::provider::DynProvider;
use crate::types::{ChatMessage, CompletionOptions};

/// Scenario name as registered, plus the bound provider id.
#[derive(Debug, Clone)]
struct Binding {
    scenario: String,
    provider_id: String,
}

/// Maps scenario names to provider ids, resolved through a [`ProviderFactory`].
///
/// Scenario lookups ignore case.
pub struct ProviderRegistry {
    factory: Arc<ProviderFactory>,
    bindings: RwLock<HashMap<String, Binding>>,
}

impl ProviderRegistry {
    pub fn new(factory: Arc<ProviderFactory>) -> Self {
        Self {
            factory,
            bindings: RwLock::new(HashMap::new()),
        }
    }

    /// The factory providers are resolved through.
    pub fn factory(&self) -> &Arc<ProviderFactory> {
        &self.factory
    }

    /// Binds a scenario to a provider id, replacing any previous binding.
    ///
    /// The provider id is not checked against the factory here.
    ///
    /// # Errors
    ///
    /// Returns [`LLMError::InvalidArgument`] when either argument is empty.
    pub fn bind(&self, scenario: &str, provider_id: &str) -> Result<(), LLMError> {
        if scenario.trim().is_empty() {
            return Err(LLMError::invalid_argument(
                "scenario cannot be null or empty",
            ));
        }
        if provider_id.trim().is_empty() {
            return Err(LLMError::invalid_argument(
                "provider id cannot be null or empty",
            ));
        }
        info!(scenario, provider_id, "binding scenario");
        self.write().insert(
            normalize(scenario),
            Binding {
                scenario: scenario.to_string(),
                provider_id: provider_id.to_string(),
            },
        );
        Ok(())
    }

    /// Resolves the provider for a scenario.
    ///
    /// A bound scenario resolves through the factory. An unbound scenario falls back to
    /// `default_provider_id` when one is given (an empty id counts as none).
    ///
    /// # Errors
    ///
    /// - [`LLMError::InvalidArgument`] when `scenario` is empty.
    /// - [`LLMError::NotFound`] when the scenario is unbound and there is no default, or
    ///   when the factory no longer knows the bound/default id.
    pub fn resolve(
        &self,
        scenario: &str,
        default_provider_id: Option<&str>,
    ) -> Result<DynProvider, LLMError> {
        if scenario.trim().is_empty() {
            return Err(LLMError::invalid_argument(
                "scenario cannot be null or empty",
            ));
        }

        let bound = self
            .read()
            .get(&normalize(scenario))
            .map(|binding| binding.provider_id.clone());
        if let Some(provider_id) = bound {
            debug!(scenario, provider_id = %provider_id, "resolved scenario binding");
            return self.factory.lookup(&provider_id);
        }

        match default_provider_id.filter(|id| !id.trim().is_empty()) {
            Some(provider_id) => {
                debug!(scenario, provider_id, "scenario unbound, using default provider");
                self.factory.lookup(provider_id)
            }
            None => Err(LLMError::not_found(format!(
                "no provider mapping found for scenario '{scenario}' and no default provider specified"
            ))),
        }
    }

    /// Removes a scenario binding. Unknown scenarios are ignored.
    pub fn unbind(&self, scenario: &str) {
        if self.write().remove(&normalize(scenario)).is_some() {
            debug!(scenario, "unbound scenario");
        }
    }

    /// Names of all bound scenarios, as they were registered.
    pub fn list_scenarios(&self) -> Vec<String> {
        self.read()
            .values()
            .map(|binding| binding.scenario.clone())
            .collect()
    }

    /// Resolves `scenario` (without a default) and runs a single-turn completion.
    pub async fn generate_completion(
        &self,
        scenario: &str,
        prompt: &str,
        options: Option<&CompletionOptions>,
    ) -> Result<String, LLMError> {
        let provider = self.resolve(scenario, None)?;
        provider.generate_completion(prompt, options).await
    }

    /// Resolves `scenario` (without a default) and runs a chat completion.
    pub async fn generate_chat_completion(
        &self,
        scenario: &str,
        messages: &[ChatMessage],
        options: Option<&CompletionOptions>,
    ) -> Result<String, LLMError> {
        let provider = self.resolve(scenario, None)?;
        provider.generate_chat_completion(messages, options).await
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Binding>> {
        self.bindings.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Binding>> {
        self.bindings.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn normalize(key: &str) -> String {
    key.to_lowercase()
}
