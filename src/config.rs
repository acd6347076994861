use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LLMError;
use crate::factory::ProviderFactory;
use crate::http::DynHttpTransport;
use crate::provider::DynProvider;
use crate::provider::claude::ClaudeProvider;
use crate::provider::openai_responses::OpenAiResponsesProvider;
use crate::registry::ProviderRegistry;
use crate::types::CompletionOptions;

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_CLAUDE_MODEL: &str = "claude-3-haiku-20240307";

/// Provider 配置 描述一个可调用后端
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// 注册到 ProviderFactory 的唯一标识 例如 `claude-main`
    pub provider_id: String,
    pub kind: ProviderKind,
    pub credential: Credential,
    pub model: String,
    pub base_url: Option<String>,
    /// 调用方未传 options 时使用
    #[serde(default)]
    pub default_options: Option<CompletionOptions>,
    /// 附加设置 例如 organization / project / version
    #[serde(default)]
    pub extra: HashMap<String, Value>,
}

/// 供应商类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    OpenAi,
    Claude,
}

impl ProviderKind {
    fn label(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Claude => "claude",
        }
    }
}

/// 鉴权信息
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Credential {
    /// 简单 API Key
    ApiKey { key: String },
    /// Bearer Token
    Bearer { token: String },
    /// 未配置
    None,
}

/// 完整配置 Provider 列表加场景映射
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
    /// scenario -> provider id
    #[serde(default)]
    pub scenarios: HashMap<String, String>,
}

impl RelayConfig {
    /// 构建 ProviderFactory 并包装成 ProviderRegistry 同时绑定所有场景
    pub fn build(&self, transport: DynHttpTransport) -> Result<ProviderRegistry, LLMError> {
        let factory = build_factory_from_configs(&self.providers, transport)?;
        let registry = ProviderRegistry::new(Arc::new(factory));
        for (scenario, provider_id) in &self.scenarios {
            registry.bind(scenario, provider_id)?;
        }
        Ok(registry)
    }
}

impl ProviderConfig {
    /// 从进程环境变量读取配置
    ///
    /// OpenAI 读取 `OPENAI_API_KEY` `OPENAI_MODEL` `OPENAI_ORG_ID` `OPENAI_BASE_URL`
    /// Claude 读取 `CLAUDE_API_KEY` `CLAUDE_MODEL` `CLAUDE_BASE_URL`
    pub fn from_env(kind: ProviderKind, provider_id: impl Into<String>) -> Result<Self, LLMError> {
        Self::from_lookup(kind, provider_id, |key| std::env::var(key).ok())
    }

    /// 与 [`ProviderConfig::from_env`] 相同 但通过给定闭包读取变量
    ///
    /// # Errors
    ///
    /// Returns [`LLMError::InvalidConfig`] when the api key variable is missing or empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use llm_relay::config::{ProviderConfig, ProviderKind};
    /// let config = ProviderConfig::from_lookup(ProviderKind::Claude, "claude", |key| match key {
    ///     "CLAUDE_API_KEY" => Some("sk-ant-test".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    /// assert_eq!(config.model, "claude-3-haiku-20240307");
    /// ```
    pub fn from_lookup<F>(
        kind: ProviderKind,
        provider_id: impl Into<String>,
        lookup: F,
    ) -> Result<Self, LLMError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let (key_var, model_var, base_var, default_model) = match kind {
            ProviderKind::OpenAi => (
                "OPENAI_API_KEY",
                "OPENAI_MODEL",
                "OPENAI_BASE_URL",
                DEFAULT_OPENAI_MODEL,
            ),
            ProviderKind::Claude => (
                "CLAUDE_API_KEY",
                "CLAUDE_MODEL",
                "CLAUDE_BASE_URL",
                DEFAULT_CLAUDE_MODEL,
            ),
        };

        let key = non_empty(key_var).ok_or_else(|| {
            LLMError::invalid_config(key_var, "environment variable is not set")
        })?;

        let mut extra = HashMap::new();
        if kind == ProviderKind::OpenAi {
            if let Some(org) = non_empty("OPENAI_ORG_ID") {
                extra.insert("organization".to_string(), Value::String(org));
            }
        }

        Ok(Self {
            provider_id: provider_id.into(),
            kind,
            credential: Credential::ApiKey { key },
            model: non_empty(model_var).unwrap_or_else(|| default_model.to_string()),
            base_url: non_empty(base_var),
            default_options: None,
            extra,
        })
    }
}

/// 根据一组 Provider 配置构建 ProviderFactory
pub fn build_factory_from_configs(
    configs: &[ProviderConfig],
    transport: DynHttpTransport,
) -> Result<ProviderFactory, LLMError> {
    let factory = ProviderFactory::new();
    for config in configs {
        let provider = build_provider_from_config(config, transport.clone())?;
        factory.register(provider)?;
    }
    Ok(factory)
}

/// 根据单个配置构建 Provider
pub fn build_provider_from_config(
    config: &ProviderConfig,
    transport: DynHttpTransport,
) -> Result<DynProvider, LLMError> {
    let api_key = extract_api_key(&config.credential, config.kind)?;
    let default_options = config.default_options.clone().unwrap_or_default();

    let provider: DynProvider = match config.kind {
        ProviderKind::OpenAi => {
            let mut provider = OpenAiResponsesProvider::new(
                transport,
                config.provider_id.clone(),
                api_key,
                config.model.clone(),
            )?
            .with_default_options(default_options);

            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            if let Some(Value::String(org)) = config.extra.get("organization") {
                provider = provider.with_organization(org.clone());
            }
            if let Some(Value::String(project)) = config.extra.get("project") {
                provider = provider.with_project(project.clone());
            }

            Arc::new(provider)
        }
        ProviderKind::Claude => {
            let mut provider = ClaudeProvider::new(
                transport,
                config.provider_id.clone(),
                api_key,
                config.model.clone(),
            )?
            .with_default_options(default_options);

            if let Some(base_url) = &config.base_url {
                provider = provider.with_base_url(base_url.clone());
            }
            if let Some(Value::String(version)) = config.extra.get("version") {
                provider = provider.with_version(version.clone());
            }

            Arc::new(provider)
        }
    };

    Ok(provider)
}

fn extract_api_key(credential: &Credential, kind: ProviderKind) -> Result<String, LLMError> {
    match credential {
        Credential::ApiKey { key } => Ok(key.clone()),
        Credential::Bearer { token } => Ok(token.clone()),
        Credential::None => Err(LLMError::invalid_config(
            "credential",
            format!("provider kind {} requires credential", kind.label()),
        )),
    }
}
