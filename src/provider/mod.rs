use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::error::{LLMError, require_non_empty};
use crate::http::HttpResponse;
use crate::types::{ChatMessage, CompletionOptions};

pub mod claude;
pub mod openai_responses;

/// 统一的 Provider Trait 所有供应商实现该接口即可接入
///
/// 每次调用恰好发出一次 HTTP POST 不做重试
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// 单轮补全 prompt 作为一条 user 消息发送
    async fn generate_completion(
        &self,
        prompt: &str,
        options: Option<&CompletionOptions>,
    ) -> Result<String, LLMError>;

    /// 多轮对话补全 按顺序发送全部消息
    async fn generate_chat_completion(
        &self,
        messages: &[ChatMessage],
        options: Option<&CompletionOptions>,
    ) -> Result<String, LLMError>;

    /// 供应商显示名称
    fn provider_name(&self) -> &'static str;

    /// 模型名称
    fn model_name(&self) -> &str;

    /// 注册时使用的唯一标识
    fn provider_id(&self) -> &str;
}

/// 线程安全 Provider
pub type DynProvider = Arc<dyn LLMProvider>;

/// Identity and default options shared by every adapter.
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    provider_id: String,
    model_name: String,
    default_options: CompletionOptions,
}

impl ProviderProfile {
    /// Creates a profile with [`CompletionOptions::default`] as the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LLMError::InvalidConfig`] when the provider id or model name is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use llm_relay::provider::ProviderProfile;
    /// let profile = ProviderProfile::new("claude-main", "claude-3-haiku-20240307").unwrap();
    /// assert_eq!(profile.provider_id(), "claude-main");
    /// assert!(ProviderProfile::new("", "gpt-4o").is_err());
    /// ```
    pub fn new(
        provider_id: impl Into<String>,
        model_name: impl Into<String>,
    ) -> Result<Self, LLMError> {
        let provider_id = provider_id.into();
        let model_name = model_name.into();
        require_non_empty("provider_id", &provider_id)?;
        require_non_empty("model_name", &model_name)?;
        Ok(Self {
            provider_id,
            model_name,
            default_options: CompletionOptions::default(),
        })
    }

    /// Replaces the provider-level defaults.
    pub fn with_default_options(mut self, options: CompletionOptions) -> Self {
        self.default_options = options;
        self
    }

    pub fn provider_id(&self) -> &str {
        &self.provider_id
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn default_options(&self) -> &CompletionOptions {
        &self.default_options
    }

    /// Shorthand for [`merge_options`] against this profile's defaults.
    pub fn effective_options(&self, call: Option<&CompletionOptions>) -> CompletionOptions {
        merge_options(call, &self.default_options)
    }
}

/// Picks the options for one call.
///
/// Call-level options, when present, are authoritative as a whole: no field falls back to
/// the defaults. Without them the defaults are used verbatim.
///
/// # Examples
///
/// ```
/// # use llm_relay::provider::merge_options;
/// # use llm_relay::types::CompletionOptions;
/// let defaults = CompletionOptions { max_tokens: 100, ..CompletionOptions::default() };
/// let call = CompletionOptions { temperature: 0.1, ..CompletionOptions::default() };
///
/// assert_eq!(merge_options(None, &defaults), defaults);
/// assert_eq!(merge_options(Some(&call), &defaults).max_tokens, 2000);
/// ```
pub fn merge_options(
    call: Option<&CompletionOptions>,
    defaults: &CompletionOptions,
) -> CompletionOptions {
    call.unwrap_or(defaults).clone()
}

/// Returns the body text of a 2xx response, or [`LLMError::Status`] with the raw body.
pub(crate) fn ensure_success(
    provider_id: &str,
    response: HttpResponse,
) -> Result<String, LLMError> {
    if response.is_success() {
        return response.into_string();
    }
    let status = response.status;
    let body = String::from_utf8_lossy(&response.body).into_owned();
    warn!(provider_id, status, body = %body, "provider returned error status");
    Err(LLMError::Status { status, body })
}
