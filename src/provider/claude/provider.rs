use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::{LLMError, require_non_empty};
use crate::http::{DynHttpTransport, post_json_with_headers};
use crate::provider::{LLMProvider, ProviderProfile, ensure_success};
use crate::types::{ChatMessage, CompletionOptions};

use super::PROVIDER_NAME;
use super::request::{build_chat_body, build_completion_body};
use super::response::extract_completion_text;
use super::wire::WireShape;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_VERSION: &str = "2023-06-01";

/// Anthropic Claude Provider 按模型名选择 Messages 或 Text Completions 线格式
pub struct ClaudeProvider {
    pub(crate) transport: DynHttpTransport,
    pub(crate) base_url: String,
    pub(crate) api_key: String,
    pub(crate) version: String,
    pub(crate) profile: ProviderProfile,
}

impl ClaudeProvider {
    /// 使用默认 base_url 与 anthropic-version 创建 Provider
    ///
    /// # Errors
    ///
    /// Returns [`LLMError::InvalidConfig`] when the provider id, api key or model name is
    /// empty.
    pub fn new(
        transport: DynHttpTransport,
        provider_id: impl Into<String>,
        api_key: impl Into<String>,
        model_name: impl Into<String>,
    ) -> Result<Self, LLMError> {
        let api_key = api_key.into();
        require_non_empty("api_key", &api_key)?;
        Ok(Self {
            transport,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            version: DEFAULT_VERSION.to_string(),
            profile: ProviderProfile::new(provider_id, model_name)?,
        })
    }

    /// 自定义 base_url，便于接入代理或兼容层
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 自定义 Anthropic API 版本（anthropic-version）
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// 设置调用方未传 options 时使用的默认参数
    pub fn with_default_options(mut self, options: CompletionOptions) -> Self {
        self.profile = self.profile.with_default_options(options);
        self
    }

    /// Wire shape used for this provider's model.
    pub fn wire_shape(&self) -> WireShape {
        WireShape::for_model(self.profile.model_name())
    }

    pub(crate) fn endpoint(&self, shape: WireShape) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = shape.path();
        if base.ends_with("/v1") {
            format!("{base}/{path}")
        } else {
            format!("{base}/v1/{path}")
        }
    }

    fn build_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert("x-api-key".to_string(), self.api_key.clone());
        headers.insert("Accept".to_string(), "application/json".to_string());
        headers.insert("anthropic-version".to_string(), self.version.clone());
        headers
    }

    async fn send_request(&self, shape: WireShape, body: Value) -> Result<String, LLMError> {
        debug!(
            provider_id = self.profile.provider_id(),
            shape = ?shape,
            "dispatching Claude request"
        );
        let response = post_json_with_headers(
            self.transport.as_ref(),
            self.endpoint(shape),
            self.build_headers(),
            &body,
        )
        .await?;
        let text = ensure_success(self.profile.provider_id(), response)?;
        extract_completion_text(&text)
    }
}

#[async_trait]
impl LLMProvider for ClaudeProvider {
    async fn generate_completion(
        &self,
        prompt: &str,
        options: Option<&CompletionOptions>,
    ) -> Result<String, LLMError> {
        let options = self.profile.effective_options(options);
        let shape = self.wire_shape();
        let body = build_completion_body(shape, self.profile.model_name(), prompt, &options);
        self.send_request(shape, body).await
    }

    async fn generate_chat_completion(
        &self,
        messages: &[ChatMessage],
        options: Option<&CompletionOptions>,
    ) -> Result<String, LLMError> {
        let options = self.profile.effective_options(options);
        let shape = self.wire_shape();
        let body = build_chat_body(shape, self.profile.model_name(), messages, &options);
        self.send_request(shape, body).await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn model_name(&self) -> &str {
        self.profile.model_name()
    }

    fn provider_id(&self) -> &str {
        self.profile.provider_id()
    }
}
