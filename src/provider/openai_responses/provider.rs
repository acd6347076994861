use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::{LLMError, require_non_empty};
use crate::http::{DynHttpTransport, post_json_with_headers};
use crate::provider::{LLMProvider, ProviderProfile, ensure_success};
use crate::types::{ChatMessage, CompletionOptions};

use super::PROVIDER_NAME;
use super::request::{build_chat_body, build_prompt_body};
use super::response::extract_output_text;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// OpenAI Responses provider implementation.
///
/// Sends the prompt (or the ordered chat turns) as `input` together with the configured
/// model and any `instructions`, and returns the first output text.
pub struct OpenAiResponsesProvider {
    pub(crate) transport: DynHttpTransport,
    pub(crate) base_url: String,
    pub(crate) api_key: String,
    pub(crate) organization: Option<String>,
    pub(crate) project: Option<String>,
    pub(crate) profile: ProviderProfile,
}

impl OpenAiResponsesProvider {
    /// Creates a provider targeting the default `https://api.openai.com` endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`LLMError::InvalidConfig`] when the provider id, api key or model name is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use llm_relay::provider::openai_responses::OpenAiResponsesProvider;
    /// # use llm_relay::provider::LLMProvider;
    /// # use llm_relay::http::reqwest::default_dyn_transport;
    /// let transport = default_dyn_transport().expect("transport");
    /// let provider = OpenAiResponsesProvider::new(transport, "openai", "key", "gpt-4o-mini")
    ///     .expect("provider");
    /// assert_eq!(provider.provider_name(), "OpenAI");
    /// assert_eq!(provider.model_name(), "gpt-4o-mini");
    /// ```
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
            organization: None,
            project: None,
            profile: ProviderProfile::new(provider_id, model_name)?,
        })
    }

    /// Overrides the base URL, useful for proxies or gateways.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the optional `OpenAI-Organization` header.
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Sets the optional `OpenAI-Project` header.
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Replaces the options used when a call passes none.
    pub fn with_default_options(mut self, options: CompletionOptions) -> Self {
        self.profile = self.profile.with_default_options(options);
        self
    }

    pub(crate) fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/v1") {
            format!("{base}/responses")
        } else {
            format!("{base}/v1/responses")
        }
    }

    fn build_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key),
        );
        headers.insert("Accept".to_string(), "application/json".to_string());
        if let Some(org) = &self.organization {
            headers.insert("OpenAI-Organization".to_string(), org.clone());
        }
        if let Some(project) = &self.project {
            headers.insert("OpenAI-Project".to_string(), project.clone());
        }
        headers
    }

    async fn send_request(&self, body: Value) -> Result<String, LLMError> {
        debug!(provider_id = self.profile.provider_id(), "dispatching OpenAI Responses request");
        let response = post_json_with_headers(
            self.transport.as_ref(),
            self.endpoint(),
            self.build_headers(),
            &body,
        )
        .await?;
        let text = ensure_success(self.profile.provider_id(), response)?;
        extract_output_text(&text)
    }
}

#[async_trait]
impl LLMProvider for OpenAiResponsesProvider {
    async fn generate_completion(
        &self,
        prompt: &str,
        options: Option<&CompletionOptions>,
    ) -> Result<String, LLMError> {
        let options = self.profile.effective_options(options);
        let body = build_prompt_body(self.profile.model_name(), prompt, &options);
        self.send_request(body).await
    }

    async fn generate_chat_completion(
        &self,
        messages: &[ChatMessage],
        options: Option<&CompletionOptions>,
    ) -> Result<String, LLMError> {
        let options = self.profile.effective_options(options);
        let body = build_chat_body(self.profile.model_name(), messages, &options);
        self.send_request(body).await
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
