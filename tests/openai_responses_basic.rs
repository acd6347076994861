use std::collections::HashMap;
use std::env;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dotenvy::dotenv;
use llm_relay::http::reqwest::ReqwestTransport;
use llm_relay::http::{HttpRequest, HttpResponse, HttpTransport};
use llm_relay::provider::openai_responses::OpenAiResponsesProvider;
use llm_relay::{ChatMessage, CompletionOptions, LLMError, LLMProvider};
use serde_json::{Value, json};

/// Replays one canned response and keeps the requests it saw.
struct ReplayTransport {
    status: u16,
    body: String,
    seen: Mutex<Vec<HttpRequest>>,
}

impl ReplayTransport {
    fn new(status: u16, body: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            status,
            body: body.into(),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn last_body(&self) -> Value {
        let seen = self.seen.lock().expect("lock");
        let request = seen.last().expect("a request should have been sent");
        serde_json::from_slice(request.body.as_deref().expect("body")).expect("json body")
    }
}

#[async_trait]
impl HttpTransport for ReplayTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, LLMError> {
        self.seen.lock().expect("lock").push(request);
        Ok(HttpResponse {
            status: self.status,
            headers: HashMap::new(),
            body: self.body.clone().into_bytes(),
        })
    }
}

/// The documented success shape yields exactly the first output text.
#[tokio::test]
async fn openai_responses_success_returns_output_text() {
    let transport = ReplayTransport::new(200, r#"{"output":[{"content":[{"text":"Paris"}]}]}"#);
    let provider =
        OpenAiResponsesProvider::new(transport.clone(), "openai", "sk-test", "gpt-4o-mini")
            .expect("provider");

    let text = provider
        .generate_completion("What is the capital of France?", None)
        .await
        .expect("completion should succeed");

    assert_eq!(text, "Paris");
}

/// Chat turns are forwarded in order as the `input` array, with instructions at the top level.
#[tokio::test]
async fn openai_responses_chat_sends_ordered_input() {
    let transport = ReplayTransport::new(200, r#"{"output":[{"content":[{"text":"Rome"}]}]}"#);
    let provider =
        OpenAiResponsesProvider::new(transport.clone(), "openai", "sk-test", "gpt-4o-mini")
            .expect("provider");
    let options = CompletionOptions {
        instructions: Some("Answer with the city name only.".to_string()),
        ..CompletionOptions::default()
    };

    let text = provider
        .generate_chat_completion(
            &[
                ChatMessage::user("What is the capital of France?"),
                ChatMessage::assistant("Paris"),
                ChatMessage::user("And of Italy?"),
            ],
            Some(&options),
        )
        .await
        .expect("chat should succeed");
    assert_eq!(text, "Rome");

    assert_eq!(
        transport.last_body(),
        json!({
            "model": "gpt-4o-mini",
            "input": [
                { "role": "user", "content": "What is the capital of France?" },
                { "role": "assistant", "content": "Paris" },
                { "role": "user", "content": "And of Italy?" }
            ],
            "instructions": "Answer with the city name only."
        })
    );
}

/// A non-2xx response raises an error carrying the status code and the raw body.
#[tokio::test]
async fn openai_responses_error_status_includes_code_and_body() {
    let raw = r#"{"error":{"message":"The model `gpt-bogus` does not exist","type":"invalid_request_error","code":"model_not_found"}}"#;
    let transport = ReplayTransport::new(404, raw);
    let provider =
        OpenAiResponsesProvider::new(transport, "openai", "sk-test", "gpt-bogus").expect("provider");

    let err = provider
        .generate_completion("hi", None)
        .await
        .expect_err("404 should fail");

    let message = err.to_string();
    assert!(message.contains("404"), "unexpected message: {message}");
    assert!(message.contains(raw), "unexpected message: {message}");
}

/// A success status with an unexpected body is a format error.
#[tokio::test]
async fn openai_responses_unexpected_body_is_format_error() {
    let transport = ReplayTransport::new(200, r#"{"output":[]}"#);
    let provider =
        OpenAiResponsesProvider::new(transport, "openai", "sk-test", "gpt-4o-mini").expect("provider");

    match provider.generate_completion("hi", None).await {
        Err(LLMError::Format { body, .. }) => assert_eq!(body, r#"{"output":[]}"#),
        other => panic!("expected format error, got {other:?}"),
    }
}

/// Connectivity test against the real OpenAI Responses endpoint.
#[tokio::test]
#[ignore = "requires valid OpenAI Responses endpoint"]
async fn openai_responses_basic_text_dialog_live() {
    dotenv().ok();
    let Some(provider) = build_provider_from_env() else {
        return;
    };

    let options = CompletionOptions {
        max_tokens: 50,
        ..CompletionOptions::default()
    };
    let text = provider
        .generate_chat_completion(
            &[
                ChatMessage::system("You are a helpful assistant."),
                ChatMessage::user("What is the capital of France?"),
            ],
            Some(&options),
        )
        .await
        .expect("OpenAI text dialog request should succeed");

    assert!(
        text.to_lowercase().contains("paris"),
        "response should mention Paris; actual text: {text}"
    );
}

fn build_provider_from_env() -> Option<OpenAiResponsesProvider> {
    let api_key = env::var("OPENAI_API_KEY").ok()?;
    let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
    let transport = Arc::new(ReqwestTransport::default_client().ok()?);
    let mut provider = OpenAiResponsesProvider::new(transport, "openai-live", api_key, model).ok()?;
    if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
        provider = provider.with_base_url(base_url);
    }
    Some(provider)
}
