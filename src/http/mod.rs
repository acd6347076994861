use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::error::LLMError;

/// HTTP methods the transport can issue. Every vendor call is a POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
}

/// Minimal HTTP request representation shared across providers.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Builds a POST request with a JSON request body.
    ///
    /// The helper sets the `Content-Type` header to `application/json` and stores the
    /// provided buffer as the body.
    ///
    /// # Examples
    ///
    /// ```
    /// use llm_relay::http::{HttpMethod, HttpRequest};
    ///
    /// let request = HttpRequest::post_json("https://example.com", br"{}".to_vec());
    /// assert_eq!(request.method, HttpMethod::Post);
    /// assert_eq!(request.headers.get("Content-Type"), Some(&"application/json".to_string()));
    /// ```
    pub fn post_json(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: HashMap::from([("Content-Type".to_string(), "application/json".to_string())]),
            body: Some(body),
            timeout: None,
        }
    }

    /// Merges additional headers into the request, replacing entries with the same name.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use llm_relay::http::HttpRequest;
    ///
    /// let request = HttpRequest::post_json("https://example.com", br"{}".to_vec())
    ///     .with_headers(HashMap::from([("x-api-key".into(), "test".into())]));
    /// assert_eq!(request.headers.get("x-api-key"), Some(&"test".to_string()));
    /// assert_eq!(request.headers.get("Content-Type"), Some(&"application/json".to_string()));
    /// ```
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }
}

/// Minimal HTTP response representation.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns `true` for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Converts the body into a UTF-8 string.
    ///
    /// # Examples
    ///
    /// ```
    /// use llm_relay::http::HttpResponse;
    ///
    /// let response = HttpResponse { status: 200, headers: Default::default(), body: b"ok".to_vec() };
    /// assert_eq!(response.into_string().unwrap(), "ok");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`LLMError::Transport`] when the body cannot be interpreted as UTF-8.
    pub fn into_string(self) -> Result<String, LLMError> {
        String::from_utf8(self.body).map_err(|err| LLMError::transport(err.to_string()))
    }
}

/// Transport abstraction used to decouple providers from the concrete HTTP client.
///
/// A transport is created once and shared by every provider through
/// [`DynHttpTransport`], so implementations should pool connections internally.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a request and resolves when the full response is available.
    ///
    /// # Examples
    ///
    /// ```
    /// # use async_trait::async_trait;
    /// # use llm_relay::http::{HttpTransport, HttpRequest, HttpResponse};
    /// # use llm_relay::error::LLMError;
    /// struct MemoryTransport;
    ///
    /// #[async_trait]
    /// impl HttpTransport for MemoryTransport {
    ///     async fn send(&self, request: HttpRequest) -> Result<HttpResponse, LLMError> {
    ///         Ok(HttpResponse { status: 200, headers: request.headers, body: b"ok".to_vec() })
    ///     }
    /// }
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let response = MemoryTransport
    ///     .send(HttpRequest::post_json("https://example.com", br"{}".to_vec()))
    ///     .await
    ///     .unwrap();
    /// assert_eq!(response.status, 200);
    /// # });
    /// ```
    ///
    /// # Errors
    ///
    /// Implementations map network failures to [`LLMError::Transport`]. A non-2xx status
    /// is not an error at this level; providers inspect it themselves.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, LLMError>;
}

/// Thread-safe handle to a transport implementation.
pub type DynHttpTransport = Arc<dyn HttpTransport>;

/// Serializes a body to JSON, attaches headers, and issues a POST request.
///
/// # Errors
///
/// Returns [`LLMError::Validation`] if serialization fails or forwards the error raised by
/// [`HttpTransport::send`].
pub async fn post_json_with_headers<T: Serialize>(
    transport: &dyn HttpTransport,
    url: impl Into<String>,
    headers: HashMap<String, String>,
    body: &T,
) -> Result<HttpResponse, LLMError> {
    let payload = serde_json::to_vec(body).map_err(|err| LLMError::Validation {
        message: format!("failed to serialize request: {err}"),
    })?;
    let url = url.into();
    debug!(url = %url, bytes = payload.len(), "sending POST request");
    let request = HttpRequest::post_json(url, payload).with_headers(headers);
    let response = transport.send(request).await?;
    debug!(status = response.status, "received response");
    Ok(response)
}

pub mod reqwest;

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser;
    use std::sync::Mutex;

    /// Transport that panics if `send` is invoked.
    struct PanicTransport;

    #[async_trait]
    impl HttpTransport for PanicTransport {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, LLMError> {
            panic!("send should not be called");
        }
    }

    /// Transport that records the request it receives.
    #[derive(Default)]
    struct CapturingTransport {
        seen: Mutex<Option<HttpRequest>>,
    }

    #[async_trait]
    impl HttpTransport for CapturingTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, LLMError> {
            *self.seen.lock().expect("lock") = Some(request);
            Ok(HttpResponse {
                status: 204,
                headers: HashMap::new(),
                body: Vec::new(),
            })
        }
    }

    /// Body type that intentionally fails serialization.
    struct NonSerializableBody;

    impl Serialize for NonSerializableBody {
        fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            Err(ser::Error::custom(
                "intentional serialization failure for test",
            ))
        }
    }

    #[tokio::test]
    async fn post_json_with_headers_returns_validation_on_serde_error() {
        let result = post_json_with_headers(
            &PanicTransport,
            "http://example.com",
            HashMap::new(),
            &NonSerializableBody,
        )
        .await;

        match result {
            Err(LLMError::Validation { message }) => {
                assert!(
                    message.contains("failed to serialize request"),
                    "unexpected validation message: {message}"
                );
            }
            Ok(_) => panic!("expected validation error for non serializable body"),
            other => panic!("unexpected error type: {other:?}"),
        }
    }

    #[tokio::test]
    async fn post_json_with_headers_keeps_content_type_and_custom_headers() {
        let transport = CapturingTransport::default();
        let headers = HashMap::from([("x-api-key".to_string(), "secret".to_string())]);

        let response = post_json_with_headers(
            &transport,
            "http://example.com/v1/messages",
            headers,
            &serde_json::json!({ "ping": "pong" }),
        )
        .await
        .expect("request should be sent");
        assert_eq!(response.status, 204);
        assert!(response.is_success());

        let seen = transport.seen.lock().expect("lock").take().expect("request");
        assert_eq!(seen.method, HttpMethod::Post);
        assert_eq!(seen.url, "http://example.com/v1/messages");
        assert_eq!(seen.headers.get("x-api-key"), Some(&"secret".to_string()));
        assert_eq!(
            seen.headers.get("Content-Type"),
            Some(&"application/json".to_string())
        );
        let body: serde_json::Value =
            serde_json::from_slice(&seen.body.expect("body")).expect("json body");
        assert_eq!(body, serde_json::json!({ "ping": "pong" }));
    }
}
