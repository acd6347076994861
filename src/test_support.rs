//! In-process transport used by unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::LLMError;
use crate::http::{HttpRequest, HttpResponse, HttpTransport};

/// Answers every request with a fixed status and body and records what it was sent.
pub(crate) struct MockTransport {
    status: u16,
    body: Vec<u8>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub(crate) fn new(status: u16, body: impl Into<String>) -> Arc<Self> {
        Self::bytes(status, body.into().into_bytes())
    }

    /// Replies with a raw body that need not be UTF-8.
    pub(crate) fn bytes(status: u16, body: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            status,
            body,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn json(status: u16, body: Value) -> Arc<Self> {
        Self::new(status, body.to_string())
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("lock").clone()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests()
            .pop()
            .expect("transport should have received a request")
    }

    pub(crate) fn last_body(&self) -> Value {
        let body = self.last_request().body.expect("request body");
        serde_json::from_slice(&body).expect("request body should be JSON")
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, LLMError> {
        self.requests.lock().expect("lock").push(request);
        Ok(HttpResponse {
            status: self.status,
            headers: HashMap::new(),
            body: self.body.clone(),
        })
    }
}
