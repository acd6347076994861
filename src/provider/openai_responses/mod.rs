//! Adapter for the OpenAI Responses API (`POST /v1/responses`).

mod provider;
mod request;
mod response;

pub use provider::OpenAiResponsesProvider;

pub(crate) const PROVIDER_NAME: &str = "OpenAI";
