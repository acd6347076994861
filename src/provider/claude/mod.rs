//! Adapter for Anthropic Claude.
//!
//! Claude exposes two wire formats behind one API surface: the structured Messages API
//! (`/v1/messages`) for the claude-2/claude-3 families and the legacy Text Completions API
//! (`/v1/complete`) for everything else. [`WireShape::for_model`] picks one per call.

mod provider;
mod request;
mod response;
mod wire;

pub use provider::ClaudeProvider;
pub use wire::WireShape;

pub(crate) const PROVIDER_NAME: &str = "Anthropic-Claude";
