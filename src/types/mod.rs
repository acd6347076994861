//! Value objects describing a generation request.
//!
//! Both types are plain data: they are built per call, borrowed by the provider for the
//! duration of the HTTP exchange and dropped afterwards.

use serde::{Deserialize, Serialize};

/// One turn in a conversation.
///
/// The role is a free-form string. By convention it is `system`, `user` or `assistant`;
/// casing is normalized by each provider adapter, not here.
///
/// # Examples
///
/// ```
/// # use llm_relay::types::ChatMessage;
/// let msg = ChatMessage::user("What is the capital of France?").with_name("alice");
/// assert_eq!(msg.role, "user");
/// assert_eq!(msg.name.as_deref(), Some("alice"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender.
    pub role: String,
    /// Text content of the message.
    pub content: String,
    /// Optional name of the sender.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
            name: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }

    /// Attaches a sender name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Generation parameters.
///
/// A provider holds one set as its defaults. A call may pass its own set, which then
/// replaces the defaults as a whole (see [`crate::provider::merge_options`]). Fields
/// missing from a deserialized document fall back to [`CompletionOptions::default`].
///
/// # Examples
///
/// ```
/// # use llm_relay::types::CompletionOptions;
/// let options = CompletionOptions {
///     max_tokens: 50,
///     instructions: Some("Answer in one word.".into()),
///     ..CompletionOptions::default()
/// };
/// assert_eq!(options.temperature, 0.7);
/// assert_eq!(options.max_tokens, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionOptions {
    /// Sampling temperature (0.0 to 1.0).
    pub temperature: f64,
    /// Maximum number of tokens to generate.
    pub max_tokens: u32,
    /// Nucleus sampling cutoff (0.0 to 1.0).
    pub top_p: f64,
    /// Frequency penalty (-2.0 to 2.0).
    pub frequency_penalty: f64,
    /// Presence penalty (-2.0 to 2.0).
    pub presence_penalty: f64,
    /// Streaming flag. Carried for completeness, adapters always request a full response.
    pub stream: bool,
    /// Stop sequences.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    /// Free-text instructions for how the model should behave.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2000,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            stream: false,
            stop_sequences: None,
            instructions: None,
        }
    }
}
