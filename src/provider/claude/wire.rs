/// Request/response layout expected by a Claude model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireShape {
    /// `POST /messages` with a `{role, content}` array and a top-level `system` field.
    Messages,
    /// `POST /complete` with a single flattened `Human:`/`Assistant:` prompt string.
    Prompt,
}

/// Model-name prefixes served by the Messages API.
const MESSAGES_MODEL_PREFIXES: [&str; 2] = ["claude-2", "claude-3"];

impl WireShape {
    /// Selects the wire shape from the model name.
    ///
    /// # Examples
    ///
    /// ```
    /// # use llm_relay::provider::claude::WireShape;
    /// assert_eq!(WireShape::for_model("claude-3-haiku-20240307"), WireShape::Messages);
    /// assert_eq!(WireShape::for_model("claude-instant-1.2"), WireShape::Prompt);
    /// ```
    pub fn for_model(model: &str) -> Self {
        let model = model.trim().to_ascii_lowercase();
        if MESSAGES_MODEL_PREFIXES
            .iter()
            .any(|prefix| model.starts_with(prefix))
        {
            WireShape::Messages
        } else {
            WireShape::Prompt
        }
    }

    /// Endpoint path segment below `/v1`.
    pub(crate) fn path(self) -> &'static str {
        match self {
            WireShape::Messages => "messages",
            WireShape::Prompt => "complete",
        }
    }
}
