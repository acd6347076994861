use serde_json::Value;
use tracing::warn;

use crate::error::LLMError;

use super::PROVIDER_NAME;

/// Extracts the generated text from either Claude response layout.
///
/// The legacy `completion` field is checked first; otherwise the text of the first
/// `content[]` block whose `type` is `text` is returned. Both paths are accepted no matter
/// which endpoint was called.
pub(crate) fn extract_completion_text(body: &str) -> Result<String, LLMError> {
    let value: Value = serde_json::from_str(body).map_err(|err| {
        warn!(error = %err, "failed to parse Claude response body");
        LLMError::format(PROVIDER_NAME, format!("invalid JSON: {err}"), body)
    })?;

    if let Some(completion) = value.get("completion").and_then(Value::as_str) {
        return Ok(completion.to_string());
    }

    value
        .get("content")
        .and_then(Value::as_array)
        .and_then(|blocks| {
            blocks
                .iter()
                .find(|block| block.get("type").and_then(Value::as_str) == Some("text"))
        })
        .and_then(|block| block.get("text"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            warn!("Claude response carries neither completion nor a text content block");
            LLMError::format(
                PROVIDER_NAME,
                "response contains neither 'completion' nor a 'content' text block",
                body,
            )
        })
}
