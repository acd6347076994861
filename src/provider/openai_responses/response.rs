use serde_json::Value;
use tracing::warn;

use crate::error::LLMError;

use super::PROVIDER_NAME;

/// Reads `output[0].content[0].text` from a Responses payload.
pub(crate) fn extract_output_text(body: &str) -> Result<String, LLMError> {
    let value: Value = serde_json::from_str(body).map_err(|err| {
        warn!(error = %err, "failed to parse OpenAI Responses body");
        LLMError::format(PROVIDER_NAME, format!("invalid JSON: {err}"), body)
    })?;

    value
        .get("output")
        .and_then(|output| output.get(0))
        .and_then(|item| item.get("content"))
        .and_then(|content| content.get(0))
        .and_then(|part| part.get("text"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            warn!("OpenAI Responses body has no output[0].content[0].text");
            LLMError::format(PROVIDER_NAME, "missing output[0].content[0].text", body)
        })
}
