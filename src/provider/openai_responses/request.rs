use serde_json::{Map, Value};

use crate::types::{ChatMessage, CompletionOptions};

/// Single-turn body: `input` is the raw prompt string.
pub(crate) fn build_prompt_body(model: &str, prompt: &str, options: &CompletionOptions) -> Value {
    build_body(model, Value::String(prompt.to_string()), options)
}

/// Multi-turn body: `input` is the ordered `{role, content}` array. Roles are sent as given.
pub(crate) fn build_chat_body(
    model: &str,
    messages: &[ChatMessage],
    options: &CompletionOptions,
) -> Value {
    let input = messages
        .iter()
        .map(|message| {
            let mut obj = Map::new();
            obj.insert("role".to_string(), Value::String(message.role.clone()));
            obj.insert(
                "content".to_string(),
                Value::String(message.content.clone()),
            );
            Value::Object(obj)
        })
        .collect();
    build_body(model, Value::Array(input), options)
}

fn build_body(model: &str, input: Value, options: &CompletionOptions) -> Value {
    let mut body = Map::new();
    body.insert("model".to_string(), Value::String(model.to_string()));
    body.insert("input".to_string(), input);
    if let Some(instructions) = &options.instructions {
        body.insert(
            "instructions".to_string(),
            Value::String(instructions.clone()),
        );
    }
    Value::Object(body)
}
