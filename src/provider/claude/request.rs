use serde_json::{Map, Value};

use crate::types::{ChatMessage, CompletionOptions};

use super::wire::WireShape;

/// Stop sequence the legacy completion endpoint expects when the caller sets none.
const DEFAULT_STOP_SEQUENCE: &str = "\n\nHuman:";

/// Builds the body for a single-turn completion.
///
/// Messages shape wraps the prompt as one user turn; prompt shape forwards it unchanged.
pub(crate) fn build_completion_body(
    shape: WireShape,
    model: &str,
    prompt: &str,
    options: &CompletionOptions,
) -> Value {
    match shape {
        WireShape::Messages => {
            build_messages_body(model, &[ChatMessage::user(prompt)], options)
        }
        WireShape::Prompt => build_prompt_body(model, prompt.to_string(), options),
    }
}

/// Builds the body for a multi-turn completion.
pub(crate) fn build_chat_body(
    shape: WireShape,
    model: &str,
    messages: &[ChatMessage],
    options: &CompletionOptions,
) -> Value {
    match shape {
        WireShape::Messages => build_messages_body(model, messages, options),
        WireShape::Prompt => build_prompt_body(model, render_prompt(messages), options),
    }
}

fn build_messages_body(model: &str, messages: &[ChatMessage], options: &CompletionOptions) -> Value {
    let mut body = Map::new();
    body.insert("model".to_string(), Value::String(model.to_string()));

    // system 角色不能出现在 messages 数组中 折叠为顶层 system
    let mut system_texts = Vec::new();
    let mut turns = Vec::new();
    for message in messages {
        if message.role.eq_ignore_ascii_case("system") {
            system_texts.push(message.content.as_str());
            continue;
        }
        let mut turn = Map::new();
        turn.insert(
            "role".to_string(),
            Value::String(message.role.to_lowercase()),
        );
        turn.insert(
            "content".to_string(),
            Value::String(message.content.clone()),
        );
        turns.push(Value::Object(turn));
    }

    if !system_texts.is_empty() {
        body.insert(
            "system".to_string(),
            Value::String(system_texts.join("\n\n")),
        );
    }
    body.insert("messages".to_string(), Value::Array(turns));
    body.insert("max_tokens".to_string(), Value::from(options.max_tokens));
    body.insert("temperature".to_string(), Value::from(options.temperature));
    Value::Object(body)
}

fn build_prompt_body(model: &str, prompt: String, options: &CompletionOptions) -> Value {
    let stop_sequences = options
        .stop_sequences
        .clone()
        .unwrap_or_else(|| vec![DEFAULT_STOP_SEQUENCE.to_string()]);

    let mut body = Map::new();
    body.insert("model".to_string(), Value::String(model.to_string()));
    body.insert("prompt".to_string(), Value::String(prompt));
    body.insert(
        "max_tokens_to_sample".to_string(),
        Value::from(options.max_tokens),
    );
    body.insert("temperature".to_string(), Value::from(options.temperature));
    body.insert(
        "stop_sequences".to_string(),
        Value::Array(stop_sequences.into_iter().map(Value::String).collect()),
    );
    Value::Object(body)
}

/// Flattens a conversation into `\n\nHuman: ...\n\nAssistant: ...` form, ending with the
/// bare `Assistant:` cue the model completes from.
pub(crate) fn render_prompt(messages: &[ChatMessage]) -> String {
    let mut prompt = String::new();
    for message in messages {
        prompt.push_str("\n\n");
        prompt.push_str(map_prompt_role(&message.role));
        prompt.push_str(": ");
        prompt.push_str(&message.content);
    }
    prompt.push_str("\n\nAssistant:");
    prompt
}

fn map_prompt_role(role: &str) -> &str {
    if role.eq_ignore_ascii_case("user") {
        "Human"
    } else if role.eq_ignore_ascii_case("assistant") {
        "Assistant"
    } else {
        role
    }
}
