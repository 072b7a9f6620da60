//! OpenAI-compatible chat-completions wire format.

use llmroute_core::ChatMessage;
use serde_json::{Value, json};
use tracing::debug;

use crate::stream::LineEvent;

const COMPLETIONS_PATH: &str = "/chat/completions";

/// Target URL: `base_url` as-is if it already names the completions
/// endpoint, otherwise `base_url` + `/chat/completions`.
pub fn completions_url(base_url: &str) -> String {
    if base_url.ends_with(COMPLETIONS_PATH) {
        base_url.to_string()
    } else {
        format!("{}{COMPLETIONS_PATH}", base_url.trim_end_matches('/'))
    }
}

/// Build the chat-completions request body.
pub fn build_payload(model: &str, messages: &[ChatMessage], stream: bool) -> Value {
    json!({
        "model": model,
        "messages": messages,
        "stream": stream,
    })
}

/// `choices[0].message.content` of a buffered reply, or empty.
pub fn extract_content(body: &Value) -> String {
    body["choices"][0]["message"]["content"]
        .as_str()
        .unwrap_or("")
        .to_string()
}

/// Decode one SSE line: `data: {"choices":[{"delta":{"content":"..."}}]}`.
pub fn decode_line(line: &str) -> LineEvent {
    let Some(data) = line.strip_prefix("data: ") else {
        return LineEvent::Skip;
    };

    if data == "[DONE]" {
        return LineEvent::Finish(None);
    }

    match serde_json::from_str::<Value>(data) {
        Ok(chunk) => chunk["choices"][0]["delta"]["content"]
            .as_str()
            .map_or(LineEvent::Skip, |content| {
                LineEvent::Fragment(content.to_string())
            }),
        Err(e) => {
            debug!("Skipping malformed SSE data: {e}");
            LineEvent::Skip
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completions_url_is_appended_once() {
        assert_eq!(
            completions_url("https://api.openai.com/v1"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            completions_url("http://gateway/v1/chat/completions"),
            "http://gateway/v1/chat/completions"
        );
    }

    #[test]
    fn completions_url_ignores_trailing_slash() {
        assert_eq!(
            completions_url("https://api.openai.com/v1/"),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn payload_has_only_model_messages_stream() {
        let body = build_payload("gpt-4o-mini", &[ChatMessage::new("system", "s")], false);
        assert_eq!(
            body,
            json!({
                "model": "gpt-4o-mini",
                "messages": [{ "role": "system", "content": "s" }],
                "stream": false,
            })
        );
    }

    #[test]
    fn empty_choices_extract_to_empty_string() {
        assert_eq!(extract_content(&json!({ "choices": [] })), "");
        assert_eq!(
            extract_content(&json!({ "choices": [{ "message": { "content": "ok" } }] })),
            "ok"
        );
    }

    #[test]
    fn decode_line_handles_sse_framing() {
        assert_eq!(
            decode_line(r#"data: {"choices":[{"delta":{"content":"x"}}]}"#),
            LineEvent::Fragment("x".to_string())
        );
        assert_eq!(decode_line("data: [DONE]"), LineEvent::Finish(None));
        assert_eq!(decode_line(": keep-alive"), LineEvent::Skip);
        assert_eq!(decode_line("event: message"), LineEvent::Skip);
        assert_eq!(decode_line("data: {broken"), LineEvent::Skip);
        assert_eq!(
            decode_line(r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#),
            LineEvent::Skip
        );
        assert_eq!(decode_line(r#"data: {"choices":[]}"#), LineEvent::Skip);
    }
}
