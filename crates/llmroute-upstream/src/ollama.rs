//! Local-chat (Ollama `/api/chat`) wire format.

use llmroute_core::ChatMessage;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::stream::LineEvent;

/// Context window requested from the local server on every call.
pub const NUM_CTX: u64 = 32768;

/// How long the local server keeps the model loaded after the call.
pub const KEEP_ALIVE: &str = "5m";

/// `{base}/api/chat`.
pub fn chat_url(base_url: &str) -> String {
    format!("{}/api/chat", base_url.trim_end_matches('/'))
}

/// Build the `/api/chat` request body.
///
/// Request-supplied options are laid over the defaults, so a caller may
/// lower `num_ctx` or add sampling parameters.
pub fn build_payload(
    model: &str,
    messages: &[ChatMessage],
    stream: bool,
    options: &Map<String, Value>,
) -> Value {
    let mut merged = Map::new();
    merged.insert("num_ctx".to_string(), json!(NUM_CTX));
    merged.extend(options.iter().map(|(k, v)| (k.clone(), v.clone())));

    json!({
        "model": model,
        "messages": messages,
        "stream": stream,
        "options": merged,
        "keep_alive": KEEP_ALIVE,
    })
}

/// `message.content` of a buffered reply, or empty.
pub fn extract_content(body: &Value) -> String {
    body["message"]["content"]
        .as_str()
        .unwrap_or("")
        .to_string()
}

/// Decode one NDJSON line: `{"message":{"content":"..."},"done":false}`.
///
/// A line with `done: true` still contributes its content before the
/// stream terminates.
pub fn decode_line(line: &str) -> LineEvent {
    let event: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            debug!("Skipping malformed NDJSON line: {e}");
            return LineEvent::Skip;
        }
    };

    let fragment = event["message"]["content"].as_str().map(str::to_owned);

    if event["done"].as_bool().unwrap_or(false) {
        LineEvent::Finish(fragment)
    } else {
        fragment.map_or(LineEvent::Skip, LineEvent::Fragment)
    }
}
