//! Request and result domain types.
//!
//! Nothing here is persisted; every value lives for the duration of one
//! request.

use std::fmt;

use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::RouteError;

/// Role label applied when the caller does not send one.
pub const DEFAULT_REQUEST_ROLE: &str = "Orchestrator";

/// A single chat message. Order within a conversation is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "user", "assistant", "system", or any other label the backend accepts.
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// Create a message with the given role.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Create a `user` message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

/// Body of `POST /generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Advisory label. Logged, never used for dispatch.
    #[serde(default = "default_role")]
    pub role: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<ChatMessage>>,
    /// Shorthand for a single user message.
    #[serde(default)]
    pub prompt: Option<String>,
    /// Per-request override of the configured default model.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub stream: Option<bool>,
    /// Provider-specific tuning parameters, passed through opaquely.
    #[serde(default)]
    pub options: Option<Map<String, Value>>,
    /// Output format hint. Accepted and ignored.
    #[serde(default)]
    pub format: Option<String>,
}

#[allow(clippy::unnecessary_wraps)]
fn default_role() -> Option<String> {
    Some(DEFAULT_REQUEST_ROLE.to_string())
}

impl Default for GenerateRequest {
    fn default() -> Self {
        Self {
            role: default_role(),
            messages: None,
            prompt: None,
            model: None,
            stream: None,
            options: None,
            format: None,
        }
    }
}

impl GenerateRequest {
    /// Build a buffered request from a bare prompt.
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            ..Self::default()
        }
    }

    /// Reduce the request to the shape the forwarder consumes.
    ///
    /// `messages` wins whenever it is non-empty. Otherwise a present `prompt`
    /// becomes exactly one `user` message. With neither, the conversation is
    /// forwarded empty.
    #[must_use]
    pub fn normalize(self) -> NormalizedRequest {
        let messages = match (self.messages, self.prompt) {
            (Some(messages), _) if !messages.is_empty() => messages,
            (_, Some(prompt)) => vec![ChatMessage::user(prompt)],
            _ => {
                warn!("Request has neither messages nor prompt; forwarding an empty conversation");
                Vec::new()
            }
        };

        NormalizedRequest {
            role: self
                .role
                .unwrap_or_else(|| DEFAULT_REQUEST_ROLE.to_string()),
            messages,
            model: self.model.filter(|m| !m.is_empty()),
            stream: self.stream.unwrap_or(false),
            options: self.options.unwrap_or_default(),
            format: self.format,
        }
    }
}

/// Request as seen by the forwarder: a concrete message list plus scalars.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRequest {
    pub role: String,
    pub messages: Vec<ChatMessage>,
    /// Model override; `None` means "use the configured default".
    pub model: Option<String>,
    pub stream: bool,
    pub options: Map<String, Value>,
    pub format: Option<String>,
}

/// Lazy, finite, non-restartable sequence of text fragments.
///
/// Each poll drives at most one read from the backend body.
pub type FragmentStream = BoxStream<'static, Result<String, RouteError>>;

/// Outcome of a routed generation.
pub enum GenerateResult {
    /// Buffered mode: the full generated text.
    Text(String),
    /// Streaming mode: fragments in the order the backend produced them.
    Stream(FragmentStream),
}

impl fmt::Debug for GenerateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> GenerateRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn prompt_becomes_single_user_message() {
        let req = parse(json!({ "prompt": "Count from 1 to 5" }));
        let normalized = req.normalize();

        assert_eq!(normalized.messages, vec![ChatMessage::user("Count from 1 to 5")]);
    }

    #[test]
    fn empty_messages_fall_back_to_prompt() {
        let req = parse(json!({ "messages": [], "prompt": "hi" }));
        assert_eq!(req.normalize().messages, vec![ChatMessage::user("hi")]);
    }

    #[test]
    fn messages_take_precedence_over_prompt() {
        let req = parse(json!({
            "messages": [
                { "role": "system", "content": "be terse" },
                { "role": "user", "content": "hello" }
            ],
            "prompt": "ignored"
        }));

        let normalized = req.normalize();
        assert_eq!(
            normalized.messages,
            vec![
                ChatMessage::new("system", "be terse"),
                ChatMessage::user("hello"),
            ]
        );
    }

    #[test]
    fn neither_messages_nor_prompt_yields_empty_conversation() {
        let normalized = parse(json!({})).normalize();
        assert!(normalized.messages.is_empty());
    }

    #[test]
    fn defaults_match_documented_shape() {
        let normalized = parse(json!({ "prompt": "x" })).normalize();

        assert_eq!(normalized.role, "Orchestrator");
        assert_eq!(normalized.model, None);
        assert!(!normalized.stream);
        assert!(normalized.options.is_empty());
        assert_eq!(normalized.format, None);
    }

    #[test]
    fn explicit_nulls_are_tolerated() {
        let req = parse(json!({
            "role": null,
            "messages": null,
            "prompt": "x",
            "model": null,
            "stream": null,
            "options": null,
            "format": null
        }));

        let normalized = req.normalize();
        assert_eq!(normalized.role, "Orchestrator");
        assert!(!normalized.stream);
    }

    #[test]
    fn empty_model_override_counts_as_absent() {
        let normalized = parse(json!({ "prompt": "x", "model": "" })).normalize();
        assert_eq!(normalized.model, None);
    }

    #[test]
    fn options_and_flags_pass_through() {
        let normalized = parse(json!({
            "role": "Development",
            "prompt": "x",
            "model": "mistral",
            "stream": true,
            "options": { "temperature": 0.2 },
            "format": "json"
        }))
        .normalize();

        assert_eq!(normalized.role, "Development");
        assert_eq!(normalized.model.as_deref(), Some("mistral"));
        assert!(normalized.stream);
        assert_eq!(normalized.options["temperature"], json!(0.2));
        assert_eq!(normalized.format.as_deref(), Some("json"));
    }
}
