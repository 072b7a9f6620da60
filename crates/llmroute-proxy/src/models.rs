//! Wire types for the front door's JSON bodies.
//!
//! Request bodies deserialize straight into
//! [`llmroute_core::GenerateRequest`]; this module only holds responses.

use serde::{Deserialize, Serialize};

/// Buffered `POST /generate` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
}

/// `GET /health` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

/// `GET /tags` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagsResponse {
    pub models: Vec<ModelTag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelTag {
    pub name: String,
}

impl TagsResponse {
    /// Static list answered to clients probing for available models.
    /// It does not reflect the configured provider.
    pub fn fixed() -> Self {
        Self {
            models: ["mistral", "claude-2"]
                .into_iter()
                .map(|name| ModelTag {
                    name: name.to_string(),
                })
                .collect(),
        }
    }
}

/// Error body: `{"detail": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
