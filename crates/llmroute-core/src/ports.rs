//! Port definitions (trait abstractions) for external systems.
//!
//! The HTTP front door only ever talks to a [`GenerationPort`]. The reqwest
//! forwarder in `llmroute-upstream` is the production implementation; tests
//! substitute their own.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{GenerateResult, NormalizedRequest};
use crate::error::RouteError;

/// Forwards a normalized generation request to a backend.
#[async_trait]
pub trait GenerationPort: Send + Sync + fmt::Debug {
    /// Route one request.
    ///
    /// Returns [`GenerateResult::Stream`] when `req.stream` is set, otherwise
    /// [`GenerateResult::Text`]. Errors are never retried.
    async fn route(&self, req: NormalizedRequest) -> Result<GenerateResult, RouteError>;

    /// Name of the configured provider, for diagnostics.
    fn provider_label(&self) -> String;

    /// Model used when a request carries no override.
    fn default_model(&self) -> &str;
}
