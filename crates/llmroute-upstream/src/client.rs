//! reqwest-backed [`GenerationPort`] implementation.
//!
//! Dispatch is purely on the static [`ProviderKind`]. The request's `role`
//! is logged and otherwise ignored. The effective model is resolved into a
//! local for each call; the shared configuration is read-only.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use llmroute_core::{
    GenerateResult, GenerationPort, NormalizedRequest, ProviderConfig, ProviderKind, RouteError,
};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::stream::fragment_stream;
use crate::{ollama, openai};

/// Forwards requests to the configured backend.
pub struct UpstreamRouter {
    /// HTTP client shared by every request.
    client: Client,
    config: Arc<ProviderConfig>,
}

impl UpstreamRouter {
    /// Create a router with a pooled client using the configured timeouts.
    pub fn new(config: Arc<ProviderConfig>) -> Result<Self, RouteError> {
        let client = Client::builder()
            .pool_max_idle_per_host(10)
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .build()
            .map_err(|e| RouteError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// The configuration this router was built with.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn call_ollama(
        &self,
        model: &str,
        req: &NormalizedRequest,
    ) -> Result<GenerateResult, RouteError> {
        let url = ollama::chat_url(&self.config.base_url);
        let payload = ollama::build_payload(model, &req.messages, req.stream, &req.options);

        info!("Calling Ollama at {url} (stream={})", req.stream);
        let response = self.post(&url, &payload, None).await?;

        if req.stream {
            Ok(GenerateResult::Stream(fragment_stream(
                response.bytes_stream(),
                ollama::decode_line,
            )))
        } else {
            let body = read_json(response).await?;
            Ok(GenerateResult::Text(ollama::extract_content(&body)))
        }
    }

    async fn call_openai(
        &self,
        model: &str,
        req: &NormalizedRequest,
    ) -> Result<GenerateResult, RouteError> {
        let url = openai::completions_url(&self.config.base_url);
        let payload = openai::build_payload(model, &req.messages, req.stream);
        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        info!("Calling API at {url} (stream={})", req.stream);
        let response = self.post(&url, &payload, Some(api_key)).await?;

        if req.stream {
            Ok(GenerateResult::Stream(fragment_stream(
                response.bytes_stream(),
                openai::decode_line,
            )))
        } else {
            let body = read_json(response).await?;
            Ok(GenerateResult::Text(openai::extract_content(&body)))
        }
    }

    /// POST JSON upstream. Non-2xx replies become errors carrying the body.
    async fn post(
        &self,
        url: &str,
        payload: &Value,
        bearer: Option<&str>,
    ) -> Result<reqwest::Response, RouteError> {
        let mut builder = self.client.post(url).json(payload);
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            error!("Failed to reach upstream at {url}: {e}");
            RouteError::transport(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Upstream error {status}: {body}");
            return Err(RouteError::UpstreamStatus {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

/// Read a buffered reply as one JSON value.
async fn read_json(response: reqwest::Response) -> Result<Value, RouteError> {
    let bytes = response.bytes().await.map_err(|e| {
        error!("Failed to read upstream response: {e}");
        RouteError::transport(e.to_string())
    })?;

    serde_json::from_slice(&bytes).map_err(|e| {
        error!("Failed to parse upstream JSON: {e}");
        RouteError::Decode(e.to_string())
    })
}

impl fmt::Debug for UpstreamRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamRouter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl GenerationPort for UpstreamRouter {
    async fn route(&self, req: NormalizedRequest) -> Result<GenerateResult, RouteError> {
        let model = self.config.resolve_model(req.model.as_deref());

        debug!(
            role = %req.role,
            model = %model,
            provider = %self.config.kind,
            "Routing request"
        );
        if let Some(format) = &req.format {
            debug!(format = %format, "Output format hint is not forwarded");
        }

        match &self.config.kind {
            ProviderKind::Ollama => self.call_ollama(model, &req).await,
            ProviderKind::OpenAi { .. } => self.call_openai(model, &req).await,
            ProviderKind::Unsupported(name) => {
                error!("Unsupported provider: {name}");
                Err(RouteError::configuration(format!(
                    "Unsupported provider: {name}"
                )))
            }
        }
    }

    fn provider_label(&self) -> String {
        self.config.kind.to_string()
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }
}
