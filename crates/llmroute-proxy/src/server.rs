//! Axum HTTP server for the generation front door.
//!
//! This module provides `create_router()` for mounting the routes on any
//! [`GenerationPort`], and `serve()` which runs them on a pre-bound
//! `TcpListener` until the cancellation token fires.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use futures_util::StreamExt;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use llmroute_core::{FragmentStream, GenerateRequest, GenerateResult, GenerationPort};

use crate::models::{ErrorResponse, GenerateResponse, HealthResponse, TagsResponse};

/// Shared application state for the front door.
#[derive(Clone)]
struct AppState {
    /// Forwarder every generation request is delegated to.
    port: Arc<dyn GenerationPort>,
}

/// Build the router with all routes, CORS and request tracing applied.
pub fn create_router(port: Arc<dyn GenerationPort>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/generate", post(generate))
        .route("/health", get(health_check))
        .route("/tags", get(list_tags))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { port })
}

/// Start the front door with a pre-bound listener.
///
/// Returns `Ok(())` on clean shutdown, or an error if the server fails.
pub async fn serve(
    listener: TcpListener,
    port: Arc<dyn GenerationPort>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!(
        provider = %port.provider_label(),
        model = %port.default_model(),
        "Front door listening on {addr}"
    );

    let app = create_router(port);

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("Front door shut down");
    Ok(())
}

/// Health check endpoint. Never consults the backend.
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse::healthy())
}

/// Static model list.
async fn list_tags() -> impl IntoResponse {
    debug!("GET /tags");
    Json(TagsResponse::fixed())
}

/// Normalize the request, route it, and shape the reply.
///
/// A body that does not deserialize is a client error and gets 422 with a
/// `detail` message, the same status FastAPI-style clients already expect
/// for validation failures. Anything that fails after parsing is a 500.
async fn generate(State(state): State<AppState>, body: Bytes) -> Response {
    let request: GenerateRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => {
            error!("Failed to parse request: {e}");
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorResponse::new(format!("Invalid request body: {e}"))),
            )
                .into_response();
        }
    };

    let request = request.normalize();
    let model = request
        .model
        .as_deref()
        .unwrap_or_else(|| state.port.default_model())
        .to_owned();

    info!(
        role = %request.role,
        model = %model,
        provider = %state.port.provider_label(),
        streaming = %request.stream,
        "POST /generate"
    );

    match state.port.route(request).await {
        Ok(GenerateResult::Text(text)) => Json(GenerateResponse { response: text }).into_response(),
        Ok(GenerateResult::Stream(fragments)) => stream_response(fragments),
        Err(e) => {
            error!("Error processing request: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            )
                .into_response()
        }
    }
}

/// Write each fragment to the client as soon as it is produced.
///
/// No framing is added. A transport error mid-stream aborts the body, so
/// the client keeps whatever it already received.
fn stream_response(fragments: FragmentStream) -> Response {
    let body_stream = fragments.map(|item| {
        item.map(Bytes::from).map_err(|e| {
            warn!("Stream truncated: {e}");
            std::io::Error::other(e)
        })
    });

    Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "text/plain; charset=utf-8")
        .header("cache-control", "no-cache")
        .header("x-accel-buffering", "no") // Disable nginx buffering
        .body(Body::from_stream(body_stream))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
