//! Front door wired to the real forwarder, backed by a mock HTTP server.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use llmroute_core::{ProviderConfig, ProviderKind};
use llmroute_proxy::create_router;
use llmroute_upstream::UpstreamRouter;

fn generate(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/generate")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn streamed_openai_reply_reaches_the_client_as_plain_text() {
    let server = MockServer::start().await;
    let sse = concat!(
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n",
        "data: [DONE]\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse, "text/event-stream"))
        .mount(&server)
        .await;

    let config = ProviderConfig::openai(format!("{}/v1", server.uri()), "gpt", None);
    let router = UpstreamRouter::new(Arc::new(config)).unwrap();

    let response = create_router(Arc::new(router))
        .oneshot(generate(json!({ "prompt": "hi", "stream": true })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"Hello");
}

#[tokio::test]
async fn unsupported_provider_fails_every_generate_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = ProviderConfig::ollama(server.uri(), "m");
    config.kind = ProviderKind::parse("bedrock");
    let app = create_router(Arc::new(UpstreamRouter::new(Arc::new(config)).unwrap()));

    for body in [json!({ "prompt": "a" }), json!({ "prompt": "b", "stream": true })] {
        let response = app.clone().oneshot(generate(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let detail: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(detail, json!({ "detail": "Unsupported provider: bedrock" }));
    }
}
