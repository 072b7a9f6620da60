//! CLI entry point - the composition root.
//!
//! This is the ONLY place where the configuration, the forwarder and the
//! HTTP front door are wired together.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use llmroute_cli::{Cli, logging};
use llmroute_core::{GenerationPort, ProviderConfig, ProviderKind};
use llmroute_upstream::UpstreamRouter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before anything reads them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config = Arc::new(ProviderConfig::from_env()?);
    info!(
        "Initializing with provider: {}, model: {}",
        config.kind, config.default_model
    );
    match &config.kind {
        ProviderKind::Ollama => info!("Ollama URL: {}", config.base_url),
        ProviderKind::OpenAi { .. } => info!("API base URL: {}", config.base_url),
        ProviderKind::Unsupported(name) => {
            warn!("Unsupported provider '{name}': every /generate call will fail");
        }
    }

    let router: Arc<dyn GenerationPort> = Arc::new(UpstreamRouter::new(config)?);

    let (host, port) = cli.listen_addr();
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl-C, shutting down");
                shutdown.cancel();
            }
            Err(e) => warn!("Failed to listen for Ctrl-C: {e}"),
        }
    });

    llmroute_proxy::serve(listener, router, cancel).await
}
