#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod config;
pub mod domain;
pub mod error;
pub mod ports;

// Re-export commonly used types for convenience
pub use config::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MODEL, DEFAULT_OLLAMA_BASE_URL, DEFAULT_OPENAI_BASE_URL,
    DEFAULT_READ_TIMEOUT_SECS, ProviderConfig, ProviderKind,
};
pub use domain::{ChatMessage, FragmentStream, GenerateRequest, GenerateResult, NormalizedRequest};
pub use error::{ConfigError, RouteError};
pub use ports::GenerationPort;

// Used only by the `#[tokio::test]` unit tests
#[cfg(test)]
use tokio as _;
