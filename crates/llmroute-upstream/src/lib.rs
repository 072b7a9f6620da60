//! Provider forwarder for llmroute.
//!
//! [`UpstreamRouter`] implements [`llmroute_core::GenerationPort`] on top of
//! reqwest. It builds the provider-specific payload, issues one POST, and
//! adapts the buffered or streamed reply into provider-agnostic text.
#![deny(unsafe_code)]

pub mod client;
pub mod ollama;
pub mod openai;
pub mod stream;

pub use client::UpstreamRouter;
pub use stream::{LineEvent, fragment_stream};
