//! Command-line surface for the llmroute front door.
//!
//! The binary in `main.rs` is the composition root; this library holds the
//! pieces that are worth testing on their own.

pub mod logging;
pub mod parser;

pub use parser::Cli;
