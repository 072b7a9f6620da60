#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]

pub mod models;
pub mod server;

pub use server::{create_router, serve};
