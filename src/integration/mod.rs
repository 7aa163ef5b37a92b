//! Integration layer
//!
//! Configuration and the client that ties session, backend, rendering and
//! speech together.

pub mod client;
pub mod config;

pub use client::AssistantClient;
pub use config::{ClientConfig, DEFAULT_ENDPOINT, ENDPOINT_ENV, TIMEOUT_ENV};
