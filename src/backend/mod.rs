//! Remote analytics backend
//!
//! The backend turns a natural-language question into a reply. It is
//! reached through [`ChatBackend`] so the dispatcher can be driven by the
//! HTTP client in production and by fakes in tests.

pub mod http;

pub use http::HttpBackend;

use crate::messages::Reply;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send one query and wait for its validated reply
    async fn query(&self, message: &str) -> Result<Reply>;
}
