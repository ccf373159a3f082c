pub mod client;
pub(crate) mod wire;

use crate::{error::Result, models::GenerationRequest};
use async_trait::async_trait;

pub use client::GeminiClient;

/// Anything that can turn a prompt and/or image into text.
#[async_trait]
pub trait Generator: Send + Sync {
    /// One blocking round trip; the text comes back verbatim.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    /// Checks that the backend is reachable and accepts our credentials.
    async fn health_check(&self) -> Result<()>;

    fn model(&self) -> &str;
}
