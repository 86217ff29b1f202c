//! Text-generation service boundary
//!
//! One request/response call with a bounded output length; no retries and
//! no streaming. [`TextGenerator`] is the seam so tests can substitute an
//! offline generator.

pub mod anthropic;

use async_trait::async_trait;

use crate::errors::Result;

pub use anthropic::AnthropicClient;

/// A text-generation service taking a single user-role prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt`, bounded by the service's configured
    /// maximum output length. Errors are tagged generation failures.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
