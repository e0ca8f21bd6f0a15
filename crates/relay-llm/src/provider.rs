use async_trait::async_trait;
use relay_core::Message;
use serde::{Deserialize, Serialize};

use crate::error::CompletionError;

/// Sampling parameters for one completion call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 4096,
        }
    }
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Issue exactly one chat-completion request to `model`.
    ///
    /// Returns the answer text, or the classified reason the attempt failed.
    /// Implementations must not retry.
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<String, CompletionError>;
}
