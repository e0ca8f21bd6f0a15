pub mod dispatcher;
pub mod error;
pub mod openai;
pub mod provider;
pub mod refine;

#[cfg(test)]
mod testing;

pub use dispatcher::{Completion, DispatchOutcome, FallbackDispatcher, ALL_MODELS_BUSY};
pub use error::{CompletionError, LLMError, Result};
pub use openai::{OpenAICompatClient, DEFAULT_BASE_URL};
pub use provider::{CompletionClient, CompletionOptions};
pub use refine::{
    clean_refined_output, RefinementConfig, RefinementLoop, DEFAULT_PERSONA, REFINE_INSTRUCTION,
};
