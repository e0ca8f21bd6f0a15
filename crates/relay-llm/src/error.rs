use thiserror::Error;

/// Why a single completion attempt against one model failed.
///
/// The `Display` output is what callers see when every candidate fails, so
/// the messages stay short and provider-facing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompletionError {
    #[error("network error: {0}")]
    Network(String),

    #[error("model {model} overloaded")]
    Overloaded { model: String },

    #[error("{message}")]
    Provider { status: u16, message: String },

    #[error("invalid response from API: {0}")]
    MalformedResponse(String),

    #[error("empty response from model {model}")]
    EmptyAnswer { model: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LLMError {
    #[error("{last_error}")]
    Exhausted { last_error: String },
}

pub type Result<T> = std::result::Result<T, LLMError>;
