use std::sync::Arc;

use relay_core::{ensure_non_empty, Message, ModelDescriptor};
use serde::Serialize;

use crate::error::LLMError;
use crate::provider::{CompletionClient, CompletionOptions};

pub const ALL_MODELS_BUSY: &str = "all models are busy, try again later";

/// A successful answer and the model that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Completion {
    pub text: String,
    pub model: ModelDescriptor,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Success(Completion),
    Exhausted { last_error: String },
}

impl DispatchOutcome {
    pub fn into_result(self) -> Result<Completion, LLMError> {
        match self {
            DispatchOutcome::Success(completion) => Ok(completion),
            DispatchOutcome::Exhausted { last_error } => Err(LLMError::Exhausted { last_error }),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Success(_))
    }
}

/// Tries each candidate of a pool in order and returns the first answer.
///
/// Every candidate gets exactly one attempt per dispatch; there is no backoff
/// and no concurrent speculation, so the pool order fully determines which
/// model is charged first.
#[derive(Clone)]
pub struct FallbackDispatcher {
    client: Arc<dyn CompletionClient>,
}

impl FallbackDispatcher {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    pub async fn dispatch(
        &self,
        pool: &[ModelDescriptor],
        conversation: &[Message],
        options: &CompletionOptions,
    ) -> DispatchOutcome {
        if let Err(error) = ensure_non_empty(conversation) {
            return DispatchOutcome::Exhausted {
                last_error: error.to_string(),
            };
        }

        let mut last_error: Option<String> = None;

        for (index, model) in pool.iter().enumerate() {
            log::debug!(
                "Dispatch attempt {}/{} with model {}",
                index + 1,
                pool.len(),
                model.id
            );

            match self.client.complete(&model.id, conversation, options).await {
                Ok(text) => {
                    log::info!("Model {} answered ({} chars)", model.id, text.len());
                    return DispatchOutcome::Success(Completion {
                        text,
                        model: model.clone(),
                    });
                }
                Err(error) => {
                    log::warn!("Model {} failed: {}", model.id, error);
                    last_error = Some(error.to_string());
                }
            }
        }

        DispatchOutcome::Exhausted {
            last_error: last_error.unwrap_or_else(|| ALL_MODELS_BUSY.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompletionError;
    use crate::testing::{text_pool, ScriptedClient};

    #[tokio::test]
    async fn first_success_short_circuits_remaining_candidates() {
        let client = Arc::new(ScriptedClient::new(vec![
            Err(CompletionError::Overloaded {
                model: "m1".to_string(),
            }),
            Err(CompletionError::Network("connection reset".to_string())),
            Ok("answer from m3".to_string()),
        ]));
        let dispatcher = FallbackDispatcher::new(client.clone());
        let pool = text_pool(&["m1", "m2", "m3", "m4", "m5"]);

        let outcome = dispatcher
            .dispatch(&pool, &[Message::user("hi")], &CompletionOptions::default())
            .await;

        let completion = outcome.into_result().unwrap();
        assert_eq!(completion.model.id, "m3");
        assert_eq!(completion.text, "answer from m3");
        assert_eq!(client.called_models(), vec!["m1", "m2", "m3"]);
    }

    #[tokio::test]
    async fn exhausted_pool_reports_most_recent_failure() {
        let client = Arc::new(ScriptedClient::new(vec![
            Err(CompletionError::Network("timeout".to_string())),
            Err(CompletionError::Provider {
                status: 400,
                message: "context length exceeded".to_string(),
            }),
            Err(CompletionError::EmptyAnswer {
                model: "m3".to_string(),
            }),
        ]));
        let dispatcher = FallbackDispatcher::new(client.clone());
        let pool = text_pool(&["m1", "m2", "m3"]);

        let outcome = dispatcher
            .dispatch(&pool, &[Message::user("hi")], &CompletionOptions::default())
            .await;

        assert_eq!(
            outcome,
            DispatchOutcome::Exhausted {
                last_error: "empty response from model m3".to_string()
            }
        );
        assert_eq!(client.called_models().len(), 3);
    }

    #[tokio::test]
    async fn empty_pool_is_all_models_busy() {
        let client = Arc::new(ScriptedClient::new(vec![]));
        let dispatcher = FallbackDispatcher::new(client.clone());

        let outcome = dispatcher
            .dispatch(&[], &[Message::user("hi")], &CompletionOptions::default())
            .await;

        let error = outcome.into_result().unwrap_err();
        assert_eq!(error.to_string(), ALL_MODELS_BUSY);
        assert!(client.called_models().is_empty());
    }

    #[tokio::test]
    async fn empty_conversation_is_never_sent() {
        let client = Arc::new(ScriptedClient::new(vec![Ok("unused".to_string())]));
        let dispatcher = FallbackDispatcher::new(client.clone());

        let outcome = dispatcher
            .dispatch(&text_pool(&["m1"]), &[], &CompletionOptions::default())
            .await;

        assert!(!outcome.is_success());
        assert!(client.called_models().is_empty());
    }

    #[tokio::test]
    async fn options_are_forwarded_to_every_attempt() {
        let client = Arc::new(ScriptedClient::new(vec![
            Err(CompletionError::Overloaded {
                model: "m1".to_string(),
            }),
            Ok("ok".to_string()),
        ]));
        let dispatcher = FallbackDispatcher::new(client.clone());
        let options = CompletionOptions {
            temperature: 0.2,
            max_output_tokens: 128,
        };

        dispatcher
            .dispatch(&text_pool(&["m1", "m2"]), &[Message::user("hi")], &options)
            .await;

        assert!(client.calls().iter().all(|call| call.options == options));
    }
}
