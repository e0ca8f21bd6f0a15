use std::sync::Arc;

use relay_core::{Message, ModelCatalog};
use relay_llm::{
    Completion, CompletionClient, CompletionOptions, FallbackDispatcher, RefinementConfig,
    RefinementLoop,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

pub const SEARCH_CONTEXT_HEADER: &str =
    "## WEB SEARCH CONTEXT (real, up-to-date data — use it to enrich your answer):";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    #[default]
    Quick,
    Think,
}

impl ChatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::Quick => "quick",
            ChatMode::Think => "think",
        }
    }
}

/// System text plus any search context, or `None` when both are blank.
pub fn build_preamble(system: Option<&str>, search_context: Option<&str>) -> Option<String> {
    let system = system.map(str::trim).unwrap_or_default();
    let context = search_context.map(str::trim).unwrap_or_default();

    let preamble = if context.is_empty() {
        system.to_string()
    } else {
        format!("{system}\n\n{SEARCH_CONTEXT_HEADER}\n{context}")
    };
    let preamble = preamble.trim();
    (!preamble.is_empty()).then(|| preamble.to_string())
}

struct Engine {
    dispatcher: FallbackDispatcher,
    refiner: RefinementLoop,
}

/// Routes a conversation to a model pool, dispatches it and optionally
/// refines the answer.
pub struct ChatService {
    catalog: Arc<ModelCatalog>,
    engine: Option<Engine>,
    base_options: CompletionOptions,
}

impl ChatService {
    pub fn new(
        catalog: Arc<ModelCatalog>,
        client: Option<Arc<dyn CompletionClient>>,
        refinement: RefinementConfig,
    ) -> Self {
        let engine = client.map(|client| {
            let dispatcher = FallbackDispatcher::new(client);
            Engine {
                refiner: RefinementLoop::new(dispatcher.clone(), refinement),
                dispatcher,
            }
        });
        Self {
            catalog,
            engine,
            base_options: CompletionOptions::default(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.engine.is_some()
    }

    pub async fn answer(
        &self,
        conversation: &[Message],
        preamble: Option<&str>,
        mode: ChatMode,
        preferred_model: Option<&str>,
    ) -> Result<Completion> {
        let engine = self.engine.as_ref().ok_or(AppError::MissingCredential)?;

        let pool = self.catalog.select_pool(conversation, preferred_model);
        log::debug!(
            "{} candidate(s) for a {} request: {}",
            pool.len(),
            mode.as_str(),
            pool.iter().map(|m| m.id.as_str()).collect::<Vec<_>>().join(", ")
        );

        let mut messages = Vec::with_capacity(conversation.len() + 1);
        if let Some(preamble) = preamble {
            messages.push(Message::system(preamble));
        }
        messages.extend(conversation.iter().cloned());

        let base = engine
            .dispatcher
            .dispatch(&pool, &messages, &self.base_options)
            .await
            .into_result()?;

        match mode {
            ChatMode::Quick => Ok(base),
            ChatMode::Think => Ok(engine
                .refiner
                .refine(base, conversation, preamble, &pool)
                .await),
        }
    }
}
