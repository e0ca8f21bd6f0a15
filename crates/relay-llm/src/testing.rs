use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use relay_core::{Capability, Message, ModelDescriptor};

use crate::error::CompletionError;
use crate::provider::{CompletionClient, CompletionOptions};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub model: String,
    pub messages: Vec<Message>,
    pub options: CompletionOptions,
}

/// Replays a fixed list of results, one per call, and records every call.
pub struct ScriptedClient {
    script: Mutex<VecDeque<Result<String, CompletionError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedClient {
    pub fn new(script: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called_models(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.model).collect()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<String, CompletionError> {
        self.calls.lock().unwrap().push(RecordedCall {
            model: model.to_string(),
            messages: messages.to_vec(),
            options: *options,
        });
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::Network("script exhausted".to_string())))
    }
}

pub fn text_pool(ids: &[&str]) -> Vec<ModelDescriptor> {
    ids.iter()
        .map(|id| ModelDescriptor::new(*id, id.to_uppercase(), Capability::Text))
        .collect()
}
