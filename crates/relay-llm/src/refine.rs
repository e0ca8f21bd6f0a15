//! "Think more" mode: iterative self-refinement of an answer.

use once_cell::sync::Lazy;
use regex::Regex;
use relay_core::{Message, ModelDescriptor};

use crate::dispatcher::{Completion, DispatchOutcome, FallbackDispatcher};
use crate::provider::CompletionOptions;

pub const DEFAULT_PERSONA: &str = "You are an educational assistant.";

pub const REFINE_INSTRUCTION: &str = "Completely rewrite your previous answer in an improved form:
- Fix any factual inaccuracies
- Improve clarity and teaching quality with better analogies
- Add the concrete examples that were missing
- Keep the same friendly, educational tone
- Answer in the same language as the conversation
- Write the final answer directly. Do NOT mention any revision, improvement or rewrite";

/// Leading meta-commentary models add when asked to rewrite their answer.
static NOISE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^(aqui\s+est[aá]|segue|veja|confira)\s*(a\s+)?(vers[aã]o|resposta)\s*(melhorada|revisada|final|aprimorada|corrigida|reescrita)[:.!\s]*",
        r"(?i)^(here\s+is|here's|below\s+is)\s+(the\s+|my\s+|an?\s+)?(improved|revised|final|rewritten|updated|corrected|refined)\s+(version|answer|response)[:.!\s]*",
        r"(?i)^(reescrevendo|revisando|melhorando|aprimorando|rewriting|revising|improving|refining)\s*(\.{3}|…|[:.!])+\s*",
        r"(?i)^(com\s+base\s+na\s+revis[aã]o|ap[oó]s\s+(a\s+)?revis[aã]o)[,:.!\s]*",
        r"(?i)^(based\s+on\s+the\s+revision|after\s+(the\s+)?revision)\s*[,:]\s*",
        r"(?i)^(vers[aã]o\s+(final|melhorada|revisada)|(final|improved|revised)\s+version)\s*([:.!]|\n)[:.!\s]*",
        r"^(?:-{3,}|\*{3,}|_{3,})[ \t]*(?:\r?\n|$)\s*",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("noise pattern must compile"))
    .collect()
});

/// Strip leading "here is the improved version"-style boilerplate.
///
/// Best effort: patterns are applied until none matches. Text without such a
/// prefix only loses surrounding whitespace. If stripping would leave nothing,
/// the trimmed input is returned instead.
pub fn clean_refined_output(text: &str) -> String {
    let trimmed = text.trim();
    let mut cleaned = trimmed;

    loop {
        let before = cleaned.len();
        for pattern in NOISE_PATTERNS.iter() {
            if let Some(found) = pattern.find(cleaned) {
                cleaned = cleaned[found.end()..].trim_start();
            }
        }
        if cleaned.len() == before {
            break;
        }
    }

    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        trimmed.to_string()
    } else {
        cleaned.to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RefinementConfig {
    pub rounds: usize,
    pub options: CompletionOptions,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            rounds: 3,
            options: CompletionOptions {
                temperature: 0.5,
                max_output_tokens: 4096,
            },
        }
    }
}

pub struct RefinementLoop {
    dispatcher: FallbackDispatcher,
    config: RefinementConfig,
}

impl RefinementLoop {
    pub fn new(dispatcher: FallbackDispatcher, config: RefinementConfig) -> Self {
        Self { dispatcher, config }
    }

    /// Run up to `rounds` rewrite rounds over `base`.
    ///
    /// A round whose dispatch is exhausted ends the loop; the last good
    /// answer and its model are returned, so refinement never fails a request.
    pub async fn refine(
        &self,
        base: Completion,
        conversation: &[Message],
        system_preamble: Option<&str>,
        pool: &[ModelDescriptor],
    ) -> Completion {
        let preamble = system_preamble
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PERSONA);

        let mut current = base;

        for round in 1..=self.config.rounds {
            let messages = build_round_messages(preamble, conversation, &current.text);

            match self
                .dispatcher
                .dispatch(pool, &messages, &self.config.options)
                .await
            {
                DispatchOutcome::Success(refined) => {
                    log::debug!(
                        "Refinement round {}/{} answered by {}",
                        round,
                        self.config.rounds,
                        refined.model.id
                    );
                    current = Completion {
                        text: clean_refined_output(&refined.text),
                        model: refined.model,
                    };
                }
                DispatchOutcome::Exhausted { last_error } => {
                    log::warn!(
                        "Refinement stopped at round {}/{}: {}",
                        round,
                        self.config.rounds,
                        last_error
                    );
                    break;
                }
            }
        }

        current
    }
}

fn build_round_messages(preamble: &str, conversation: &[Message], answer: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(conversation.len() + 3);
    messages.push(Message::system(preamble));
    messages.extend(conversation.iter().cloned());
    messages.push(Message::assistant(answer));
    messages.push(Message::user(REFINE_INSTRUCTION));
    messages
}
