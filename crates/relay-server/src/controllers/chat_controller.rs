use actix_web::{web, HttpResponse};
use relay_activity::ActivityEntry;
use relay_core::{last_user_text, Message};
use relay_llm::Completion;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::chat_service::{build_preamble, ChatMode};
use crate::error::{AppError, Result};
use crate::server::not_found;
use crate::state::AppState;

const CHAT_ENDPOINT: &str = "/api/chat";
const LEGACY_ENDPOINT: &str = "/";
const LEGACY_MODE: &str = "legacy";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest {
    messages: Vec<Message>,
    #[serde(default)]
    system: Option<String>,
    #[serde(default)]
    mode: Option<ChatMode>,
    /// Context already fetched by the client; wins over `web_search`.
    #[serde(default)]
    search_context: Option<String>,
    #[serde(default)]
    web_search: bool,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LegacyChatRequest {
    messages: Vec<Message>,
    #[serde(default)]
    system: Option<String>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatResponse {
    result: String,
    used_model: String,
    used_model_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<ChatMode>,
}

impl ChatResponse {
    fn new(completion: Completion, mode: Option<ChatMode>) -> Self {
        Self {
            result: completion.text,
            used_model: completion.model.id,
            used_model_name: completion.model.display_name,
            mode,
        }
    }
}

/// Parse a chat body, checking `messages` before the typed decode so the
/// common mistakes get a specific message.
fn parse_chat_body<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| AppError::BadRequest("Invalid JSON".to_string()))?;

    match value.get("messages") {
        None | Some(Value::Null) => {
            return Err(AppError::BadRequest("messages is required".to_string()))
        }
        Some(Value::Array(items)) if items.is_empty() => {
            return Err(AppError::BadRequest("messages must not be empty".to_string()))
        }
        Some(Value::Array(_)) => {}
        Some(_) => return Err(AppError::BadRequest("messages must be an array".to_string())),
    }

    serde_json::from_value(value).map_err(|e| AppError::BadRequest(format!("Invalid request: {e}")))
}

async fn resolve_search_context(state: &AppState, request: &ChatRequest) -> Option<String> {
    if let Some(context) = request
        .search_context
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
    {
        return Some(context.to_string());
    }
    if !request.web_search {
        return None;
    }

    let query = last_user_text(&request.messages)?;
    let context = state.search.search(&query).await.format_context();
    (!context.is_empty()).then_some(context)
}

fn record(state: &AppState, endpoint: &str, mode: &str, messages: &[Message], completion: &Completion) {
    state.recorder.record(ActivityEntry::new(
        endpoint,
        mode,
        completion.model.display_name.clone(),
        last_user_text(messages).as_deref(),
    ));
}

pub async fn chat(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse> {
    let request: ChatRequest = parse_chat_body(&body)?;
    if !state.chat.is_configured() {
        return Err(AppError::MissingCredential);
    }
    let mode = request.mode.unwrap_or_default();

    let search_context = resolve_search_context(&state, &request).await;
    let preamble = build_preamble(request.system.as_deref(), search_context.as_deref());

    let completion = state
        .chat
        .answer(
            &request.messages,
            preamble.as_deref(),
            mode,
            request.model.as_deref(),
        )
        .await?;

    record(&state, CHAT_ENDPOINT, mode.as_str(), &request.messages, &completion);
    Ok(HttpResponse::Ok().json(ChatResponse::new(completion, Some(mode))))
}

pub async fn legacy_chat(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse> {
    let request: LegacyChatRequest = parse_chat_body(&body)?;
    let preamble = build_preamble(request.system.as_deref(), None);

    let completion = state
        .chat
        .answer(
            &request.messages,
            preamble.as_deref(),
            ChatMode::Quick,
            request.model.as_deref(),
        )
        .await?;

    record(&state, LEGACY_ENDPOINT, LEGACY_MODE, &request.messages, &completion);
    Ok(HttpResponse::Ok().json(ChatResponse::new(completion, None)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(CHAT_ENDPOINT)
            .route(web::post().to(chat))
            .default_service(web::to(not_found)),
    )
    .service(
        web::resource(LEGACY_ENDPOINT)
            .route(web::post().to(legacy_chat))
            .default_service(web::to(not_found)),
    );
}
