use actix_web::{web, HttpResponse};
use relay_search::SearchResult;
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::server::not_found;
use crate::state::AppState;

#[derive(Debug, Serialize)]
struct SearchResponse {
    #[serde(flatten)]
    result: SearchResult,
    context: String,
}

fn parse_query(body: &[u8]) -> Result<String> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| AppError::BadRequest("Invalid request".to_string()))?;

    value
        .get("query")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
        .ok_or_else(|| AppError::BadRequest("query is required".to_string()))
}

pub async fn search(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse> {
    let query = parse_query(&body)?;
    let result = state.search.search(&query).await;
    let context = result.format_context();
    Ok(HttpResponse::Ok().json(SearchResponse { result, context }))
}

pub async fn legacy_search(state: web::Data<AppState>, body: web::Bytes) -> Result<HttpResponse> {
    let query = parse_query(&body)?;
    Ok(HttpResponse::Ok().json(state.search.search(&query).await))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/search")
            .route(web::post().to(search))
            .default_service(web::to(not_found)),
    )
    .service(
        web::resource("/search")
            .route(web::post().to(legacy_search))
            .default_service(web::to(not_found)),
    );
}
