use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, HttpRequest, HttpResponse};
use relay_activity::parse_since;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::server::not_found;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct LogsQuery {
    key: Option<String>,
    since: Option<String>,
}

/// The secret may come as `?key=` or as a bearer token. An unset secret
/// denies everyone.
fn is_authorized(secret: Option<&str>, key: Option<&str>, authorization: Option<&str>) -> bool {
    let Some(secret) = secret.filter(|s| !s.is_empty()) else {
        return false;
    };
    let bearer = authorization.and_then(|value| value.strip_prefix("Bearer "));
    key == Some(secret) || bearer.map(str::trim) == Some(secret)
}

pub async fn logs(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<LogsQuery>,
) -> Result<HttpResponse> {
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if !is_authorized(
        state.monitor_secret.as_deref(),
        query.key.as_deref(),
        authorization,
    ) {
        return Err(AppError::Unauthorized);
    }

    let since = match query.since.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => Some(parse_since(value).map_err(|e| AppError::BadRequest(e.to_string()))?),
        None => None,
    };

    Ok(HttpResponse::Ok().json(state.activity.stats(since).await))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/logs")
            .route(web::get().to(logs))
            .default_service(web::to(not_found)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_secret_denies_everyone() {
        assert!(!is_authorized(None, Some(""), None));
        assert!(!is_authorized(Some(""), Some(""), Some("Bearer ")));
    }

    #[test]
    fn key_or_bearer_must_match() {
        assert!(is_authorized(Some("s3cret"), Some("s3cret"), None));
        assert!(is_authorized(Some("s3cret"), None, Some("Bearer s3cret")));
        assert!(!is_authorized(Some("s3cret"), Some("wrong"), Some("Bearer wrong")));
        assert!(!is_authorized(Some("s3cret"), None, Some("s3cret")));
    }
}
