use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use relay_llm::LLMError;
use serde::Serialize;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    /// Every candidate model failed; carries the last diagnostic.
    #[error("{0}")]
    Exhausted(String),

    #[error("API key not configured")]
    MissingCredential,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LLMError> for AppError {
    fn from(error: LLMError) -> Self {
        match error {
            LLMError::Exhausted { last_error } => AppError::Exhausted(last_error),
        }
    }
}

#[derive(Serialize)]
struct JsonError {
    error: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Exhausted(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::MissingCredential => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(JsonError {
            error: self.to_string(),
        })
    }
}
