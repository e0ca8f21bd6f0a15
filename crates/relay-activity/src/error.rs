use thiserror::Error;

pub type ActivityResult<T> = Result<T, ActivityError>;

#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid since value: {0}")]
    InvalidSince(String),
}
