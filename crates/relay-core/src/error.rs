use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read model catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid model catalog: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Model catalog has no text models")]
    EmptyTextPool,

    #[error("Model '{0}' is listed more than once")]
    DuplicateModel(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConversationError {
    #[error("Conversation is empty")]
    Empty,
}
