pub mod error;
pub mod message;
pub mod model;

pub use error::{CatalogError, ConversationError};
pub use message::{
    conversation_has_image, ensure_non_empty, last_user_text, ContentPart, Conversation, ImageUrl,
    Message, MessageContent, Role,
};
pub use model::{Capability, ModelCatalog, ModelDescriptor};
