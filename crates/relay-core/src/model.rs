//! Model catalog and capability routing.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::message::{conversation_has_image, Message};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Text,
    Vision,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub id: String,
    pub display_name: String,
    pub capability: Capability,
}

impl ModelDescriptor {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        capability: Capability,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            capability,
        }
    }
}

const DEFAULT_TEXT_MODELS: &[(&str, &str)] = &[
    ("llama-3.3-70b-versatile", "Llama 3.3 70B"),
    ("llama-3.1-70b-versatile", "Llama 3.1 70B"),
    ("gemma2-9b-it", "Gemma 2 9B"),
    ("llama-3.1-8b-instant", "Llama 8B"),
    ("mixtral-8x7b-32768", "Mixtral 8x7B"),
];

const DEFAULT_VISION_MODELS: &[(&str, &str)] = &[
    (
        "meta-llama/llama-4-scout-17b-16e-instruct",
        "Llama 4 Scout",
    ),
    (
        "meta-llama/llama-4-maverick-17b-128e-instruct",
        "Llama 4 Maverick",
    ),
    ("llama-3.2-90b-vision-preview", "Llama 3.2 90B Vision"),
];

/// The two disjoint, ordered capability pools.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    text: Vec<ModelDescriptor>,
    vision: Vec<ModelDescriptor>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    text: Vec<CatalogFileEntry>,
    #[serde(default)]
    vision: Vec<CatalogFileEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogFileEntry {
    id: String,
    #[serde(default)]
    name: Option<String>,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        let build = |entries: &[(&str, &str)], capability: Capability| -> Vec<ModelDescriptor> {
            entries
                .iter()
                .map(|(id, name)| ModelDescriptor::new(*id, *name, capability))
                .collect()
        };
        Self {
            text: build(DEFAULT_TEXT_MODELS, Capability::Text),
            vision: build(DEFAULT_VISION_MODELS, Capability::Vision),
        }
    }
}

impl ModelCatalog {
    pub fn new(
        text: Vec<ModelDescriptor>,
        vision: Vec<ModelDescriptor>,
    ) -> Result<Self, CatalogError> {
        if text.is_empty() {
            return Err(CatalogError::EmptyTextPool);
        }

        let mut seen = HashSet::new();
        for model in text.iter().chain(vision.iter()) {
            if !seen.insert(model.id.as_str()) {
                return Err(CatalogError::DuplicateModel(model.id.clone()));
            }
        }

        if vision.is_empty() {
            log::warn!("Model catalog has no vision models; image requests will fail");
        }

        Ok(Self { text, vision })
    }

    /// Parse a catalog from TOML with `[[text]]` and `[[vision]]` tables.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        let convert = |entries: Vec<CatalogFileEntry>, capability: Capability| {
            entries
                .into_iter()
                .map(|entry| {
                    let name = entry.name.unwrap_or_else(|| entry.id.clone());
                    ModelDescriptor::new(entry.id, name, capability)
                })
                .collect::<Vec<_>>()
        };
        Self::new(
            convert(file.text, Capability::Text),
            convert(file.vision, Capability::Vision),
        )
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn pool(&self, capability: Capability) -> &[ModelDescriptor] {
        match capability {
            Capability::Text => &self.text,
            Capability::Vision => &self.vision,
        }
    }

    pub fn find(&self, id: &str) -> Option<&ModelDescriptor> {
        self.text.iter().chain(self.vision.iter()).find(|m| m.id == id)
    }

    /// Display name for a model id, falling back to the id itself.
    pub fn display_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.find(id).map(|m| m.display_name.as_str()).unwrap_or(id)
    }

    /// Capability required by a conversation.
    pub fn required_capability(conversation: &[Message]) -> Capability {
        if conversation_has_image(conversation) {
            Capability::Vision
        } else {
            Capability::Text
        }
    }

    /// Ordered candidates for a conversation.
    ///
    /// A preferred model goes first. A known model of the other capability is
    /// ignored so image conversations never reach the text pool.
    pub fn select_pool(
        &self,
        conversation: &[Message],
        preferred: Option<&str>,
    ) -> Vec<ModelDescriptor> {
        let capability = Self::required_capability(conversation);
        let pool = self.pool(capability);

        let preferred = preferred.map(str::trim).filter(|id| !id.is_empty());
        let Some(preferred) = preferred else {
            return pool.to_vec();
        };

        let head = match self.find(preferred) {
            Some(model) if model.capability == capability => model.clone(),
            Some(model) => {
                log::warn!(
                    "Ignoring preferred model {} ({:?}) for a {:?} conversation",
                    model.id,
                    model.capability,
                    capability
                );
                return pool.to_vec();
            }
            None => ModelDescriptor::new(preferred, self.display_name(preferred), capability),
        };

        let mut ordered = Vec::with_capacity(pool.len() + 1);
        ordered.push(head);
        ordered.extend(pool.iter().filter(|m| m.id != preferred).cloned());
        ordered
    }
}
