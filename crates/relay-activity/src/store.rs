use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::RwLock;

use crate::entry::ActivityEntry;
use crate::error::ActivityResult;

pub const ACTIVITY_FILE_NAME: &str = "activity_log.json";

/// Holds the whole activity list under a single logical key.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn get(&self) -> ActivityResult<Vec<ActivityEntry>>;

    async fn put(&self, entries: &[ActivityEntry]) -> ActivityResult<()>;
}

#[derive(Debug, Default)]
pub struct MemoryActivityStore {
    entries: RwLock<Vec<ActivityEntry>>,
}

impl MemoryActivityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActivityStore for MemoryActivityStore {
    async fn get(&self) -> ActivityResult<Vec<ActivityEntry>> {
        Ok(self.entries.read().await.clone())
    }

    async fn put(&self, entries: &[ActivityEntry]) -> ActivityResult<()> {
        *self.entries.write().await = entries.to_vec();
        Ok(())
    }
}

/// JSON array on disk. Writes go to a sibling temp file first and are then
/// renamed over the target, so readers never see a partial file.
#[derive(Debug, Clone)]
pub struct JsonFileActivityStore {
    path: PathBuf,
}

impl JsonFileActivityStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(ACTIVITY_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| ACTIVITY_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ActivityStore for JsonFileActivityStore {
    async fn get(&self) -> ActivityResult<Vec<ActivityEntry>> {
        match fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, entries: &[ActivityEntry]) -> ActivityResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_vec_pretty(entries)?;
        let temp = self.temp_path();
        fs::write(&temp, json).await?;
        fs::rename(&temp, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(query: &str) -> ActivityEntry {
        ActivityEntry::new("/api/chat", "quick", "Model", Some(query))
    }

    #[tokio::test]
    async fn memory_store_round_trips() {
        let store = MemoryActivityStore::new();
        assert!(store.get().await.unwrap().is_empty());

        store.put(&[entry("a"), entry("b")]).await.unwrap();

        let queries: Vec<String> = store.get().await.unwrap().into_iter().map(|e| e.query).collect();
        assert_eq!(queries, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn file_store_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileActivityStore::in_dir(dir.path());

        assert!(store.get().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_store_persists_and_cleans_up_temp_file() {
        let dir = tempdir().unwrap();
        let store = JsonFileActivityStore::in_dir(dir.path().join("nested"));

        store.put(&[entry("persisted")]).await.unwrap();

        let reopened = JsonFileActivityStore::in_dir(dir.path().join("nested"));
        let entries = reopened.get().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].query, "persisted");
        assert!(!store.temp_path().exists());
        assert!(store.path().ends_with(ACTIVITY_FILE_NAME));
    }

    #[tokio::test]
    async fn file_store_reports_corrupt_content() {
        let dir = tempdir().unwrap();
        let store = JsonFileActivityStore::in_dir(dir.path());
        std::fs::write(store.path(), "{not a list").unwrap();

        assert!(store.get().await.is_err());
    }
}
