use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::entry::ActivityEntry;
use crate::error::{ActivityError, ActivityResult};
use crate::store::ActivityStore;

pub const DEFAULT_MAX_ENTRIES: usize = 200;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityStats {
    pub total: usize,
    pub today: usize,
    pub logs: Vec<ActivityEntry>,
}

/// Bounded, newest-first activity list on top of an [`ActivityStore`].
#[derive(Clone)]
pub struct ActivityLog {
    store: Arc<dyn ActivityStore>,
    max_entries: usize,
    write_lock: Arc<Mutex<()>>,
}

impl ActivityLog {
    pub fn new(store: Arc<dyn ActivityStore>, max_entries: usize) -> Self {
        Self {
            store,
            max_entries: max_entries.max(1),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub async fn append(&self, entry: ActivityEntry) -> ActivityResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut entries = match self.store.get().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("activity store unreadable, starting a fresh log: {}", e);
                Vec::new()
            }
        };
        entries.insert(0, entry);
        entries.truncate(self.max_entries);
        self.store.put(&entries).await
    }

    pub async fn stats(&self, since: Option<DateTime<Utc>>) -> ActivityStats {
        self.stats_at(since, Utc::now()).await
    }

    pub async fn stats_at(&self, since: Option<DateTime<Utc>>, now: DateTime<Utc>) -> ActivityStats {
        let entries = match self.store.get().await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("failed to read activity store: {}", e);
                return ActivityStats::default();
            }
        };

        let today = now.date_naive();
        let today_count = entries
            .iter()
            .filter(|entry| entry.time.date_naive() == today)
            .count();
        let total = entries.len();
        let logs = match since {
            Some(since) => entries.into_iter().filter(|entry| entry.time > since).collect(),
            None => entries,
        };

        ActivityStats {
            total,
            today: today_count,
            logs,
        }
    }
}

/// Accepts an RFC 3339 timestamp or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_since(value: &str) -> ActivityResult<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| ActivityError::InvalidSince(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryActivityStore;
    use async_trait::async_trait;

    fn at(timestamp: &str, query: &str) -> ActivityEntry {
        let time = DateTime::parse_from_rfc3339(timestamp)
            .unwrap()
            .with_timezone(&Utc);
        ActivityEntry::at(time, "/api/chat", "quick", "Model", Some(query))
    }

    fn memory_log(max: usize) -> ActivityLog {
        ActivityLog::new(Arc::new(MemoryActivityStore::new()), max)
    }

    #[tokio::test]
    async fn append_keeps_newest_first_and_caps_length() {
        let log = memory_log(3);

        for i in 0..5 {
            log.append(ActivityEntry::new("/api/chat", "quick", "Model", Some(&format!("q{i}"))))
                .await
                .unwrap();
        }

        let stats = log.stats(None).await;
        let queries: Vec<&str> = stats.logs.iter().map(|e| e.query.as_str()).collect();
        assert_eq!(queries, vec!["q4", "q3", "q2"]);
        assert_eq!(stats.total, 3);
    }

    #[tokio::test]
    async fn stats_count_today_and_filter_since() {
        let log = memory_log(10);
        log.append(at("2024-05-01T08:00:00Z", "yesterday")).await.unwrap();
        log.append(at("2024-05-02T09:00:00Z", "morning")).await.unwrap();
        log.append(at("2024-05-02T15:00:00Z", "afternoon")).await.unwrap();

        let now = DateTime::parse_from_rfc3339("2024-05-02T18:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let since = parse_since("2024-05-02T09:00:00Z").unwrap();
        let stats = log.stats_at(Some(since), now).await;

        assert_eq!(stats.total, 3);
        assert_eq!(stats.today, 2);
        let queries: Vec<&str> = stats.logs.iter().map(|e| e.query.as_str()).collect();
        assert_eq!(queries, vec!["afternoon"]);
    }

    #[test]
    fn parse_since_accepts_dates_and_timestamps() {
        assert_eq!(
            parse_since("2024-05-02").unwrap(),
            parse_since("2024-05-02T00:00:00Z").unwrap()
        );
        assert_eq!(
            parse_since("2024-05-02T03:00:00+03:00").unwrap(),
            parse_since("2024-05-02").unwrap()
        );
        assert!(matches!(
            parse_since("yesterday"),
            Err(ActivityError::InvalidSince(_))
        ));
    }

    struct BrokenStore;

    #[async_trait]
    impl ActivityStore for BrokenStore {
        async fn get(&self) -> ActivityResult<Vec<ActivityEntry>> {
            Err(ActivityError::Json(
                serde_json::from_str::<Vec<ActivityEntry>>("{").unwrap_err(),
            ))
        }

        async fn put(&self, _entries: &[ActivityEntry]) -> ActivityResult<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn unreadable_store_yields_empty_stats() {
        let log = ActivityLog::new(Arc::new(BrokenStore), 10);

        assert_eq!(log.stats(None).await, ActivityStats::default());
    }
}
