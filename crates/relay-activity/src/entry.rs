use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Longest query preview kept per entry, in characters.
pub const MAX_QUERY_PREVIEW: usize = 300;

/// Placeholder stored when a request carried no readable user text.
pub const UNKNOWN_QUERY: &str = "???";

/// One served request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActivityEntry {
    pub time: DateTime<Utc>,
    pub endpoint: String,
    pub mode: String,
    /// Display name of the model that answered.
    pub model: String,
    pub query: String,
}

impl ActivityEntry {
    pub fn new(
        endpoint: impl Into<String>,
        mode: impl Into<String>,
        model: impl Into<String>,
        query: Option<&str>,
    ) -> Self {
        Self::at(Utc::now(), endpoint, mode, model, query)
    }

    pub fn at(
        time: DateTime<Utc>,
        endpoint: impl Into<String>,
        mode: impl Into<String>,
        model: impl Into<String>,
        query: Option<&str>,
    ) -> Self {
        Self {
            time,
            endpoint: endpoint.into(),
            mode: mode.into(),
            model: model.into(),
            query: query_preview(query),
        }
    }
}

pub fn query_preview(query: Option<&str>) -> String {
    match query.map(str::trim).filter(|q| !q.is_empty()) {
        Some(q) => q.chars().take(MAX_QUERY_PREVIEW).collect(),
        None => UNKNOWN_QUERY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_on_char_boundaries() {
        let long = "ã".repeat(MAX_QUERY_PREVIEW + 20);

        let preview = query_preview(Some(&long));

        assert_eq!(preview.chars().count(), MAX_QUERY_PREVIEW);
    }

    #[test]
    fn missing_or_blank_query_uses_placeholder() {
        assert_eq!(query_preview(None), UNKNOWN_QUERY);
        assert_eq!(query_preview(Some("  ")), UNKNOWN_QUERY);
    }

    #[test]
    fn serializes_with_rfc3339_time() {
        let time = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let entry = ActivityEntry::at(time, "/api/chat", "quick", "Llama 3.3 70B", Some("hi"));

        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(value["time"], "2024-05-01T12:00:00Z");
        assert_eq!(value["endpoint"], "/api/chat");
        assert_eq!(value["mode"], "quick");
        assert_eq!(value["model"], "Llama 3.3 70B");
        assert_eq!(value["query"], "hi");
    }
}
