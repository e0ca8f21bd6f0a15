use serde::{Deserialize, Serialize};

/// At most this many related-topic snippets are kept.
pub const MAX_RELATED_LINKS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstantAnswer {
    pub title: String,
    pub text: String,
    pub source: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EncyclopediaSummary {
    pub title: String,
    pub text: String,
    pub url: Option<String>,
    /// Language edition the summary came from.
    pub lang: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelatedLink {
    pub text: String,
    pub url: Option<String>,
}

/// Merged output of all lookups for one query. Absent fields mean the
/// corresponding source failed or had nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    pub instant: Option<InstantAnswer>,
    pub wiki: Option<EncyclopediaSummary>,
    pub related: Vec<RelatedLink>,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.instant.is_none() && self.wiki.is_none() && self.related.is_empty()
    }

    /// Flatten into the plain-text block injected into a system prompt.
    pub fn format_context(&self) -> String {
        let mut context = String::new();

        if let Some(wiki) = &self.wiki {
            context.push_str(&format!("Wikipedia ({}): {}\n\n", wiki.title, wiki.text));
        }

        if let Some(instant) = &self.instant {
            let source = instant
                .source
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or("DuckDuckGo");
            context.push_str(&format!("{} ({}): {}\n\n", source, instant.title, instant.text));
        }

        for link in &self.related {
            context.push_str(&format!("- {}\n", link.text));
        }

        context.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_result() -> SearchResult {
        SearchResult {
            instant: Some(InstantAnswer {
                title: "Rust".to_string(),
                text: "Rust is a systems language.".to_string(),
                source: Some("Wikipedia".to_string()),
                url: Some("https://en.wikipedia.org/wiki/Rust".to_string()),
            }),
            wiki: Some(EncyclopediaSummary {
                title: "Rust (linguagem)".to_string(),
                text: "Rust é uma linguagem.".to_string(),
                url: None,
                lang: "pt".to_string(),
            }),
            related: vec![
                RelatedLink {
                    text: "Cargo - package manager".to_string(),
                    url: None,
                },
                RelatedLink {
                    text: "Ferris - mascot".to_string(),
                    url: None,
                },
            ],
        }
    }

    #[test]
    fn context_orders_summary_then_instant_then_links() {
        assert_eq!(
            full_result().format_context(),
            "Wikipedia (Rust (linguagem)): Rust é uma linguagem.\n\n\
             Wikipedia (Rust): Rust is a systems language.\n\n\
             - Cargo - package manager\n\
             - Ferris - mascot"
        );
    }

    #[test]
    fn instant_answer_without_source_is_labelled_duckduckgo() {
        let result = SearchResult {
            instant: Some(InstantAnswer {
                title: "Rust".to_string(),
                text: "A language.".to_string(),
                source: Some(String::new()),
                url: None,
            }),
            ..SearchResult::default()
        };

        assert_eq!(result.format_context(), "DuckDuckGo (Rust): A language.");
    }

    #[test]
    fn empty_result_has_empty_context() {
        let result = SearchResult::default();

        assert!(result.is_empty());
        assert_eq!(result.format_context(), "");
    }

    #[test]
    fn serializes_absent_sources_as_null() {
        let value = serde_json::to_value(SearchResult::default()).unwrap();

        assert!(value["instant"].is_null());
        assert!(value["wiki"].is_null());
        assert_eq!(value["related"], serde_json::json!([]));
    }
}
