//! DuckDuckGo Instant Answer API.

use std::time::Duration;

use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{Result, SearchError};
use crate::types::{InstantAnswer, RelatedLink, MAX_RELATED_LINKS};

pub const DEFAULT_ENDPOINT: &str = "https://api.duckduckgo.com/";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct InstantLookup {
    pub instant: Option<InstantAnswer>,
    pub related: Vec<RelatedLink>,
}

#[derive(Debug, Deserialize)]
struct DdgResponse {
    #[serde(rename = "Abstract", default)]
    abstract_text: String,
    #[serde(rename = "Heading", default)]
    heading: String,
    #[serde(rename = "AbstractSource", default)]
    abstract_source: String,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<DdgTopic>,
}

/// Topic groups (`{"Name": …, "Topics": […]}`) carry no `Text` and are skipped.
#[derive(Debug, Deserialize)]
struct DdgTopic {
    #[serde(rename = "Text", default)]
    text: String,
    #[serde(rename = "FirstURL", default)]
    first_url: String,
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

impl DdgResponse {
    fn into_lookup(self, query: &str) -> InstantLookup {
        let instant = non_empty(self.abstract_text).map(|text| InstantAnswer {
            title: non_empty(self.heading).unwrap_or_else(|| query.to_string()),
            text,
            source: non_empty(self.abstract_source),
            url: non_empty(self.abstract_url),
        });

        let related = self
            .related_topics
            .into_iter()
            .filter(|topic| !topic.text.trim().is_empty())
            .take(MAX_RELATED_LINKS)
            .map(|topic| RelatedLink {
                text: topic.text,
                url: non_empty(topic.first_url),
            })
            .collect();

        InstantLookup { instant, related }
    }
}

pub(crate) async fn lookup(
    client: &Client,
    endpoint: &str,
    user_agent: &str,
    timeout: Duration,
    query: &str,
) -> Result<InstantLookup> {
    let response = client
        .get(endpoint)
        .query(&[
            ("q", query),
            ("format", "json"),
            ("no_html", "1"),
            ("skip_disambig", "1"),
        ])
        .header(USER_AGENT, user_agent)
        .timeout(timeout)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(SearchError::Status(status.as_u16()));
    }

    // Served as application/x-javascript, so decode the text ourselves.
    let body = response.text().await?;
    let parsed: DdgResponse = serde_json::from_str(&body)?;
    Ok(parsed.into_lookup(query))
}
