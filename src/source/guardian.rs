// src/source/guardian.rs
//! Guardian Content API provider (JSON search endpoint).

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::source::{normalize_text, ContentItem, ContentSource, Page, SourceError};

pub const DEFAULT_BASE_URL: &str = "https://content.guardianapis.com/search";
pub const DEFAULT_SECTION: &str = "us-news";
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Deserialize)]
struct Envelope {
    response: SearchResponse,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchItem>,
    #[serde(default)]
    current_page: Option<u32>,
    #[serde(default)]
    pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItem {
    web_title: Option<String>,
    web_publication_date: Option<String>,
    web_url: Option<String>,
    #[serde(default)]
    fields: Option<ItemFields>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemFields {
    headline: Option<String>,
    trail_text: Option<String>,
    body: Option<String>,
}

pub struct GuardianSource {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    section: String,
    page_size: u32,
}

impl GuardianSource {
    /// Reads `GUARDIAN_API_KEY`; the key presence is checked at fetch time so
    /// construction never fails.
    pub fn from_env() -> Self {
        let api_key = std::env::var("GUARDIAN_API_KEY").unwrap_or_default();
        Self::new(api_key)
    }

    pub fn new(api_key: String) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("campaign-issue-selector/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(15))
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            section: DEFAULT_SECTION.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    fn map_item(it: SearchItem) -> ContentItem {
        let fields = it.fields.unwrap_or(ItemFields {
            headline: None,
            trail_text: None,
            body: None,
        });
        let title = fields
            .headline
            .or(it.web_title)
            .unwrap_or_default();
        let description = normalize_text(&fields.trail_text.unwrap_or_default());
        let published_at = it
            .web_publication_date
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        ContentItem {
            title,
            description,
            full_text: fields.body.filter(|b| !b.is_empty()),
            source_id: "guardian".to_string(),
            published_at,
            url: it.web_url.unwrap_or_default(),
            issue: None,
        }
    }
}

#[async_trait::async_trait]
impl ContentSource for GuardianSource {
    async fn fetch_page(&self, page: u32) -> Result<Page, SourceError> {
        if self.api_key.is_empty() {
            return Err(SourceError::MissingKey);
        }

        let page_size = self.page_size.to_string();
        let page_s = page.to_string();
        let params = [
            ("api-key", self.api_key.as_str()),
            ("section", self.section.as_str()),
            ("page", page_s.as_str()),
            ("page-size", page_size.as_str()),
            ("order-by", "newest"),
            ("show-fields", "body,headline,trailText"),
        ];

        let resp = self
            .http
            .get(&self.base_url)
            .query(&params)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(SourceError::Status(resp.status()));
        }
        let body: Envelope = resp
            .json()
            .await
            .map_err(|e| SourceError::Shape(e.to_string()))?;

        let sr = body.response;
        let items: Vec<ContentItem> = sr.results.into_iter().map(Self::map_item).collect();

        // Exhausted when the page is empty or we are at the last known page.
        let next_page = if items.is_empty() {
            None
        } else {
            match (sr.current_page, sr.pages) {
                (Some(cur), Some(total)) if cur >= total => None,
                _ => Some(page + 1),
            }
        };

        Ok(Page { items, next_page })
    }

    fn name(&self) -> &'static str {
        "guardian"
    }
}
