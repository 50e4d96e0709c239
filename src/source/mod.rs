// src/source/mod.rs
//! Content source adapter: item types, the async source trait, and text
//! normalization for HTML-ish descriptions.

pub mod fixture;
pub mod guardian;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// One article as produced by a content source.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct ContentItem {
    pub title: String,
    pub description: String,
    pub full_text: Option<String>,
    pub source_id: String,
    pub published_at: Option<DateTime<Utc>>,
    pub url: String,
    /// Issue label assigned by the relevance filter; `None` until filtered.
    #[serde(default)]
    pub issue: Option<String>,
}

impl ContentItem {
    /// Dedup identity: case-insensitive (title, description) pair.
    pub fn content_key(&self) -> ContentKey {
        ContentKey {
            title: self.title.to_lowercase(),
            description: self.description.to_lowercase(),
        }
    }
}

/// Case-insensitive (title, description) pair used for deduplication
/// within one run. Items with equal keys are duplicates regardless of
/// any other field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentKey {
    title: String,
    description: String,
}

/// One fetched page plus the cursor for the next one. `next_page == None`
/// means the source is exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<ContentItem>,
    pub next_page: Option<u32>,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source api key missing (set GUARDIAN_API_KEY)")]
    MissingKey,
    #[error("source request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("source returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("source response not in the expected shape: {0}")]
    Shape(String),
}

/// Paginated content source. The page cursor is owned by the caller and
/// threaded through each call; providers hold no cursor state.
#[async_trait::async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_page(&self, page: u32) -> Result<Page, SourceError>;
    fn name(&self) -> &'static str;
}

/// Normalize description/trail text: decode HTML entities, strip tags,
/// normalize curly quotes, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str, desc: &str) -> ContentItem {
        ContentItem {
            title: title.to_string(),
            description: desc.to_string(),
            full_text: None,
            source_id: "test".into(),
            published_at: None,
            url: String::new(),
            issue: None,
        }
    }

    #[test]
    fn content_key_is_case_insensitive() {
        let a = item("Congress Passes Bill", "A Big Bill");
        let b = item("congress passes bill", "a big bill");
        assert_eq!(a.content_key(), b.content_key());
    }

    #[test]
    fn content_key_distinguishes_descriptions() {
        let a = item("Congress passes bill", "first take");
        let b = item("Congress passes bill", "second take");
        assert_ne!(a.content_key(), b.content_key());
    }

    #[test]
    fn normalize_text_strips_tags_and_entities() {
        let s = "  Senate &amp; House <b>agree</b>&nbsp;on a deal  ";
        assert_eq!(normalize_text(s), "Senate & House agree on a deal");
    }
}
