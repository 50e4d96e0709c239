// src/source/fixture.rs
//! In-memory source used by tests and local dry runs.

use crate::source::{ContentItem, ContentSource, Page, SourceError};
use std::sync::atomic::{AtomicU32, Ordering};

/// Serves pre-built pages by 1-based page number and counts fetches so
/// tests can assert on the page budget.
pub struct FixtureSource {
    pages: Vec<Vec<ContentItem>>,
    fetches: AtomicU32,
}

impl FixtureSource {
    pub fn new(pages: Vec<Vec<ContentItem>>) -> Self {
        Self {
            pages,
            fetches: AtomicU32::new(0),
        }
    }

    pub fn fetch_count(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ContentSource for FixtureSource {
    async fn fetch_page(&self, page: u32) -> Result<Page, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let idx = page.saturating_sub(1) as usize;
        let items = self.pages.get(idx).cloned().unwrap_or_default();
        let next_page = if idx + 1 < self.pages.len() && !items.is_empty() {
            Some(page + 1)
        } else {
            None
        };
        Ok(Page { items, next_page })
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}

/// Always fails; used to assert that fetch errors end the loop cleanly.
pub struct FailingSource;

#[async_trait::async_trait]
impl ContentSource for FailingSource {
    async fn fetch_page(&self, _page: u32) -> Result<Page, SourceError> {
        Err(SourceError::Shape("fixture failure".to_string()))
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}
