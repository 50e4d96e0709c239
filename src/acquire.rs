// src/acquire.rs
//! Acquisition loop: drives a content source page by page, applies the
//! relevance filter, dedups across pages, and stops at the target count,
//! the page cap, or source exhaustion.

use std::collections::HashSet;
use tracing::{info, warn};

use crate::selector::IssueSelector;
use crate::source::{ContentItem, ContentKey, ContentSource};

/// Why the loop stopped. Fetch errors and empty pages both end the loop;
/// they are distinguished here and in the logs only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    PageCapReached,
    SourceExhausted,
    SourceError,
}

#[derive(Debug)]
pub struct CollectOutcome {
    pub items: Vec<ContentItem>,
    pub pages_fetched: u32,
    pub stopped_by: StopReason,
}

/// Collect up to `target_count` relevant, deduplicated items within at most
/// `max_pages` fetches. Output order is acquisition order: page order, then
/// within-page filter order. Once the target is hit inside a page, the rest
/// of that page is discarded, not deferred.
pub async fn collect(
    source: &dyn ContentSource,
    selector: &IssueSelector,
    target_count: usize,
    max_pages: u32,
) -> CollectOutcome {
    let mut items: Vec<ContentItem> = Vec::with_capacity(target_count);
    let mut seen: HashSet<ContentKey> = HashSet::new();
    let mut pages_fetched: u32 = 0;
    // Explicit cursor, owned here and threaded through each fetch.
    let mut cursor: u32 = 1;

    let stopped_by = loop {
        if target_count == 0 {
            break StopReason::TargetReached;
        }
        if pages_fetched >= max_pages {
            break StopReason::PageCapReached;
        }

        let page = match source.fetch_page(cursor).await {
            Ok(p) => p,
            Err(e) => {
                warn!(source = source.name(), page = cursor, error = %e, "fetch failed; stopping");
                pages_fetched += 1;
                break StopReason::SourceError;
            }
        };
        pages_fetched += 1;

        if page.items.is_empty() {
            info!(source = source.name(), page = cursor, "source exhausted");
            break StopReason::SourceExhausted;
        }

        let relevant = selector.filter(&page.items);
        info!(
            source = source.name(),
            page = cursor,
            received = page.items.len(),
            relevant = relevant.len(),
            "page filtered"
        );

        for item in relevant {
            if items.len() >= target_count {
                break;
            }
            if seen.insert(item.content_key()) {
                items.push(item);
            }
        }

        if items.len() >= target_count {
            break StopReason::TargetReached;
        }
        match page.next_page {
            Some(next) => cursor = next,
            None => break StopReason::SourceExhausted,
        }
    };

    info!(
        collected = items.len(),
        pages = pages_fetched,
        reason = ?stopped_by,
        "collection finished"
    );
    CollectOutcome {
        items,
        pages_fetched,
        stopped_by,
    }
}
