// tests/acquire_loop.rs
// Acquisition loop invariants, exercised against the in-memory fixture
// source with an inline keyword config.

use std::collections::HashSet;

use campaign_issue_selector::source::fixture::{FailingSource, FixtureSource};
use campaign_issue_selector::source::ContentItem;
use campaign_issue_selector::{collect, IssueSelector, KeywordConfig, StopReason};

const TEST_TOML: &str = r#"
primary = ["trump"]
policy = ["congress", "medicaid", "climate", "border"]

[[categories]]
name = "climate"
keywords = ["climate"]

[[categories]]
name = "healthcare"
keywords = ["medicaid"]

[[categories]]
name = "immigration"
keywords = ["border"]
"#;

fn selector() -> IssueSelector {
    IssueSelector::new(KeywordConfig::from_toml_str(TEST_TOML).expect("load inline test config"))
}

fn relevant(title: &str, desc_first_word: &str) -> ContentItem {
    // Description reuses the title's first word so the overlap check holds.
    ContentItem {
        title: title.to_string(),
        description: format!("{desc_first_word} follow-up details"),
        full_text: None,
        source_id: "fixture".into(),
        published_at: None,
        url: format!("https://example.org/{}", title.len()),
        issue: None,
    }
}

fn irrelevant(title: &str) -> ContentItem {
    ContentItem {
        title: title.to_string(),
        description: String::new(),
        full_text: None,
        source_id: "fixture".into(),
        published_at: None,
        url: String::new(),
        issue: None,
    }
}

#[tokio::test]
async fn duplicate_across_pages_is_dropped() {
    // Page 1: two relevant, distinct items. Page 2: one duplicate of page 1
    // (by ContentKey) plus one new relevant item.
    let a = relevant("Trump pushes Congress on Medicaid", "Trump");
    let b = relevant("Trump climate fight in Congress", "Trump");
    let mut a_dup = a.clone();
    a_dup.url = "https://example.org/other-url".into(); // other fields differ, key equal
    let c = relevant("Trump border plan stalls in Congress", "Trump");

    let source = FixtureSource::new(vec![vec![a, b], vec![a_dup, c]]);
    let sel = selector();

    let out = collect(&source, &sel, 4, 4).await;
    assert_eq!(out.items.len(), 3);
    assert_eq!(out.pages_fetched, 2);
    assert_eq!(source.fetch_count(), 2);

    let keys: HashSet<_> = out.items.iter().map(|i| i.content_key()).collect();
    assert_eq!(keys.len(), out.items.len(), "no duplicate ContentKey");
}

#[tokio::test]
async fn empty_first_page_terminates_immediately() {
    let source = FixtureSource::new(vec![vec![], vec![relevant("Trump climate bill", "Trump")]]);
    let sel = selector();

    let out = collect(&source, &sel, 4, 4).await;
    assert!(out.items.is_empty());
    assert_eq!(out.pages_fetched, 1);
    assert_eq!(source.fetch_count(), 1, "no further fetch calls");
    assert_eq!(out.stopped_by, StopReason::SourceExhausted);
}

#[tokio::test]
async fn page_cap_bounds_fetch_calls() {
    // Every page full of irrelevant items; the loop must give up at the cap.
    let page: Vec<ContentItem> = (0..5).map(|i| irrelevant(&format!("filler {i}"))).collect();
    let source = FixtureSource::new(vec![page.clone(), page.clone(), page.clone(), page]);
    let sel = selector();

    let out = collect(&source, &sel, 4, 3).await;
    assert!(out.items.is_empty());
    assert_eq!(out.pages_fetched, 3);
    assert_eq!(source.fetch_count(), 3);
    assert_eq!(out.stopped_by, StopReason::PageCapReached);
}

#[tokio::test]
async fn target_reached_within_a_page_discards_the_rest() {
    let page = vec![
        relevant("Trump pushes Congress on Medicaid", "Trump"),
        relevant("Trump climate fight in Congress", "Trump"),
        relevant("Trump border plan stalls in Congress", "Trump"),
    ];
    let source = FixtureSource::new(vec![page]);
    let sel = selector();

    let out = collect(&source, &sel, 2, 4).await;
    assert_eq!(out.items.len(), 2);
    assert_eq!(out.stopped_by, StopReason::TargetReached);
    // Acquisition order: page order, then within-page filter order.
    assert_eq!(out.items[0].title, "Trump pushes Congress on Medicaid");
    assert_eq!(out.items[1].title, "Trump climate fight in Congress");
}

#[tokio::test]
async fn fetch_error_ends_the_loop_like_exhaustion() {
    let sel = selector();
    let out = collect(&FailingSource, &sel, 4, 4).await;
    assert!(out.items.is_empty());
    assert_eq!(out.pages_fetched, 1);
    assert_eq!(out.stopped_by, StopReason::SourceError);
}

#[tokio::test]
async fn output_is_labeled_and_bounded() {
    let page = vec![
        relevant("Trump pushes Congress on Medicaid", "Trump"),
        relevant("Trump climate fight in Congress", "Trump"),
    ];
    let source = FixtureSource::new(vec![page]);
    let sel = selector();

    let out = collect(&source, &sel, 10, 4).await;
    assert!(out.items.len() <= 10);
    assert!(out.items.iter().all(|i| i.issue.is_some()));
    assert_eq!(out.items[0].issue.as_deref(), Some("healthcare"));
    assert_eq!(out.items[1].issue.as_deref(), Some("climate"));
}
