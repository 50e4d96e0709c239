// tests/daily_pick_flow.rs
// End-to-end flow with a fixture source and a mock completion client:
// collect -> narrative per candidate -> pick_best -> message build.

use campaign_issue_selector::complete::{FailingCompletion, MockCompletion};
use campaign_issue_selector::narrative::{generate, pick_best, Candidate, NarrativeOutcome};
use campaign_issue_selector::notify::{build_subject, build_text_body, DailyPick};
use campaign_issue_selector::source::fixture::FixtureSource;
use campaign_issue_selector::source::ContentItem;
use campaign_issue_selector::{collect, IssueSelector, KeywordConfig};

const TEST_TOML: &str = r#"
primary = ["trump"]
policy = ["congress", "climate", "medicaid"]

[[categories]]
name = "climate"
keywords = ["climate"]

[[categories]]
name = "healthcare"
keywords = ["medicaid"]
"#;

const GOOD_RESPONSE: &str = r#"```json
{"issue": "climate", "local_stat": "Rainfall is up 10 inches this year.", "email": "Friend, chip in $5 today."}
```"#;

fn selector() -> IssueSelector {
    IssueSelector::new(KeywordConfig::from_toml_str(TEST_TOML).expect("load inline test config"))
}

fn article(title: &str) -> ContentItem {
    ContentItem {
        title: title.to_string(),
        description: format!("Trump {}", title.to_lowercase()),
        full_text: Some("Full article body.".into()),
        source_id: "fixture".into(),
        published_at: None,
        url: "https://example.org/story".into(),
        issue: None,
    }
}

#[tokio::test]
async fn full_flow_produces_a_deliverable_pick() {
    let source = FixtureSource::new(vec![vec![
        article("Trump climate funding fight in Congress"),
        article("Trump Medicaid cuts clear Congress"),
    ]]);
    let sel = selector();
    let collected = collect(&source, &sel, 4, 4).await;
    assert_eq!(collected.items.len(), 2);

    let client = MockCompletion::new(GOOD_RESPONSE);
    let mut candidates: Vec<Candidate> = Vec::new();
    for item in collected.items {
        let outcome = generate(&client, &item, "Washington, DC").await;
        candidates.push((item, outcome));
    }

    let (picked_article, outcome) = pick_best(&candidates).expect("usable pick");
    let NarrativeOutcome::Draft(draft) = outcome else {
        panic!("picked outcome must be a draft");
    };
    assert_eq!(
        picked_article.title,
        "Trump climate funding fight in Congress",
        "first fully valid candidate wins"
    );

    let pick = DailyPick {
        article: picked_article.clone(),
        draft: draft.clone(),
    };
    assert_eq!(
        build_subject(&pick),
        "Daily Pick — Climate: Trump climate funding fight in Congress"
    );
    let body = build_text_body(&pick, chrono::Utc::now());
    assert!(body.contains("Rainfall is up 10 inches this year."));
    assert!(body.contains("chip in $5"));
}

#[tokio::test]
async fn all_transport_failures_yield_no_usable_pick() {
    let source = FixtureSource::new(vec![vec![
        article("Trump climate funding fight in Congress"),
        article("Trump Medicaid cuts clear Congress"),
    ]]);
    let sel = selector();
    let collected = collect(&source, &sel, 4, 4).await;

    let client = FailingCompletion;
    let mut candidates: Vec<Candidate> = Vec::new();
    for item in collected.items {
        let outcome = generate(&client, &item, "Washington, DC").await;
        assert!(matches!(outcome, NarrativeOutcome::Failed { .. }));
        candidates.push((item, outcome));
    }
    assert!(pick_best(&candidates).is_none());
}

#[tokio::test]
async fn one_bad_candidate_does_not_poison_the_batch() {
    // The first candidate parses as garbage only for the failing client;
    // with a mixed sequence we still expect the draft to be picked.
    let good = article("Trump climate funding fight in Congress");
    let bad = article("Trump Medicaid cuts clear Congress");

    let failing = FailingCompletion;
    let mock = MockCompletion::new(GOOD_RESPONSE);

    let bad_outcome = generate(&failing, &bad, "Washington, DC").await;
    let good_outcome = generate(&mock, &good, "Washington, DC").await;

    let candidates = vec![(bad, bad_outcome), (good.clone(), good_outcome)];
    let (picked, _) = pick_best(&candidates).expect("draft candidate survives");
    assert_eq!(picked.title, good.title);
}
