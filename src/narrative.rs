// src/narrative.rs
//! Narrative generator: one deterministic prompt per article, one completion
//! call, tolerant extraction into a draft record, plus the ranking used
//! when exactly one candidate must be picked.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::complete::{CompletionClient, Prompt};
use crate::extract::extract_structured;
use crate::source::ContentItem;

pub const NARRATIVE_TEMPERATURE: f32 = 0.85;
pub const PARSE_ERROR_MESSAGE: &str = "Could not parse response as JSON.";

/// Fields the model is asked for. All optional at parse time; whether a
/// partial draft is usable is the ranking's call, not the parser's.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeDraft {
    #[serde(default)]
    pub issue: Option<String>,
    #[serde(default)]
    pub local_stat: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl NarrativeDraft {
    fn field_filled(v: &Option<String>) -> bool {
        v.as_deref().map(str::trim).is_some_and(|s| !s.is_empty())
    }

    /// The email body is present and non-empty.
    pub fn has_email(&self) -> bool {
        Self::field_filled(&self.email)
    }
}

/// Success or an error record; never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrativeOutcome {
    Draft(NarrativeDraft),
    Failed {
        error: String,
        /// Raw model text, kept for diagnostics when extraction failed.
        raw: Option<String>,
    },
}

/// Deterministic prompt from one article and the fixed campaign template.
/// Full text falls back to title + description when the body is absent.
pub fn build_prompt(item: &ContentItem, location: &str) -> Prompt {
    let full_text = match &item.full_text {
        Some(body) if !body.trim().is_empty() => body.clone(),
        _ => format!("{}\n\n{}", item.title, item.description),
    };

    let user = format!(
        r#"You are an expert political strategist helping a Democratic campaign.

Your job is to analyze national news articles and generate persuasive fundraising emails for donors. The emails must feel locally relevant, emotionally compelling, and must highlight contrasts with Republican inaction.

Please complete these steps:

1. Identify the main national issue in the article. Use broad categories like:
   climate, healthcare, education, jobs, gun safety, immigration, inflation, technology, foreign policy, public safety.

2. Generate a single locally relevant stat or impact sentence about this issue in {location}. Make it sound specific and real, as if it came from a report, government source, or journalistic investigation. Be creative, but grounded. Turn this stat into a powerful, emotionally resonant message: humanize it with concrete anchors, vivid analogies, and a brief narrative vignette that puts a face on the number.

3. Write a fundraising email encouraging support for Democrats. The tone should be urgent, emotional, and local. Make it sound real and tailored to {location} residents. End with a call to donate and a P.S. linking the article.

Use this JSON format in your response (no markdown or code blocks):

{{
  "issue": "name of issue",
  "local_stat": "locally relevant stat or impact sentence",
  "email": "donor email message"
}}

ARTICLE FROM {source}:
{full_text}"#,
        location = location,
        source = item.source_id,
        full_text = full_text,
    );

    Prompt::user_only(user, NARRATIVE_TEMPERATURE)
}

/// One completion call, no retry. Every failure becomes an error record;
/// nothing propagates past this boundary.
pub async fn generate(
    client: &dyn CompletionClient,
    item: &ContentItem,
    location: &str,
) -> NarrativeOutcome {
    let prompt = build_prompt(item, location);
    let raw = match client.complete(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            warn!(title = %item.title, error = %e, "narrative completion failed");
            return NarrativeOutcome::Failed {
                error: e.to_string(),
                raw: None,
            };
        }
    };

    match extract_structured(&raw) {
        Some(json) => match serde_json::from_str::<NarrativeDraft>(&json) {
            Ok(draft) => NarrativeOutcome::Draft(draft),
            Err(_) => NarrativeOutcome::Failed {
                error: PARSE_ERROR_MESSAGE.to_string(),
                raw: Some(raw),
            },
        },
        None => NarrativeOutcome::Failed {
            error: PARSE_ERROR_MESSAGE.to_string(),
            raw: Some(raw),
        },
    }
}

/// One candidate article with its generated outcome.
pub type Candidate = (ContentItem, NarrativeOutcome);

/// First candidate in acquisition order whose outcome is a draft with a
/// non-empty email body. Earlier usable candidates win over later, more
/// fleshed-out ones.
pub fn pick_best(candidates: &[Candidate]) -> Option<&Candidate> {
    candidates.iter().find(|c| match &c.1 {
        NarrativeOutcome::Draft(d) => d.has_email(),
        NarrativeOutcome::Failed { .. } => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(title: &str) -> ContentItem {
        ContentItem {
            title: title.to_string(),
            description: "desc words".to_string(),
            full_text: None,
            source_id: "guardian".into(),
            published_at: None,
            url: "https://example.org/a".into(),
            issue: Some("climate".into()),
        }
    }

    fn draft(issue: Option<&str>, stat: Option<&str>, email: Option<&str>) -> NarrativeOutcome {
        NarrativeOutcome::Draft(NarrativeDraft {
            issue: issue.map(Into::into),
            local_stat: stat.map(Into::into),
            email: email.map(Into::into),
        })
    }

    #[test]
    fn prompt_is_deterministic_and_uses_fallback_text() {
        let it = item("Flood funding fight");
        let a = build_prompt(&it, "Washington, DC");
        let b = build_prompt(&it, "Washington, DC");
        assert_eq!(a, b);
        assert!(a.user.contains("Flood funding fight\n\ndesc words"));
        assert!(a.user.contains("ARTICLE FROM guardian"));
        assert!((a.temperature - NARRATIVE_TEMPERATURE).abs() < f32::EPSILON);
    }

    #[test]
    fn prompt_prefers_full_text_when_present() {
        let mut it = item("Flood funding fight");
        it.full_text = Some("the whole body".into());
        let p = build_prompt(&it, "Washington, DC");
        assert!(p.user.contains("the whole body"));
        assert!(!p.user.contains("Flood funding fight\n\ndesc words"));
    }

    #[test]
    fn pick_best_takes_first_usable_in_acquisition_order() {
        // A later complete draft must not jump ahead of an earlier partial
        // one that already has an email body.
        let candidates = vec![
            (item("a"), draft(None, None, Some("partial email"))),
            (item("b"), draft(Some("jobs"), Some("stat"), Some("email"))),
        ];
        let picked = pick_best(&candidates).expect("pick");
        assert_eq!(picked.0.title, "a");
    }

    #[test]
    fn pick_best_skips_failures_and_emailless_drafts() {
        let candidates = vec![
            (
                item("a"),
                NarrativeOutcome::Failed {
                    error: "boom".into(),
                    raw: None,
                },
            ),
            (item("b"), draft(Some("jobs"), Some("stat"), None)),
            (item("c"), draft(None, None, Some("just an email"))),
        ];
        let picked = pick_best(&candidates).expect("pick");
        assert_eq!(picked.0.title, "c");
    }

    #[test]
    fn pick_best_rejects_empty_and_whitespace_emails() {
        let candidates = vec![
            (item("a"), draft(Some("jobs"), Some("stat"), Some("  "))),
            (
                item("b"),
                NarrativeOutcome::Failed {
                    error: "boom".into(),
                    raw: Some("raw".into()),
                },
            ),
        ];
        assert!(pick_best(&candidates).is_none());
    }

    #[tokio::test]
    async fn transport_failure_yields_error_record_without_raw() {
        let client = crate::complete::FailingCompletion;
        let out = generate(&client, &item("a"), "Washington, DC").await;
        match out {
            NarrativeOutcome::Failed { raw, .. } => assert!(raw.is_none()),
            _ => panic!("expected failure record"),
        }
    }

    #[tokio::test]
    async fn malformed_response_keeps_raw_for_diagnostics() {
        let client = crate::complete::MockCompletion::new("utterly not json");
        let out = generate(&client, &item("a"), "Washington, DC").await;
        match out {
            NarrativeOutcome::Failed { error, raw } => {
                assert_eq!(error, PARSE_ERROR_MESSAGE);
                assert_eq!(raw.as_deref(), Some("utterly not json"));
            }
            _ => panic!("expected failure record"),
        }
    }

    #[tokio::test]
    async fn fenced_response_parses_into_draft() {
        let client = crate::complete::MockCompletion::new(
            "```json\n{\"issue\":\"jobs\",\"local_stat\":\"x\",\"email\":\"y\"}\n```",
        );
        let out = generate(&client, &item("a"), "Washington, DC").await;
        match out {
            NarrativeOutcome::Draft(d) => {
                assert_eq!(d.issue.as_deref(), Some("jobs"));
                assert_eq!(d.local_stat.as_deref(), Some("x"));
                assert!(d.has_email());
            }
            _ => panic!("expected draft"),
        }
    }
}
