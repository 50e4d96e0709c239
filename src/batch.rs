// src/batch.rs
//! Batch classification: score each {subject, body} record over the closed
//! category set and emit one CSV row per success. Failed items are logged
//! and skipped; the batch keeps going.

use std::io::{self, Write};
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::complete::{CompletionClient, Prompt};
use crate::extract::extract_object;
use crate::scores::{normalize, CategoryScores, ScorePolicy, CATEGORIES};

/// One input record to classify.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TaggedRecord {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

/// One classified row: the identifying subject plus its normalized scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedRow {
    pub subject: String,
    pub scores: CategoryScores,
}

const SYSTEM_PROMPT: &str =
    "You classify campaign messages into issue relevance scores. Only respond in valid JSON. No explanations.";

const CATEGORY_DESCRIPTIONS: &str = "\
Climate Change — Mitigate and adapt to environmental changes
Healthcare Access — Expand affordable care, especially rural and mental health
Reproductive Rights — Protect abortion and reproductive care
Public Education — Fund schools and improve equity
Gun Safety — Enact common-sense reforms
Voting Rights — Oppose voter suppression
Criminal Justice Reform — End mass incarceration, address police abuse
Immigration — Ensure humane, fair immigration policy
Jobs & Wages — Raise minimum wage, support unions
Affordable Housing — Address rent inflation and homelessness
Infrastructure — Invest in roads, transit, water, broadband
LGBTQ+ Rights — Protect civil rights and access to care
Childcare & Paid Leave — Lower costs and support working families
Racial Equity — Close systemic gaps
Tax Fairness — Make tax code progressive
Rural Investment — Support underserved rural areas
Clean Energy — Accelerate renewable transition
Small Business Support — Revitalize local economies
Disability Rights — Expand access and inclusion
National Security — Strengthen democratic alliances
Trump Overreach — Federal government going beyond allowed powers
Beat Republicans — Support Democrats or oppose GOP candidates
Raffle/Opportunity — Sweepstakes, meet-and-greet, or special donor opportunities
Urgency/End of Quarter — End-of-period urgency framing";

/// Strict scoring prompt: closed key set, integers 0-5, at most three >= 3,
/// JSON only. Deterministic sampling (temperature 0).
pub fn build_scoring_prompt(record: &TaggedRecord) -> Prompt {
    let keys = CATEGORIES.join("\", \"");
    let user = format!(
        r#"You are an issue classification assistant for progressive campaigns. Classify the MAIN topics of the message and rate each category from 0 (not relevant) to 5 (highly relevant). Return ONLY valid JSON.

CATEGORIES:
{CATEGORY_DESCRIPTIONS}

MESSAGE:
Subject: {subject}

{body}

SCORING RULES (strict):
- Only return the following keys exactly (case and spacing must match): ["{keys}"].
- Do NOT add, remove, rename, or reorder keys. If a category is not relevant, set it to 0.
- 4-5 ONLY if the main call-to-action, purpose, or argument centers on that category.
- 1-2 for secondary/background mentions that support the main point but are not the focus.
- 0 if not mentioned or only indirectly implied.
- At most THREE categories may be >= 3.
- Use ONLY integers 0-5.
- Respond with ONLY valid JSON (no markdown fences, no commentary)."#,
        subject = record.subject,
        body = record.body,
    );
    Prompt::with_system(SYSTEM_PROMPT, user, 0.0)
}

/// Classify one record. `None` covers both transport failures and
/// unextractable output; the caller logs and moves on.
pub async fn tag_record(
    client: &dyn CompletionClient,
    record: &TaggedRecord,
    policy: &ScorePolicy,
) -> Option<TaggedRow> {
    let prompt = build_scoring_prompt(record);
    let raw = match client.complete(&prompt).await {
        Ok(text) => text,
        Err(e) => {
            warn!(subject = %record.subject, error = %e, "classification call failed");
            return None;
        }
    };
    let Some(map) = extract_object(&raw) else {
        warn!(subject = %record.subject, "could not extract JSON from model output");
        return None;
    };
    Some(TaggedRow {
        subject: record.subject.clone(),
        scores: normalize(&map, policy),
    })
}

/// Classify a whole batch sequentially with a courtesy pacing delay between
/// calls. Failures are skipped, order of successes follows input order.
pub async fn tag_records(
    client: &dyn CompletionClient,
    records: &[TaggedRecord],
    policy: &ScorePolicy,
    pacing: Duration,
) -> Vec<TaggedRow> {
    let mut rows = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        info!(n = i + 1, total = records.len(), "tagging record");
        match tag_record(client, record, policy).await {
            Some(row) => rows.push(row),
            None => warn!(n = i + 1, "skipping record after classification failure"),
        }
        if i + 1 < records.len() && !pacing.is_zero() {
            tokio::time::sleep(pacing).await;
        }
    }
    rows
}

// ------------------------------------------------------------
// CSV output
// ------------------------------------------------------------

/// RFC 4180 quoting; only fields that need it are quoted.
fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Write rows as CSV: `Subject` first, then every category in canonical
/// order. The header is written even for an empty batch.
pub fn write_csv<W: Write>(mut w: W, rows: &[TaggedRow]) -> io::Result<()> {
    let mut header = vec!["Subject".to_string()];
    header.extend(CATEGORIES.iter().map(|c| csv_field(c)));
    writeln!(w, "{}", header.join(","))?;

    for row in rows {
        let mut cols = vec![csv_field(&row.subject)];
        cols.extend(row.scores.iter().map(|(_, s)| s.to_string()));
        writeln!(w, "{}", cols.join(","))?;
    }
    Ok(())
}
