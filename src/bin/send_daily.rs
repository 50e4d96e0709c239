// src/bin/send_daily.rs
//! Daily single-pick run: collect relevant articles, generate a narrative
//! for each candidate, pick the best one, and deliver it by email.
//!
//! Exit codes: 0 sent, 2 no relevant items, 3 no usable narrative,
//! 4 delivery failed.

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use campaign_issue_selector::narrative::{generate, pick_best, Candidate, NarrativeOutcome};
use campaign_issue_selector::notify::{email::EmailSender, DailyPick};
use campaign_issue_selector::source::guardian::GuardianSource;
use campaign_issue_selector::{collect, AiConfig, IssueSelector, KeywordConfig, OpenAiClient, RunConfig};

const EXIT_OK: u8 = 0;
const EXIT_NO_RELEVANT: u8 = 2;
const EXIT_NO_NARRATIVE: u8 = 3;
const EXIT_DELIVERY_FAILED: u8 = 4;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing();

    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!(error = %e, "run failed");
            ExitCode::from(EXIT_DELIVERY_FAILED)
        }
    }
}

async fn run() -> anyhow::Result<u8> {
    let run_cfg = RunConfig::from_env();
    let keywords = KeywordConfig::from_toml()?;
    let selector = IssueSelector::new(keywords);
    let source = GuardianSource::from_env();

    let outcome = collect(&source, &selector, run_cfg.target_count, run_cfg.max_pages).await;
    if outcome.items.is_empty() {
        info!(reason = ?outcome.stopped_by, "no relevant articles today; not sending");
        return Ok(EXIT_NO_RELEVANT);
    }
    info!(
        candidates = outcome.items.len(),
        pages = outcome.pages_fetched,
        "collected candidates"
    );

    let ai_cfg = AiConfig::load_default()?;
    let client = OpenAiClient::from_config(&ai_cfg);

    let mut candidates: Vec<Candidate> = Vec::with_capacity(outcome.items.len());
    for item in outcome.items {
        let result = generate(&client, &item, &run_cfg.location).await;
        if let NarrativeOutcome::Failed { error, .. } = &result {
            info!(title = %item.title, error = %error, "candidate narrative failed");
        }
        candidates.push((item, result));
    }

    let Some((article, outcome)) = pick_best(&candidates) else {
        info!("could not generate a usable fundraising email; not sending");
        return Ok(EXIT_NO_NARRATIVE);
    };
    let NarrativeOutcome::Draft(draft) = outcome else {
        // pick_best only returns drafts.
        return Ok(EXIT_NO_NARRATIVE);
    };

    let pick = DailyPick {
        article: article.clone(),
        draft: draft.clone(),
    };

    let sender = match EmailSender::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "email configuration invalid");
            return Ok(EXIT_DELIVERY_FAILED);
        }
    };
    match sender.send_daily_pick(&pick).await {
        Ok(()) => {
            info!(title = %pick.article.title, issue = pick.issue(), "daily pick sent");
            Ok(EXIT_OK)
        }
        Err(e) => {
            error!(error = %e, "email send failed");
            Ok(EXIT_DELIVERY_FAILED)
        }
    }
}
