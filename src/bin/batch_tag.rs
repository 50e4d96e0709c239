// src/bin/batch_tag.rs
//! Batch tagging run: read {subject, body} records from a JSON file,
//! classify each against the closed category set, write one CSV row per
//! success. Failed records are logged and skipped.
//!
//! Paths come from env (BATCH_INPUT_JSON / BATCH_OUTPUT_CSV) with defaults
//! relative to the working directory.

use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use campaign_issue_selector::batch::{tag_records, write_csv, TaggedRecord};
use campaign_issue_selector::{AiConfig, OpenAiClient, RunConfig, ScorePolicy};

const DEFAULT_INPUT: &str = "data/records.json";
const DEFAULT_OUTPUT: &str = "tagged_records.csv";

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
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "batch tagging failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let input = std::env::var("BATCH_INPUT_JSON").unwrap_or_else(|_| DEFAULT_INPUT.to_string());
    let output = std::env::var("BATCH_OUTPUT_CSV").unwrap_or_else(|_| DEFAULT_OUTPUT.to_string());

    let data = std::fs::read_to_string(&input)
        .with_context(|| format!("reading records from {input}"))?;
    let records: Vec<TaggedRecord> =
        serde_json::from_str(&data).with_context(|| format!("parsing records from {input}"))?;
    info!(count = records.len(), input = %input, "loaded records");

    let ai_cfg = AiConfig::load_default()?;
    let client = OpenAiClient::from_config(&ai_cfg);
    let run_cfg = RunConfig::from_env();

    let rows = tag_records(
        &client,
        &records,
        &ScorePolicy::default(),
        Duration::from_millis(run_cfg.pacing_ms),
    )
    .await;

    if rows.is_empty() {
        warn!("no records classified successfully; nothing to save");
        return Ok(());
    }

    let file = File::create(&output).with_context(|| format!("creating {output}"))?;
    write_csv(BufWriter::new(file), &rows).with_context(|| format!("writing {output}"))?;
    info!(rows = rows.len(), output = %output, "saved results");
    Ok(())
}
