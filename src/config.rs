// src/config.rs
//! Run configuration: AI provider settings (JSON file with ENV key
//! indirection) and pipeline bounds (env overrides over defaults).

use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

pub const DEFAULT_AI_CONFIG_PATH: &str = "config/ai.json";

fn default_model() -> String {
    "gpt-4o".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// "openai" (case-insensitive)
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// "ENV" means: read from OPENAI_API_KEY
    pub api_key: String,
}

impl AiConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let mut cfg: AiConfig = serde_json::from_str(&data)?;

        cfg.provider = cfg.provider.to_lowercase();
        if cfg.provider != "openai" {
            anyhow::bail!("Unsupported provider in config: {}", cfg.provider);
        }

        // Resolve api key if "ENV"
        if cfg.api_key.trim().eq_ignore_ascii_case("env") {
            cfg.api_key = env::var("OPENAI_API_KEY")
                .map_err(|_| anyhow::anyhow!("Missing OPENAI_API_KEY env var"))?;
        }

        Ok(cfg)
    }

    /// `config/ai.json` if present, otherwise env-only defaults.
    pub fn load_default() -> anyhow::Result<Self> {
        let path = Path::new(DEFAULT_AI_CONFIG_PATH);
        if path.exists() {
            return Self::load_from_file(path);
        }
        Ok(Self {
            provider: "openai".to_string(),
            model: env::var("OPENAI_MODEL").unwrap_or_else(|_| default_model()),
            api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
        })
    }
}

/// Bounds and knobs for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Stop collecting once this many relevant items are held.
    pub target_count: usize,
    /// Never fetch more pages than this in one run.
    pub max_pages: u32,
    /// Location the narrative should feel local to.
    pub location: String,
    /// Courtesy pacing between batch completion calls, in milliseconds.
    pub pacing_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            target_count: 4,
            max_pages: 4,
            location: "Washington, DC".to_string(),
            pacing_ms: 1_000,
        }
    }
}

impl RunConfig {
    /// Defaults with env overrides: SELECTOR_TARGET_COUNT, SELECTOR_MAX_PAGES,
    /// SELECTOR_LOCATION, SELECTOR_PACING_MS.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(v) = parse_env::<usize>("SELECTOR_TARGET_COUNT") {
            cfg.target_count = v;
        }
        if let Some(v) = parse_env::<u32>("SELECTOR_MAX_PAGES") {
            cfg.max_pages = v;
        }
        if let Ok(v) = env::var("SELECTOR_LOCATION") {
            if !v.trim().is_empty() {
                cfg.location = v;
            }
        }
        if let Some(v) = parse_env::<u64>("SELECTOR_PACING_MS") {
            cfg.pacing_ms = v;
        }
        cfg
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse().ok())
}
