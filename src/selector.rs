// src/selector.rs
//! Relevance filter: data-driven keyword tables, the three-predicate gate,
//! first-match issue labeling, and within-page dedup.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::source::{ContentItem, ContentKey};

// --- env defaults & names ---
pub const DEFAULT_KEYWORDS_CONFIG_PATH: &str = "config/keywords.toml";
pub const ENV_KEYWORDS_CONFIG_PATH: &str = "KEYWORDS_CONFIG_PATH";

/// Issue label used when no category keyword set matches.
pub const UNKNOWN_ISSUE: &str = "unknown";

fn default_shared_words_required() -> usize {
    1
}

/* ----------------------------
Config schema (from TOML)
---------------------------- */

#[derive(Debug, Clone, Deserialize)]
pub struct KeywordConfig {
    /// Minimum shared title/description words for the overlap check.
    #[serde(default = "default_shared_words_required")]
    pub shared_words_required: usize,
    /// Primary-subject keyword set (named entities of the topical focus).
    pub primary: Vec<String>,
    /// Policy/government keyword set.
    pub policy: Vec<String>,
    /// National-context keyword set; evaluated for diagnostics only.
    #[serde(default)]
    pub national_context: Vec<String>,
    /// Ordered (category, keywords) pairs; first match wins.
    pub categories: Vec<CategoryCfg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryCfg {
    pub name: String,
    pub keywords: Vec<String>,
}

impl KeywordConfig {
    /// Load from a TOML file. Uses KEYWORDS_CONFIG_PATH or defaults to
    /// "config/keywords.toml".
    pub fn from_toml() -> anyhow::Result<Self> {
        let path = std::env::var(ENV_KEYWORDS_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_KEYWORDS_CONFIG_PATH));

        let content = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read keywords config at {}: {}", path.display(), e)
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from a TOML string.
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let mut cfg: KeywordConfig = toml::from_str(toml_str)?;
        // Keyword matching is substring-based over lowercased text, so the
        // tables themselves must be lowercase to match.
        for set in [&mut cfg.primary, &mut cfg.policy, &mut cfg.national_context] {
            for kw in set.iter_mut() {
                *kw = kw.to_lowercase();
            }
        }
        for cat in &mut cfg.categories {
            for kw in &mut cat.keywords {
                *kw = kw.to_lowercase();
            }
        }
        if cfg.shared_words_required == 0 {
            cfg.shared_words_required = default_shared_words_required();
        }
        Ok(cfg)
    }
}

/* ----------------------------
Filter
---------------------------- */

/// Per-item predicate breakdown, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateReport {
    pub has_primary: bool,
    pub has_policy: bool,
    pub has_national_context: bool,
    pub overlap_ok: bool,
}

impl GateReport {
    /// Acceptance is primary AND policy AND overlap. National context is
    /// reported but does not gate.
    pub fn accepted(&self) -> bool {
        self.has_primary && self.has_policy && self.overlap_ok
    }
}

/// Pure filter over keyword tables. Identical input yields identical output
/// and identical issue labels.
#[derive(Debug)]
pub struct IssueSelector {
    cfg: KeywordConfig,
}

impl IssueSelector {
    pub fn new(cfg: KeywordConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &KeywordConfig {
        &self.cfg
    }

    fn contains_any(text: &str, keywords: &[String]) -> bool {
        keywords.iter().any(|kw| text.contains(kw.as_str()))
    }

    /// Title/description lexical overlap: trivially true for empty or
    /// whitespace-only descriptions, otherwise at least
    /// `shared_words_required` shared case-insensitive words.
    pub fn has_enough_overlap(&self, title: &str, description: &str) -> bool {
        if description.trim().is_empty() {
            return true;
        }
        let title_lc = title.to_lowercase();
        let desc_lc = description.to_lowercase();
        let title_words: HashSet<&str> = title_lc.split_whitespace().collect();
        let shared = desc_lc
            .split_whitespace()
            .collect::<HashSet<&str>>()
            .intersection(&title_words)
            .count();
        shared >= self.cfg.shared_words_required
    }

    /// Evaluate all gate predicates against one item.
    pub fn evaluate(&self, item: &ContentItem) -> GateReport {
        let text = format!("{} {}", item.title, item.description).to_lowercase();
        GateReport {
            has_primary: Self::contains_any(&text, &self.cfg.primary),
            has_policy: Self::contains_any(&text, &self.cfg.policy),
            has_national_context: Self::contains_any(&text, &self.cfg.national_context),
            overlap_ok: self.has_enough_overlap(&item.title, &item.description),
        }
    }

    /// First category whose keyword set matches the joined lowercase text;
    /// `"unknown"` when none match. List order is significant and stable.
    pub fn label_issue(&self, item: &ContentItem) -> String {
        let text = format!("{} {}", item.title, item.description).to_lowercase();
        for cat in &self.cfg.categories {
            if Self::contains_any(&text, &cat.keywords) {
                return cat.name.clone();
            }
        }
        UNKNOWN_ISSUE.to_string()
    }

    /// Filter a page of items. Accepted items come back in input order, each
    /// annotated with its issue label. Duplicates by `ContentKey` within the
    /// same page are dropped here, independently of the acquisition loop's
    /// own dedup.
    pub fn filter(&self, items: &[ContentItem]) -> Vec<ContentItem> {
        let mut seen: HashSet<ContentKey> = HashSet::new();
        let mut out = Vec::new();

        for item in items {
            let report = self.evaluate(item);
            debug!(
                title = %item.title,
                has_primary = report.has_primary,
                has_policy = report.has_policy,
                has_national_context = report.has_national_context,
                overlap_ok = report.overlap_ok,
                "relevance gate"
            );
            if !report.accepted() {
                continue;
            }
            let key = item.content_key();
            if !seen.insert(key) {
                debug!(title = %item.title, "dropped within-page duplicate");
                continue;
            }
            let mut accepted = item.clone();
            accepted.issue = Some(self.label_issue(item));
            out.push(accepted);
        }
        out
    }
}

/* ----------------------------
Tests
---------------------------- */
