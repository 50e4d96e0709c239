// src/scores.rs
//! Score normalizer: clamps per-category relevance scores and enforces the
//! "at most three headline topics" ceiling over a fixed, closed category set.

use serde_json::{Map, Value};

/// Closed category set in canonical order. Column order of the batch CSV and
/// the tie-break order for the high-score ceiling both follow this list.
pub const CATEGORIES: [&str; 24] = [
    "Climate Change",
    "Healthcare Access",
    "Reproductive Rights",
    "Public Education",
    "Gun Safety",
    "Voting Rights",
    "Criminal Justice Reform",
    "Immigration",
    "Jobs & Wages",
    "Affordable Housing",
    "Infrastructure",
    "LGBTQ+ Rights",
    "Childcare & Paid Leave",
    "Racial Equity",
    "Tax Fairness",
    "Rural Investment",
    "Clean Energy",
    "Small Business Support",
    "Disability Rights",
    "National Security",
    "Trump Overreach",
    "Beat Republicans",
    "Raffle/Opportunity",
    "Urgency/End of Quarter",
];

pub const SCORE_MAX: i64 = 5;

/// Ceiling policy: at most `max_high` categories may score at or above
/// `high_floor`; extras are demoted to `demote_to` ("secondary relevance").
/// Defaults are the observed constants, kept configurable rather than
/// re-derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScorePolicy {
    pub max_high: usize,
    pub high_floor: u8,
    pub demote_to: u8,
}

impl Default for ScorePolicy {
    fn default() -> Self {
        Self {
            max_high: 3,
            high_floor: 3,
            demote_to: 2,
        }
    }
}

/// Total mapping over [`CATEGORIES`]: every category present, every value an
/// integer in 0..=5, at most `max_high` values at or above `high_floor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryScores {
    scores: [u8; CATEGORIES.len()],
}

impl CategoryScores {
    pub fn get(&self, category: &str) -> Option<u8> {
        CATEGORIES
            .iter()
            .position(|c| *c == category)
            .map(|i| self.scores[i])
    }

    /// Iterate (category, score) in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u8)> + '_ {
        CATEGORIES
            .iter()
            .zip(self.scores.iter())
            .map(|(c, s)| (*c, *s))
    }

    pub fn to_json(&self) -> Map<String, Value> {
        self.iter()
            .map(|(c, s)| (c.to_string(), Value::from(s)))
            .collect()
    }
}

/// Best-effort integer coercion: JSON numbers (floats truncated) and numeric
/// strings count; anything else is 0.
fn coerce_int(v: &Value) -> i64 {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    }
}

/// Normalize a raw decoded mapping into a [`CategoryScores`]:
/// read each known category (unknown keys are silently dropped), coerce to
/// an integer, clamp into 0..=5, then demote every high score beyond the
/// `max_high` strongest to the secondary ceiling. Ties sort by canonical
/// list order, so the result is reproducible.
pub fn normalize(raw: &Map<String, Value>, policy: &ScorePolicy) -> CategoryScores {
    let mut scores = [0u8; CATEGORIES.len()];
    for (i, cat) in CATEGORIES.iter().enumerate() {
        if let Some(v) = raw.get(*cat) {
            scores[i] = coerce_int(v).clamp(0, SCORE_MAX) as u8;
        }
    }

    let mut high: Vec<usize> = (0..scores.len())
        .filter(|&i| scores[i] >= policy.high_floor)
        .collect();
    // Score descending; equal scores keep canonical order (stable sort over
    // an index list already in canonical order).
    high.sort_by(|&a, &b| scores[b].cmp(&scores[a]));
    for &i in high.iter().skip(policy.max_high) {
        scores[i] = policy.demote_to;
    }

    CategoryScores { scores }
}

/// Normalize with the default policy.
pub fn normalize_default(raw: &Map<String, Value>) -> CategoryScores {
    normalize(raw, &ScorePolicy::default())
}
