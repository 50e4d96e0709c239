// src/extract.rs
//! Response extractor: recovers a JSON payload from free-form model text.
//!
//! The extractor is an ordered list of parse strategies; the first one that
//! yields valid JSON wins. It never panics on malformed input — `None`
//! means "classification unavailable for this item".

use tracing::trace;

/// Named parse strategy. Strategies run against fence-stripped text.
type Strategy = fn(&str) -> Option<String>;

const STRATEGIES: &[(&str, Strategy)] = &[
    ("direct", parse_direct),
    ("brace_slice", parse_brace_slice),
];

/// Extract a JSON payload from `raw`, tolerating surrounding whitespace,
/// a wrapping code fence (optionally language-tagged), and extraneous
/// prose before or after the object.
pub fn extract_structured(raw: &str) -> Option<String> {
    let stripped = strip_fence(raw.trim());
    for (name, strategy) in STRATEGIES {
        if let Some(json) = strategy(stripped) {
            trace!(strategy = name, "extracted structured payload");
            return Some(json);
        }
    }
    None
}

/// Strip a wrapping ``` fence: an opening fence line (with an optional
/// language tag) at the start and a closing fence at the end. A missing
/// closing fence still strips the opening one.
fn strip_fence(s: &str) -> &str {
    let Some(after_ticks) = s.strip_prefix("```") else {
        return s;
    };
    // Opening fence runs to the end of its line (language tag included).
    let Some(nl) = after_ticks.find('\n') else {
        return s;
    };
    let mut inner = after_ticks[nl + 1..].trim_end();
    if let Some(without_close) = inner.strip_suffix("```") {
        inner = without_close.trim_end();
    }
    inner
}

fn parse_direct(s: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(s)
        .ok()
        .map(|_| s.to_string())
}

fn parse_brace_slice(s: &str) -> Option<String> {
    let start = s.find('{')?;
    let end = s.rfind('}')?;
    if end <= start {
        return None;
    }
    let candidate = &s[start..=end];
    serde_json::from_str::<serde_json::Value>(candidate)
        .ok()
        .map(|_| candidate.to_string())
}

/// Convenience: extract and decode into a JSON value in one step.
pub fn extract_object(raw: &str) -> Option<serde_json::Map<String, serde_json::Value>> {
    let text = extract_structured(raw)?;
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(serde_json::Value::Object(map)) => Some(map),
        _ => None,
    }
}
