// src/lib.rs
// Public library surface for the two bins and the integration tests.

pub mod acquire;
pub mod batch;
pub mod complete;
pub mod config;
pub mod extract;
pub mod narrative;
pub mod notify;
pub mod scores;
pub mod selector;
pub mod source;

// ---- Re-exports for stable public API ----
pub use crate::acquire::{collect, CollectOutcome, StopReason};
pub use crate::complete::{CompletionClient, OpenAiClient, Prompt};
pub use crate::config::{AiConfig, RunConfig};
pub use crate::extract::extract_structured;
pub use crate::narrative::{generate, pick_best, NarrativeDraft, NarrativeOutcome};
pub use crate::scores::{normalize, CategoryScores, ScorePolicy, CATEGORIES};
pub use crate::selector::{IssueSelector, KeywordConfig};
pub use crate::source::{ContentItem, ContentKey, ContentSource, Page};
