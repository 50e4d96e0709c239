// src/complete.rs
//! Generative completion adapter: provider trait, the OpenAI chat provider,
//! and a mock for tests. One call is one complete response or one failure;
//! retries are the caller's business (and the pipeline does none).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AiConfig;

/// A single completion request: optional system framing, the user prompt,
/// and the sampling temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: Option<String>,
    pub user: String,
    pub temperature: f32,
}

impl Prompt {
    pub fn user_only(user: impl Into<String>, temperature: f32) -> Self {
        Self {
            system: None,
            user: user.into(),
            temperature,
        }
    }

    pub fn with_system(
        system: impl Into<String>,
        user: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            system: Some(system.into()),
            user: user.into(),
            temperature,
        }
    }
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion api key missing (set OPENAI_API_KEY)")]
    MissingKey,
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("completion endpoint returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("completion response carried no choices")]
    EmptyResponse,
}

/// Opaque text-in/text-out completion client.
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<String, CompletionError>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

// ------------------------------------------------------------
// OpenAI provider
// ------------------------------------------------------------

pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("campaign-issue-selector/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key,
            model,
        }
    }

    pub fn from_config(cfg: &AiConfig) -> Self {
        Self::new(cfg.api_key.clone(), cfg.model.clone())
    }
}

#[async_trait::async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, prompt: &Prompt) -> Result<String, CompletionError> {
        if self.api_key.is_empty() {
            return Err(CompletionError::MissingKey);
        }

        #[derive(Serialize)]
        struct Msg<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            model: &'a str,
            messages: Vec<Msg<'a>>,
            temperature: f32,
        }
        #[derive(Deserialize)]
        struct Resp {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMsg,
        }
        #[derive(Deserialize)]
        struct ChoiceMsg {
            content: String,
        }

        let mut messages = Vec::with_capacity(2);
        if let Some(sys) = &prompt.system {
            messages.push(Msg {
                role: "system",
                content: sys,
            });
        }
        messages.push(Msg {
            role: "user",
            content: &prompt.user,
        });

        let req = Req {
            model: &self.model,
            messages,
            temperature: prompt.temperature,
        };

        let resp = self
            .http
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(CompletionError::Status(resp.status()));
        }
        let body: Resp = resp.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(CompletionError::EmptyResponse)?;
        Ok(content.trim().to_string())
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

// ------------------------------------------------------------
// Mock client for tests/local runs
// ------------------------------------------------------------

/// Returns a fixed response for every prompt.
#[derive(Clone)]
pub struct MockCompletion {
    pub fixed: String,
}

impl MockCompletion {
    pub fn new(fixed: impl Into<String>) -> Self {
        Self {
            fixed: fixed.into(),
        }
    }
}

#[async_trait::async_trait]
impl CompletionClient for MockCompletion {
    async fn complete(&self, _prompt: &Prompt) -> Result<String, CompletionError> {
        Ok(self.fixed.clone())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Always fails with a transport error; used to exercise error records.
pub struct FailingCompletion;

#[async_trait::async_trait]
impl CompletionClient for FailingCompletion {
    async fn complete(&self, _prompt: &Prompt) -> Result<String, CompletionError> {
        Err(CompletionError::EmptyResponse)
    }

    fn provider_name(&self) -> &'static str {
        "failing"
    }
}
