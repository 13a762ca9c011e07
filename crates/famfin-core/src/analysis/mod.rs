//! Analysis client
//!
//! Sends category totals to a remote chat-completions service and returns the
//! narrative it writes back. Backends implement [`AnalysisBackend`]; the
//! [`AnalysisClient`] enum picks one at runtime.
//!
//! # Supported Backends
//!
//! - **Remote**: any endpoint speaking the `chatId` chat-completions dialect
//! - **Mock**: canned replies for tests and offline runs

mod chat;
mod mock;

pub use chat::ChatCompletionsBackend;
pub use mock::MockBackend;

use async_trait::async_trait;
use tracing::info;

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::models::CategoryTotalsByKind;

/// What the remote service is asked to do with the data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Analyze,
    Advice,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analyze => "analyze",
            Self::Advice => "advice",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A text-generation service that answers a single prompt
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Send one user message and return the first reply verbatim
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Where requests go, for logs and status output
    fn host(&self) -> &str;
}

/// Analysis client that wraps one backend
#[derive(Debug)]
pub enum AnalysisClient {
    Remote(ChatCompletionsBackend),
    Mock(MockBackend),
}

impl AnalysisClient {
    /// Build the remote client from config
    ///
    /// Returns `None` when no token is configured.
    pub fn from_config(config: &AnalysisConfig) -> Result<Option<Self>> {
        let Some(token) = config.token.as_deref().filter(|t| !t.is_empty()) else {
            return Ok(None);
        };
        let backend = ChatCompletionsBackend::new(
            &config.url,
            token,
            &config.chat_id,
            config.timeout_secs,
        )?;
        Ok(Some(Self::Remote(backend)))
    }

    pub fn mock(backend: MockBackend) -> Self {
        Self::Mock(backend)
    }

    /// Ask for an analysis of the given category totals
    pub async fn analyze(&self, totals: &CategoryTotalsByKind) -> Result<String> {
        self.request(Action::Analyze, totals).await
    }

    /// Ask for budgeting advice based on the given category totals
    pub async fn advise(&self, totals: &CategoryTotalsByKind) -> Result<String> {
        self.request(Action::Advice, totals).await
    }

    pub fn host(&self) -> &str {
        match self {
            Self::Remote(b) => b.host(),
            Self::Mock(b) => b.host(),
        }
    }

    async fn request(&self, action: Action, totals: &CategoryTotalsByKind) -> Result<String> {
        let prompt = build_prompt(action, totals)?;
        info!(action = %action, host = %self.host(), "Requesting analysis");
        match self {
            Self::Remote(b) => b.complete(&prompt).await,
            Self::Mock(b) => b.complete(&prompt).await,
        }
    }
}

/// Request text: a fixed lead-in followed by the totals as indented JSON
pub fn build_prompt(action: Action, totals: &CategoryTotalsByKind) -> Result<String> {
    let data = serde_json::to_string_pretty(totals)?;
    Ok(format!("请分析以下{}数据：\n{}", action, data))
}
