//! Mock backend for testing and offline runs

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::AnalysisBackend;

/// Returns a fixed reply (or a fixed failure) and records every prompt
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    reply: String,
    failure: Option<String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    pub fn with_reply(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            ..Self::default()
        }
    }

    /// A backend whose every call fails with `Error::Analysis(message)`
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl AnalysisBackend for MockBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        match &self.failure {
            Some(message) => Err(Error::Analysis(message.clone())),
            None => Ok(self.reply.clone()),
        }
    }

    fn host(&self) -> &str {
        "mock"
    }
}
