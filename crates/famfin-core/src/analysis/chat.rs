//! Chat-completions backend
//!
//! Speaks the `chatId` dialect of the chat-completions API: one user message
//! per request, no streaming, bearer-token auth.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::AnalysisBackend;

#[derive(Clone)]
pub struct ChatCompletionsBackend {
    http_client: Client,
    url: String,
    token: String,
    chat_id: String,
}

impl ChatCompletionsBackend {
    /// Create a backend posting to `url`
    ///
    /// `timeout_secs` bounds each request; without it the transport default
    /// applies.
    pub fn new(url: &str, token: &str, chat_id: &str, timeout_secs: Option<u64>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http_client: builder.build()?,
            url: url.to_string(),
            token: token.to_string(),
            chat_id: chat_id.to_string(),
        })
    }
}

impl std::fmt::Debug for ChatCompletionsBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatCompletionsBackend")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

#[async_trait]
impl AnalysisBackend for ChatCompletionsBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            chat_id: &self.chat_id,
            stream: false,
            detail: false,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            variables: serde_json::Map::new(),
        };

        debug!(url = %self.url, chat_id = %self.chat_id, "Sending chat completion request");
        let response = self
            .http_client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(%status, "Analysis endpoint returned an error");
            return Err(Error::Analysis(format!("{}: {}", status, body)));
        }

        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Analysis(format!("malformed response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Analysis("response contained no choices".into()))
    }

    fn host(&self) -> &str {
        &self.url
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    chat_id: &'a str,
    stream: bool,
    detail: bool,
    messages: Vec<ChatMessage<'a>>,
    variables: serde_json::Map<String, serde_json::Value>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}
