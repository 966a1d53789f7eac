//! Chat-completion fallback for messages no rule handles.

use anyhow::{Result, anyhow};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::{
    config::GenerativeConfig,
    transport::{HttpRequest, Transport},
};

const SYSTEM_PROMPT: &str =
    "You are Jarvis, a concise, proactive assistant. Be helpful and practical.";

#[derive(Debug, Clone)]
pub struct GenerativeClient {
    transport: Arc<dyn Transport>,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    endpoint: String,
}

impl GenerativeClient {
    /// `api_key` is resolved by the caller; `None` disables the client.
    pub fn new(
        transport: Arc<dyn Transport>,
        config: &GenerativeConfig,
        api_key: Option<String>,
    ) -> Self {
        Self {
            transport,
            api_key,
            model: config.model.clone(),
            temperature: config.temperature,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// One single-turn completion for `message`.
    ///
    /// `Ok(None)` when no key is configured (no request is made) or when the provider
    /// answered without usable text. Non-2xx responses are errors carrying status and body.
    pub async fn generate(&self, message: &str) -> Result<Option<String>> {
        let Some(api_key) = &self.api_key else {
            tracing::debug!("no generative API key configured, skipping");
            return Ok(None);
        };

        let body = json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": message},
            ],
        });

        let request = HttpRequest::post_json(&self.endpoint, body).bearer(api_key.as_str());
        let res = self.transport.send(request).await?;

        if !res.is_success() {
            return Err(anyhow!("OpenAI error: {} {}", res.status, res.body));
        }

        let parsed: CompletionResponse = serde_json::from_str(&res.body)?;

        let reply = parsed
            .choices
            .into_iter()
            .flatten()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty());

        Ok(reply)
    }
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Option<Vec<CompletionChoice>>,
}
