/// LLM Client: the single point of entry for all model calls in Career Leap.
///
/// ARCHITECTURAL RULE: No other module may talk to a model provider directly.
/// All LLM interactions MUST go through `LlmClient`.
///
/// Providers are tried in order (OpenAI → Ollama → stub). The stub never fails,
/// so a fully configured chain always produces text; callers that need JSON
/// still have to handle parse failures and fall back to local computation.
use std::sync::Arc;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;
pub mod providers;

pub use providers::{OllamaProvider, OpenAiProvider, StubProvider};

const DEFAULT_MAX_TOKENS: u32 = 1000;
const DEFAULT_TEMPERATURE: f32 = 0.2;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("All LLM providers failed")]
    Exhausted,
}

/// One chat turn in the OpenAI-compatible shape shared by every provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChatOptions {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl ChatOptions {
    pub fn with_max_tokens(max_tokens: u32) -> Self {
        Self {
            max_tokens,
            ..Self::default()
        }
    }
}

/// A model backend. Implement this to add a provider to the chain.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn chat(&self, messages: &[ChatMessage], options: ChatOptions)
        -> Result<String, LlmError>;
}

/// Ordered provider chain. Each provider is tried until one returns text.
#[derive(Clone)]
pub struct LlmClient {
    providers: Vec<Arc<dyn LlmProvider>>,
}

impl LlmClient {
    /// Builds a chain from `providers`, always terminated by [`StubProvider`].
    pub fn new(providers: Vec<Arc<dyn LlmProvider>>) -> Self {
        let mut providers = providers;
        providers.push(Arc::new(StubProvider));
        Self { providers }
    }

    /// A chain holding only the stub. Used when no provider is configured.
    pub fn stub_only() -> Self {
        Self::new(Vec::new())
    }

    /// A chain without the stub terminator, so exhaustion can be observed.
    #[cfg(test)]
    pub fn without_stub(providers: Vec<Arc<dyn LlmProvider>>) -> Self {
        Self { providers }
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Sends `messages` down the chain and returns the first successful reply.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        options: ChatOptions,
    ) -> Result<String, LlmError> {
        for provider in &self.providers {
            match provider.chat(messages, options).await {
                Ok(text) => {
                    debug!("LLM reply served by provider '{}'", provider.name());
                    return Ok(text);
                }
                Err(e) => {
                    warn!(
                        "LLM provider '{}' failed, trying next: {e}",
                        provider.name()
                    );
                }
            }
        }
        Err(LlmError::Exhausted)
    }

    /// Calls the chain and deserializes the reply as JSON.
    /// The prompt must instruct the model to return a JSON object.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        messages: &[ChatMessage],
        options: ChatOptions,
    ) -> Result<T, LlmError> {
        let text = self.chat(messages, options).await?;
        if text.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }
        serde_json::from_str(extract_json(&text)).map_err(LlmError::Parse)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Narrows model output to the outermost JSON object when the model wraps it in prose.
fn extract_json(text: &str) -> &str {
    let text = strip_json_fences(text);
    if text.starts_with('{') && text.ends_with('}') {
        return text;
    }
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        _ => text,
    }
}
