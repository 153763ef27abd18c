use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use intentroute_core::config::{LlmConfig, LlmProvider};
use thiserror::Error;
use tracing::debug;

use crate::providers::{AnthropicClient, OllamaClient, OpenAiClient};

/// The single seam to a language model: one prompt in, raw text out.
///
/// Implementations must not parse or retry. Callers treat the returned text as
/// untrusted and recover from both errors and malformed output themselves.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;

    fn provider_name(&self) -> &'static str;
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("llm.api_key is required for the {0} provider")]
    MissingApiKey(&'static str),
    #[error("llm.base_url is required for the {0} provider")]
    MissingBaseUrl(&'static str),
    #[error("could not build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Builds the gateway selected by `llm.provider`.
pub fn build_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, GatewayError> {
    let client: Arc<dyn LlmClient> = match config.provider {
        LlmProvider::Mock => Arc::new(MockLlmClient::new(config.mock_response.clone())),
        LlmProvider::Ollama => Arc::new(OllamaClient::from_config(config)?),
        LlmProvider::OpenAi => Arc::new(OpenAiClient::from_config(config)?),
        LlmProvider::Anthropic => Arc::new(AnthropicClient::from_config(config)?),
    };
    Ok(client)
}

/// Offline stand-in that answers every prompt with the same text.
#[derive(Clone, Debug)]
pub struct MockLlmClient {
    response: String,
}

impl MockLlmClient {
    pub fn new(response: impl Into<String>) -> Self {
        Self { response: response.into() }
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(event_name = "agent.llm.prompt", provider = "mock", prompt, "sending prompt");
        Ok(self.response.clone())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Replays queued responses in order and records every prompt it receives.
///
/// Queued `Err` entries simulate transport failures. Once the script runs dry
/// every call fails.
#[derive(Debug, Default)]
pub struct ScriptedLlmClient {
    responses: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let client = Self::new();
        for response in responses {
            client.push_response(response);
        }
        client
    }

    pub fn push_response(&self, response: impl Into<String>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(Ok(response.into()));
        }
    }

    pub fn push_failure(&self, message: impl Into<String>) {
        if let Ok(mut queue) = self.responses.lock() {
            queue.push_back(Err(message.into()));
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|prompts| prompts.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts
            .lock()
            .map_err(|_| anyhow!("prompt log is poisoned"))?
            .push(prompt.to_string());

        let next = self
            .responses
            .lock()
            .map_err(|_| anyhow!("response script is poisoned"))?
            .pop_front();

        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("scripted llm has no responses left")),
        }
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}
