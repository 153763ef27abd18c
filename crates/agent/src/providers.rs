//! HTTP gateways for hosted and local model providers.
//!
//! Each client sends exactly one request per prompt and returns the first text
//! the provider produced. Non-2xx responses become errors carrying the status
//! and body. No retries.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use intentroute_core::config::LlmConfig;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::llm::{GatewayError, LlmClient};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MAX_TOKENS: u32 = 1024;

fn http_client(config: &LlmConfig) -> Result<Client, GatewayError> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(GatewayError::HttpClient)
}

fn base_url(config: &LlmConfig, provider: &'static str) -> Result<String, GatewayError> {
    config
        .effective_base_url()
        .map(|url| url.trim_end_matches('/').to_string())
        .ok_or(GatewayError::MissingBaseUrl(provider))
}

fn api_key(config: &LlmConfig, provider: &'static str) -> Result<SecretString, GatewayError> {
    config
        .api_key
        .clone()
        .filter(|key| !key.expose_secret().trim().is_empty())
        .ok_or(GatewayError::MissingApiKey(provider))
}

async fn read_success_body(response: reqwest::Response, provider: &str) -> Result<String> {
    let status = response.status();
    let body = response.text().await.with_context(|| format!("{provider} response body"))?;
    if !status.is_success() {
        return Err(anyhow!("{provider} returned {status}: {body}"));
    }
    Ok(body)
}

// Ollama

#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            client: http_client(config)?,
            endpoint: format!("{}/api/generate", base_url(config, "ollama")?),
            model: config.effective_model().to_string(),
        })
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(event_name = "agent.llm.prompt", provider = "ollama", prompt, "sending prompt");
        let request = OllamaGenerateRequest { model: &self.model, prompt, stream: false };
        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let body = read_success_body(response, "ollama").await?;
        parse_ollama_body(&body)
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }
}

fn parse_ollama_body(body: &str) -> Result<String> {
    let parsed: OllamaGenerateResponse =
        serde_json::from_str(body).context("ollama response did not match /api/generate")?;
    Ok(parsed.response)
}

// OpenAI-compatible chat completions

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct OpenAiChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: SecretString,
}

impl OpenAiClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            client: http_client(config)?,
            endpoint: format!("{}/chat/completions", base_url(config, "openai")?),
            model: config.effective_model().to_string(),
            api_key: api_key(config, "openai")?,
        })
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(event_name = "agent.llm.prompt", provider = "openai", prompt, "sending prompt");
        let request = OpenAiChatRequest {
            model: &self.model,
            messages: [ChatMessage { role: "user", content: prompt }],
        };
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;
        let body = read_success_body(response, "openai").await?;
        parse_openai_body(&body)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

fn parse_openai_body(body: &str) -> Result<String> {
    let parsed: OpenAiChatResponse =
        serde_json::from_str(body).context("openai response did not match chat/completions")?;
    parsed
        .choices
        .into_iter()
        .find_map(|choice| choice.message.content)
        .ok_or_else(|| anyhow!("openai response contained no message content"))
}

// Anthropic messages

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    text: Option<String>,
}

#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: SecretString,
}

impl AnthropicClient {
    pub fn from_config(config: &LlmConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            client: http_client(config)?,
            endpoint: format!("{}/v1/messages", base_url(config, "anthropic")?),
            model: config.effective_model().to_string(),
            api_key: api_key(config, "anthropic")?,
        })
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        debug!(event_name = "agent.llm.prompt", provider = "anthropic", prompt, "sending prompt");
        let request = AnthropicRequest {
            model: &self.model,
            max_tokens: ANTHROPIC_MAX_TOKENS,
            messages: [ChatMessage { role: "user", content: prompt }],
        };
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;
        let body = read_success_body(response, "anthropic").await?;
        parse_anthropic_body(&body)
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }
}

fn parse_anthropic_body(body: &str) -> Result<String> {
    let parsed: AnthropicResponse =
        serde_json::from_str(body).context("anthropic response did not match /v1/messages")?;
    parsed
        .content
        .into_iter()
        .find_map(|block| block.text)
        .ok_or_else(|| anyhow!("anthropic response contained no text block"))
}
