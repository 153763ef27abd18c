pub mod ask;
pub mod chat;
pub mod config;
pub mod intents;

use std::sync::Arc;

use intentroute_agent::{build_client, AgentRuntime, LlmClient};
use intentroute_core::config::AppConfig;
use intentroute_core::errors::ApplicationError;
use serde::Serialize;

use crate::GlobalArgs;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_error(command: &str, error: &ApplicationError) -> Self {
        Self::failure(command, error.error_class(), error.to_string(), error.exit_code())
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Everything a query-running command needs, built from config.
pub(crate) struct Session {
    pub config: AppConfig,
    pub runtime: AgentRuntime,
    pub executor: tokio::runtime::Runtime,
}

pub(crate) fn prepare_session(global: &GlobalArgs) -> Result<Session, ApplicationError> {
    let config = AppConfig::load(global.load_options())?;
    crate::logging::init(&config.logging);

    let llm: Arc<dyn LlmClient> =
        build_client(&config.llm).map_err(|error| ApplicationError::Gateway(error.to_string()))?;
    tracing::info!(
        event_name = "system.session.ready",
        correlation_id = "bootstrap",
        provider = llm.provider_name(),
        model = config.llm.effective_model(),
        "model gateway initialized"
    );

    let executor = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    Ok(Session { config, runtime: AgentRuntime::new(llm), executor })
}
