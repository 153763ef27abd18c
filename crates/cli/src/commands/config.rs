use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use intentroute_core::config::{resolve_config_path, AppConfig};
use intentroute_core::errors::ApplicationError;
use secrecy::ExposeSecret;
use toml::Value;

use crate::commands::CommandResult;
use crate::GlobalArgs;

pub fn run(global: &GlobalArgs) -> CommandResult {
    let config = match AppConfig::load(global.load_options()) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error("config", &ApplicationError::from(error)),
    };

    let sources = SourceLookup::new(global);
    let mut lines =
        vec!["effective config (source precedence: flag > env > file > default):".to_string()];

    lines.push(sources.render(
        "llm.provider",
        config.llm.provider.as_str(),
        &["INTENTROUTE_LLM_PROVIDER"],
        global.provider.is_some(),
    ));
    lines.push(sources.render(
        "llm.model",
        config.llm.effective_model(),
        &["INTENTROUTE_LLM_MODEL"],
        global.model.is_some(),
    ));
    lines.push(sources.render(
        "llm.base_url",
        config.llm.effective_base_url().unwrap_or("<unset>"),
        &["INTENTROUTE_LLM_BASE_URL"],
        global.base_url.is_some(),
    ));

    let api_key = config
        .llm
        .api_key
        .as_ref()
        .map(|key| redact_key(key.expose_secret()))
        .unwrap_or_else(|| "<unset>".to_string());
    lines.push(sources.render("llm.api_key", &api_key, &["INTENTROUTE_LLM_API_KEY"], false));
    lines.push(sources.render(
        "llm.timeout_secs",
        &config.llm.timeout_secs.to_string(),
        &["INTENTROUTE_LLM_TIMEOUT_SECS"],
        false,
    ));
    lines.push(sources.render(
        "llm.mock_response",
        &config.llm.mock_response,
        &["INTENTROUTE_LLM_MOCK_RESPONSE"],
        false,
    ));

    lines.push(sources.render(
        "logging.level",
        &config.logging.level,
        &["INTENTROUTE_LOGGING_LEVEL", "INTENTROUTE_LOG_LEVEL"],
        global.log_level.is_some(),
    ));
    lines.push(sources.render(
        "logging.format",
        &format!("{:?}", config.logging.format).to_ascii_lowercase(),
        &["INTENTROUTE_LOGGING_FORMAT", "INTENTROUTE_LOG_FORMAT"],
        false,
    ));

    CommandResult::success(lines.join("\n"))
}

struct SourceLookup {
    file_path: Option<PathBuf>,
    file_doc: Option<Value>,
}

impl SourceLookup {
    fn new(global: &GlobalArgs) -> Self {
        let file_path = resolve_config_path(global.config.as_deref());
        let file_doc = load_config_file_doc(file_path.as_deref());
        Self { file_path, file_doc }
    }

    fn render(&self, key: &str, value: &str, env_keys: &[&str], from_flag: bool) -> String {
        render_line(key, value, self.field_source(key, env_keys, from_flag))
    }

    fn field_source(&self, key_path: &str, env_keys: &[&str], from_flag: bool) -> String {
        if from_flag {
            return "flag".to_string();
        }

        if let Some(env_key) = env_keys.iter().find(|key| env_is_set(key)) {
            return format!("env ({env_key})");
        }

        if let Some(doc) = &self.file_doc {
            if contains_path(doc, key_path) {
                let file_path = self
                    .file_path
                    .as_ref()
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "config file".to_string());
                return format!("file ({file_path})");
            }
        }

        "default".to_string()
    }
}

fn env_is_set(key: &str) -> bool {
    env::var(key).map(|value| !value.trim().is_empty()).unwrap_or(false)
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn redact_key(key: &str) -> String {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    if let Some((prefix, _)) = trimmed.split_once('-') {
        return format!("{prefix}-***");
    }

    "<redacted>".to_string()
}
