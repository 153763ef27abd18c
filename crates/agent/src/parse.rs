//! Defensive decoding of model output.
//!
//! Both pipeline stages go through [`decode_or_fallback`]: a failed gateway
//! call or an undecodable response is logged and replaced by the stage's
//! fallback value, so nothing past this point ever sees an error.

use intentroute_core::domain::intent::UnknownIntent;
use intentroute_core::domain::request::CorrelationId;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

pub type JsonObject = Map<String, Value>;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseFailure {
    #[error("model gateway failed: {0}")]
    Gateway(String),
    #[error("model returned an empty response")]
    EmptyResponse,
    #[error("model response is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("model response is JSON but not an object")]
    NotAnObject,
    #[error("model response is missing `{0}`")]
    MissingField(&'static str),
    #[error("model response field `{0}` has the wrong type")]
    InvalidField(&'static str),
    #[error(transparent)]
    UnknownIntent(#[from] UnknownIntent),
}

impl ParseFailure {
    pub fn class(&self) -> &'static str {
        match self {
            Self::Gateway(_) => "gateway",
            Self::EmptyResponse => "empty_response",
            Self::InvalidJson(_) => "invalid_json",
            Self::NotAnObject => "not_an_object",
            Self::MissingField(_) => "missing_field",
            Self::InvalidField(_) => "invalid_field",
            Self::UnknownIntent(_) => "unknown_intent",
        }
    }
}

/// Removes surrounding whitespace and one enclosing Markdown code fence,
/// including an optional language tag such as ```` ```json ````.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```").and_then(|rest| rest.strip_suffix("```")) else {
        return trimmed;
    };

    match inner.split_once('\n') {
        Some((tag, body)) if !tag.trim_start().starts_with('{') => body.trim(),
        _ => inner.trim(),
    }
}

/// Parses raw model text into a JSON object.
pub fn parse_json_object(raw: &str) -> Result<JsonObject, ParseFailure> {
    let candidate = strip_code_fence(raw);
    if candidate.is_empty() {
        return Err(ParseFailure::EmptyResponse);
    }

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(ParseFailure::NotAnObject),
        Err(error) => Err(ParseFailure::InvalidJson(error.to_string())),
    }
}

/// Decodes a gateway outcome, or returns `fallback` after logging why.
pub fn decode_or_fallback<T, F>(
    stage: &'static str,
    correlation_id: &CorrelationId,
    response: anyhow::Result<String>,
    decode: F,
    fallback: T,
) -> T
where
    F: FnOnce(JsonObject) -> Result<T, ParseFailure>,
{
    let outcome = response
        .map_err(|error| ParseFailure::Gateway(format!("{error:#}")))
        .and_then(|raw| {
            debug!(
                event_name = "agent.llm.response",
                stage,
                correlation_id = correlation_id.as_str(),
                raw = raw.as_str(),
                "model responded"
            );
            parse_json_object(&raw)
        })
        .and_then(decode);

    match outcome {
        Ok(value) => value,
        Err(failure) => {
            warn!(
                event_name = "agent.parse.fallback",
                stage,
                correlation_id = correlation_id.as_str(),
                failure_class = failure.class(),
                error = %failure,
                "model output unusable, substituting fallback"
            );
            fallback
        }
    }
}
