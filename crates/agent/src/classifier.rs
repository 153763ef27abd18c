use std::sync::Arc;

use intentroute_core::domain::intent::Intent;
use intentroute_core::domain::request::RequestState;
use serde_json::Value;
use tracing::{error, info};

use crate::llm::LlmClient;
use crate::parse::{decode_or_fallback, JsonObject, ParseFailure};

/// Asks the model which allowed intent a query belongs to.
///
/// Any failure along the way (gateway error, invalid JSON, missing or
/// out-of-domain `intent`) resolves to [`Intent::FALLBACK`]. Expects an
/// extracted request.
pub struct IntentClassifier {
    llm: Arc<dyn LlmClient>,
}

impl IntentClassifier {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub fn build_prompt(user_query: &str) -> String {
        let allowed = Intent::allowed_names()
            .into_iter()
            .map(|name| format!("\"{name}\""))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "You are an intent router.\n\
             \n\
             Allowed intents:\n\
             [{allowed}]\n\
             \n\
             User query:\n\
             \"{user_query}\"\n\
             \n\
             Return ONLY JSON:\n\
             {{ \"intent\": \"<intent>\" }}\n"
        )
    }

    pub async fn classify(&self, mut state: RequestState) -> RequestState {
        let prompt = Self::build_prompt(state.user_query());
        let response = self.llm.complete(&prompt).await;
        let intent = decode_or_fallback(
            "classify",
            &state.correlation_id,
            response,
            decode_intent,
            Intent::FALLBACK,
        );

        match state.record_intent(intent) {
            Ok(()) => info!(
                event_name = "agent.classify.completed",
                correlation_id = state.correlation_id.as_str(),
                intent = intent.as_str(),
                "query classified"
            ),
            Err(error) => error!(
                event_name = "agent.classify.rejected",
                correlation_id = state.correlation_id.as_str(),
                error = %error,
                "request is not ready for classification"
            ),
        }
        state
    }
}

/// Reads `{"intent": "<name>"}`, accepting only exact allowed names.
pub fn decode_intent(object: JsonObject) -> Result<Intent, ParseFailure> {
    match object.get("intent") {
        None => Err(ParseFailure::MissingField("intent")),
        Some(Value::String(name)) => Ok(name.parse::<Intent>()?),
        Some(_) => Err(ParseFailure::InvalidField("intent")),
    }
}
