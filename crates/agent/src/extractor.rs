use std::sync::Arc;

use intentroute_core::domain::entities::{Entities, SUGGESTED_FIELDS};
use intentroute_core::domain::request::RequestState;
use serde_json::Value;
use tracing::{error, info};

use crate::llm::LlmClient;
use crate::parse::{decode_or_fallback, JsonObject, ParseFailure};

/// Pulls structured parameters out of the query. Suggested fields are listed
/// in the prompt but whatever mapping the model returns is kept.
pub struct EntityExtractor {
    llm: Arc<dyn LlmClient>,
}

impl EntityExtractor {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub fn build_prompt(user_query: &str) -> String {
        let fields =
            SUGGESTED_FIELDS.iter().map(|field| format!("- {field}")).collect::<Vec<_>>().join("\n");

        format!(
            "Extract structured parameters from the query.\n\
             Return ONLY JSON.\n\
             \n\
             Possible fields:\n\
             {fields}\n\
             \n\
             Query:\n\
             \"{user_query}\"\n"
        )
    }

    pub async fn extract(&self, mut state: RequestState) -> RequestState {
        let prompt = Self::build_prompt(state.user_query());
        let response = self.llm.complete(&prompt).await;
        let entities = decode_or_fallback(
            "extract",
            &state.correlation_id,
            response,
            decode_entities,
            Entities::new(),
        );

        let entity_count = entities.len();
        match state.record_entities(entities) {
            Ok(()) => info!(
                event_name = "agent.extract.completed",
                correlation_id = state.correlation_id.as_str(),
                entity_count,
                "entities extracted"
            ),
            Err(error) => error!(
                event_name = "agent.extract.rejected",
                correlation_id = state.correlation_id.as_str(),
                error = %error,
                "request was already extracted"
            ),
        }
        state
    }
}

pub fn decode_entities(object: JsonObject) -> Result<Entities, ParseFailure> {
    Entities::from_json(Value::Object(object)).ok_or(ParseFailure::NotAnObject)
}
