use std::sync::Arc;

use intentroute_core::domain::request::RequestState;
use tracing::info;

use crate::classifier::IntentClassifier;
use crate::extractor::EntityExtractor;
use crate::llm::LlmClient;
use crate::router::Router;
use crate::workflows::{WorkflowRegistry, HELP_MESSAGE};

/// Runs one query end to end: extract, classify, route.
///
/// Extraction runs before classification; entities do not depend on intent.
pub struct AgentRuntime {
    extractor: EntityExtractor,
    classifier: IntentClassifier,
    router: Router,
}

impl AgentRuntime {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self::with_registry(llm, WorkflowRegistry::standard())
    }

    pub fn with_registry(llm: Arc<dyn LlmClient>, registry: WorkflowRegistry) -> Self {
        Self {
            extractor: EntityExtractor::new(llm.clone()),
            classifier: IntentClassifier::new(llm),
            router: Router::new(registry),
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Returns the final state so callers can inspect intent and entities.
    pub async fn process(&self, user_query: &str) -> RequestState {
        let state = RequestState::new(user_query);
        info!(
            event_name = "agent.request.received",
            correlation_id = state.correlation_id.as_str(),
            query_chars = user_query.chars().count(),
            "processing query"
        );

        let state = self.extractor.extract(state).await;
        let state = self.classifier.classify(state).await;
        self.router.route(state)
    }

    /// Never fails and never returns an empty string.
    pub async fn run_agent(&self, user_query: &str) -> String {
        self.process(user_query)
            .await
            .result
            .unwrap_or_else(|| HELP_MESSAGE.to_string())
    }
}
