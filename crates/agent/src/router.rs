use std::sync::Arc;

use intentroute_core::domain::intent::Intent;
use intentroute_core::domain::request::RequestState;
use intentroute_core::errors::DomainError;
use tracing::{error, info, warn};

use crate::workflows::{Workflow, WorkflowRegistry, HELP_MESSAGE};

/// Dispatches a classified request to exactly one workflow.
///
/// An unset intent, or one the registry has no handler for, goes to the
/// registry's help fallback. The chosen reply is committed once; a state that
/// was already routed, or never extracted, is returned unchanged.
#[derive(Clone, Default)]
pub struct Router {
    registry: WorkflowRegistry,
}

impl Router {
    pub fn new(registry: WorkflowRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &WorkflowRegistry {
        &self.registry
    }

    pub fn resolve(&self, state: &RequestState) -> &Arc<dyn Workflow> {
        match state.intent.and_then(|intent| self.registry.get(intent)) {
            Some(handler) => handler,
            None => {
                warn!(
                    event_name = "agent.route.fallback",
                    correlation_id = state.correlation_id.as_str(),
                    intent = state.intent.map(|intent| intent.as_str()).unwrap_or("<unset>"),
                    "no workflow registered for intent, using help"
                );
                self.registry.fallback()
            }
        }
    }

    pub fn route(&self, mut state: RequestState) -> RequestState {
        if state.intent.is_none() {
            if let Err(error) = state.record_intent(Intent::FALLBACK) {
                reject(&state, &error);
                return state;
            }
        }

        let workflow = self.resolve(&state);
        info!(
            event_name = "agent.route.dispatched",
            correlation_id = state.correlation_id.as_str(),
            workflow = workflow.name(),
            "dispatching workflow"
        );

        let mut reply = workflow.handle(&state);
        if reply.is_empty() {
            let violation = DomainError::InvariantViolation(format!(
                "workflow `{}` produced an empty result",
                workflow.name()
            ));
            warn!(
                event_name = "agent.route.empty_result",
                correlation_id = state.correlation_id.as_str(),
                error = %violation,
                "replacing empty result with help"
            );
            reply = self.help_reply(&state);
        }

        if let Err(error) = state.record_result(reply) {
            reject(&state, &error);
        }
        state
    }

    fn help_reply(&self, state: &RequestState) -> String {
        let reply = self.registry.fallback().handle(state);
        if reply.is_empty() {
            HELP_MESSAGE.to_string()
        } else {
            reply
        }
    }
}

fn reject(state: &RequestState, error: &DomainError) {
    error!(
        event_name = "agent.route.rejected",
        correlation_id = state.correlation_id.as_str(),
        stage = ?state.stage,
        error = %error,
        "request cannot be routed from its current stage"
    );
}

#[cfg(test)]
mod tests {
    use intentroute_core::domain::entities::Entities;
    use intentroute_core::domain::intent::Intent;
    use intentroute_core::domain::request::{RequestStage, RequestState};

    use super::Router;
    use crate::workflows::{Workflow, WorkflowRegistry, ANALYZE, HELP_MESSAGE};

    struct SilentWorkflow;

    impl Workflow for SilentWorkflow {
        fn name(&self) -> &'static str {
            "silent"
        }

        fn handle(&self, _state: &RequestState) -> String {
            String::new()
        }
    }

    fn extracted(entities: Entities) -> RequestState {
        let mut state = RequestState::new("query");
        state.record_entities(entities).expect("extract");
        state
    }

    fn classified(intent: Intent, entities: Entities) -> RequestState {
        let mut state = extracted(entities);
        state.record_intent(intent).expect("classify");
        state
    }

    #[test]
    fn routes_visualize_to_visualize_workflow() {
        let entities: Entities = [("target", "sales")].into_iter().collect();
        let rendered = entities.to_string();
        let state = Router::default().route(classified(Intent::Visualize, entities));

        let result = state.result.expect("router sets result");
        assert!(result.contains("Visualizing"));
        assert!(result.contains(&rendered));
        assert_eq!(state.stage, RequestStage::Routed);
    }

    #[test]
    fn every_intent_produces_a_result() {
        let router = Router::default();
        for intent in Intent::ALL {
            let state = router.route(classified(intent, Entities::new()));
            assert!(state.result.is_some_and(|result| !result.is_empty()), "{intent} produced nothing");
            assert_eq!(state.stage, RequestStage::Routed);
        }
    }

    #[test]
    fn unregistered_intent_falls_back_to_help() {
        let router = Router::new(
            WorkflowRegistry::builder().register(Intent::Analyze, ANALYZE).build(),
        );
        let state = router.route(classified(Intent::Visualize, Entities::new()));
        assert_eq!(state.result.as_deref(), Some(HELP_MESSAGE));
    }

    #[test]
    fn unset_intent_is_classified_as_help_and_routed() {
        let routed = Router::default().route(extracted(Entities::new()));
        assert_eq!(routed.intent, Some(Intent::Help));
        assert_eq!(routed.result.as_deref(), Some(HELP_MESSAGE));
        assert_eq!(routed.stage, RequestStage::Routed);
    }

    #[test]
    fn routing_twice_keeps_the_first_result() {
        let router = Router::default();
        let once = router.route(classified(Intent::Analyze, Entities::new()));
        let first = once.result.clone();

        let twice = router.route(once);
        assert_eq!(twice.result, first);
        assert_eq!(twice.stage, RequestStage::Routed);
    }

    #[test]
    fn unextracted_request_is_not_routed() {
        let state = Router::default().route(RequestState::new("query"));
        assert_eq!(state.stage, RequestStage::Created);
        assert!(state.intent.is_none());
        assert!(state.result.is_none());
    }

    #[test]
    fn empty_reply_is_replaced_with_help() {
        let router = Router::new(
            WorkflowRegistry::builder().register(Intent::Analyze, SilentWorkflow).build(),
        );
        let state = router.route(classified(Intent::Analyze, Entities::new()));
        assert_eq!(state.result.as_deref(), Some(HELP_MESSAGE));
        assert_eq!(state.stage, RequestStage::Routed);
    }

    #[test]
    fn silent_help_handler_still_yields_the_help_message() {
        let router = Router::new(
            WorkflowRegistry::builder().register(Intent::Help, SilentWorkflow).build(),
        );
        let state = router.route(classified(Intent::Help, Entities::new()));
        assert_eq!(state.result.as_deref(), Some(HELP_MESSAGE));
    }
}
