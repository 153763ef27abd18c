use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::Entities;
use crate::domain::intent::Intent;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(pub String);

impl CorrelationId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStage {
    Created,
    Extracted,
    Classified,
    Routed,
}

impl RequestStage {
    pub fn can_transition_to(self, next: RequestStage) -> bool {
        matches!(
            (self, next),
            (RequestStage::Created, RequestStage::Extracted)
                | (RequestStage::Extracted, RequestStage::Classified)
                | (RequestStage::Classified, RequestStage::Routed)
        )
    }
}

/// The record threaded through one pass of the pipeline.
///
/// Created per query and discarded once the caller has read `result`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestState {
    pub correlation_id: CorrelationId,
    user_query: String,
    pub stage: RequestStage,
    pub intent: Option<Intent>,
    pub entities: Entities,
    pub result: Option<String>,
}

impl RequestState {
    pub fn new(user_query: impl Into<String>) -> Self {
        Self::with_correlation_id(user_query, CorrelationId::generate())
    }

    pub fn with_correlation_id(user_query: impl Into<String>, correlation_id: CorrelationId) -> Self {
        Self {
            correlation_id,
            user_query: user_query.into(),
            stage: RequestStage::Created,
            intent: None,
            entities: Entities::new(),
            result: None,
        }
    }

    pub fn user_query(&self) -> &str {
        &self.user_query
    }

    pub fn transition_to(&mut self, next: RequestStage) -> Result<(), DomainError> {
        if self.stage.can_transition_to(next) {
            self.stage = next;
            return Ok(());
        }

        Err(DomainError::InvalidStageTransition { from: self.stage, to: next })
    }

    /// Moves `Created -> Extracted`. Fails without touching `entities` otherwise.
    pub fn record_entities(&mut self, entities: Entities) -> Result<(), DomainError> {
        self.transition_to(RequestStage::Extracted)?;
        self.entities = entities;
        Ok(())
    }

    /// Moves `Extracted -> Classified`. Fails without touching `intent` otherwise.
    pub fn record_intent(&mut self, intent: Intent) -> Result<(), DomainError> {
        self.transition_to(RequestStage::Classified)?;
        self.intent = Some(intent);
        Ok(())
    }

    /// Moves `Classified -> Routed`. The result is written once and never empty.
    pub fn record_result(&mut self, result: impl Into<String>) -> Result<(), DomainError> {
        let result = result.into();
        if result.is_empty() {
            return Err(DomainError::InvariantViolation("result must not be empty".to_string()));
        }
        if self.result.is_some() {
            return Err(DomainError::InvariantViolation("result is already set".to_string()));
        }

        self.transition_to(RequestStage::Routed)?;
        self.result = Some(result);
        Ok(())
    }
}
