pub mod config;
pub mod domain;
pub mod errors;

pub use config::{AppConfig, ConfigError, LlmProvider, LoadOptions, LogFormat};
pub use domain::entities::{Entities, EntityValue, SUGGESTED_FIELDS};
pub use domain::intent::{Intent, UnknownIntent};
pub use domain::request::{CorrelationId, RequestStage, RequestState};
pub use errors::{ApplicationError, DomainError};
