use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::request::RequestStage;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid request transition from {from:?} to {to:?}")]
    InvalidStageTransition { from: RequestStage, to: RequestStage },
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error("model gateway failure: {0}")]
    Gateway(String),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

impl ApplicationError {
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "config_validation",
            Self::Gateway(_) => "gateway",
            Self::Io(_) => "io",
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::Gateway(_) | Self::Io(_) => 1,
        }
    }
}
