//! Agent runtime: model-backed intent routing.
//!
//! One query flows through a fixed, total pipeline:
//! 1. **Entity extraction** (`extractor`) - model output → open-ended entity mapping
//! 2. **Intent classification** (`classifier`) - model output → one allowed [`Intent`]
//! 3. **Routing** (`router`, `workflows`) - intent → exactly one workflow result
//!
//! # Key Types
//!
//! - `LlmClient` - the single text-in/text-out seam to a model provider
//! - `AgentRuntime` - runs the pipeline (see `runtime` module)
//! - `WorkflowRegistry` - immutable intent to handler table
//!
//! # Totality
//!
//! Model output is untrusted. Transport errors and malformed responses are
//! absorbed by the stage that sees them (`help` intent, empty entities), so
//! `AgentRuntime::run_agent` always yields a non-empty reply.
//!
//! [`Intent`]: intentroute_core::Intent

pub mod classifier;
pub mod extractor;
pub mod llm;
pub mod parse;
pub mod providers;
pub mod router;
pub mod runtime;
pub mod session;
pub mod workflows;

pub use llm::{build_client, LlmClient, MockLlmClient, ScriptedLlmClient};
pub use runtime::AgentRuntime;
pub use workflows::{Workflow, WorkflowRegistry};
