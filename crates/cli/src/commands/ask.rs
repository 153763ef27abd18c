use intentroute_agent::session::REPLY_PREFIX;
use intentroute_core::domain::entities::Entities;
use intentroute_core::domain::intent::Intent;
use intentroute_core::domain::request::RequestStage;
use serde::Serialize;

use crate::commands::{prepare_session, CommandResult};
use crate::GlobalArgs;

#[derive(Debug, Serialize)]
struct AskReport<'a> {
    command: &'static str,
    status: &'static str,
    correlation_id: &'a str,
    provider: &'static str,
    query: &'a str,
    stage: RequestStage,
    intent: Option<Intent>,
    entities: &'a Entities,
    result: &'a str,
}

pub fn run(global: &GlobalArgs, query: &str, json_output: bool) -> CommandResult {
    let session = match prepare_session(global) {
        Ok(session) => session,
        Err(error) => return CommandResult::from_error("ask", &error),
    };

    let state = session.executor.block_on(session.runtime.process(query));
    let result = state.result.as_deref().unwrap_or_default();

    if !json_output {
        return CommandResult::success(format!("{REPLY_PREFIX}{result}"));
    }

    let report = AskReport {
        command: "ask",
        status: "ok",
        correlation_id: state.correlation_id.as_str(),
        provider: session.config.llm.provider.as_str(),
        query: state.user_query(),
        stage: state.stage,
        intent: state.intent,
        entities: &state.entities,
        result,
    };

    match serde_json::to_string_pretty(&report) {
        Ok(output) => CommandResult::success(output),
        Err(error) => CommandResult::failure("ask", "serialization", error.to_string(), 1),
    }
}
