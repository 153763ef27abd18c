use std::io;

use intentroute_agent::session::run_session;
use intentroute_core::errors::ApplicationError;
use tracing::info;

use crate::commands::{prepare_session, CommandResult};
use crate::GlobalArgs;

pub fn run(global: &GlobalArgs) -> CommandResult {
    let session = match prepare_session(global) {
        Ok(session) => session,
        Err(error) => return CommandResult::from_error("chat", &error),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let outcome = run_session(stdin.lock(), stdout.lock(), |query| {
        session.executor.block_on(session.runtime.run_agent(query))
    });

    match outcome {
        Ok(summary) => {
            info!(
                event_name = "system.session.closed",
                correlation_id = "session",
                queries = summary.queries,
                "chat session closed"
            );
            CommandResult::success(String::new())
        }
        Err(error) => CommandResult::from_error("chat", &ApplicationError::from(error)),
    }
}
