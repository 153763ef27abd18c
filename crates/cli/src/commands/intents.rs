use intentroute_agent::WorkflowRegistry;

use crate::commands::CommandResult;

pub fn run() -> CommandResult {
    let registry = WorkflowRegistry::standard();
    let mut lines = vec![format!("{} routable intents (fallback: help):", registry.len())];
    lines.extend(
        registry.intents().map(|intent| format!("- {intent}: {}", intent.description())),
    );
    CommandResult::success(lines.join("\n"))
}
