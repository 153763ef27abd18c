pub mod commands;
pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use intentroute_core::config::{ConfigOverrides, LlmProvider, LoadOptions};

#[derive(Debug, Parser)]
#[command(
    name = "intentroute",
    about = "Route free-text queries to workflows with a language model",
    long_about = "Classify a query's intent and extract its parameters through a model gateway, then dispatch to one of a fixed set of workflows.",
    after_help = "Examples:\n  intentroute chat\n  intentroute ask \"chart last quarter's sales\" --json\n  intentroute --provider ollama --model llama3.1 chat\n  intentroute config"
)]
pub struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Clone, Debug, Default, Args)]
pub struct GlobalArgs {
    #[arg(long, global = true, help = "Path to a TOML config file (must exist when given)")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, value_parser = parse_provider, help = "Model provider: mock|ollama|openai|anthropic")]
    pub provider: Option<LlmProvider>,
    #[arg(long, global = true, help = "Model name passed to the provider")]
    pub model: Option<String>,
    #[arg(long, global = true, help = "Provider base URL")]
    pub base_url: Option<String>,
    #[arg(long, global = true, help = "Log level: trace|debug|info|warn|error")]
    pub log_level: Option<String>,
}

impl GlobalArgs {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                log_level: self.log_level.clone(),
                llm_provider: self.provider,
                llm_model: self.model.clone(),
                llm_base_url: self.base_url.clone(),
            },
        }
    }
}

fn parse_provider(value: &str) -> Result<LlmProvider, String> {
    value.parse().map_err(|error: intentroute_core::ConfigError| error.to_string())
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start the interactive loop (default); type `exit` or `quit` to leave")]
    Chat,
    #[command(about = "Run a single query through the pipeline")]
    Ask {
        #[arg(help = "The query text")]
        query: String,
        #[arg(long, help = "Emit the final request state as JSON")]
        json: bool,
    },
    #[command(about = "List the intents queries can be routed to")]
    Intents,
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => commands::chat::run(&cli.global),
        Command::Ask { query, json } => commands::ask::run(&cli.global, &query, json),
        Command::Intents => commands::intents::run(),
        Command::Config => commands::config::run(&cli.global),
    };

    if !result.output.is_empty() {
        println!("{}", result.output);
    }
    ExitCode::from(result.exit_code)
}
