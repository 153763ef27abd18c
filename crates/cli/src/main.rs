use std::process::ExitCode;

fn main() -> ExitCode {
    intentroute_cli::run()
}
