//! devsh CLI entry point.
//!
//! Pipeline: parse the declaration, resolve each tool through the selected
//! resolver, assemble the activation environment, and spawn the session.
//! Exit codes: 0 on success, 2 for declaration errors, 3 for resolution and
//! spawn failures, otherwise the child process's exit code.

// CLI binary needs to output to stdout/stderr - this is intentional
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;
mod commands;
mod logging;

use cli::{Cli, CliError, Commands, EXIT_OK, exit_code_for, render_error};

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = cli::parse();
    let json = cli.json;

    if let Err(e) = logging::init_tracing(cli.level, json) {
        eprintln!("Failed to initialize tracing: {e}");
        std::process::exit(1);
    }

    let code = match dispatch(cli).await {
        Ok(code) => code,
        Err(err) => {
            render_error(&err, json);
            exit_code_for(&err)
        }
    };
    std::process::exit(code);
}

/// Execute the selected command, returning the process exit code.
async fn dispatch(cli: Cli) -> Result<i32, CliError> {
    match cli.command {
        Commands::Run {
            declaration,
            command,
            resolve,
        } => commands::run::execute_run(&declaration, command.as_deref(), &resolve).await,
        Commands::Check { declaration } => {
            commands::check::execute_check(&declaration)?;
            Ok(EXIT_OK)
        }
        Commands::Print {
            declaration,
            output,
            resolve,
        } => {
            commands::print::execute_print(&declaration, output, &resolve).await?;
            Ok(EXIT_OK)
        }
    }
}
