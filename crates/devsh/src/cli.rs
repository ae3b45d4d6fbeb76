//! CLI argument parsing, error mapping, and exit codes.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use miette::Diagnostic;
use thiserror::Error;

use crate::logging::LogLevel;

/// Exit code for success.
pub const EXIT_OK: i32 = 0;
/// Exit code for declaration or CLI errors.
pub const EXIT_CLI: i32 = 2;
/// Exit code for resolution, assembly, and spawn failures.
pub const EXIT_RESOLVE: i32 = 3;

/// CLI-specific error types with exit-code mapping.
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// Declaration or usage error (exit code 2).
    #[error("{message}")]
    #[diagnostic(code(devsh::cli::declaration))]
    Declaration {
        /// The error message.
        message: String,
        /// Optional help text.
        #[help]
        help: Option<String>,
    },
    /// Resolution or activation error (exit code 3).
    #[error("{message}")]
    #[diagnostic(code(devsh::cli::resolve))]
    Resolve {
        /// The error message.
        message: String,
        /// Optional help text.
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a declaration error.
    #[must_use]
    pub fn declaration(message: impl Into<String>) -> Self {
        Self::Declaration {
            message: message.into(),
            help: None,
        }
    }

    /// Create a resolution error.
    #[must_use]
    pub fn resolve(message: impl Into<String>) -> Self {
        Self::Resolve {
            message: message.into(),
            help: None,
        }
    }

    /// Create a resolution error with help text.
    #[must_use]
    pub fn resolve_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Resolve {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

impl From<devsh_core::Error> for CliError {
    fn from(err: devsh_core::Error) -> Self {
        match err {
            devsh_core::Error::UnknownTool { ref name, ref help } => {
                let message = format!("unknown tool `{name}`");
                match help {
                    Some(h) => Self::resolve_with_help(message, h.clone()),
                    None => Self::resolve(message),
                }
            }
            devsh_core::Error::Spawn { .. } => Self::resolve_with_help(
                err.to_string(),
                "check that the shell named by SHELL exists in the activated environment",
            ),
            _ if err.is_declaration_error() => Self::Declaration {
                message: err.to_string(),
                help: None,
            },
            _ => Self::resolve(err.to_string()),
        }
    }
}

/// Map a CLI error to its exit code.
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Declaration { .. } => EXIT_CLI,
        CliError::Resolve { .. } => EXIT_RESOLVE,
    }
}

/// Render an error to stderr, as JSON when requested.
pub fn render_error(err: &CliError, json_mode: bool) {
    if json_mode {
        let envelope = serde_json::json!({
            "error": {
                "code": match err {
                    CliError::Declaration { .. } => "declaration",
                    CliError::Resolve { .. } => "resolve",
                },
                "message": err.to_string(),
            }
        });
        eprintln!("{envelope}");
    } else {
        eprintln!("{:?}", miette::Report::new(err.clone()));
    }
}

/// Output formats for `devsh print`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Shell `export` statements.
    #[default]
    Env,
    /// A flat JSON object.
    Json,
}

/// Shared resolver and base-environment options.
#[derive(clap::Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Resolve tools from a static catalog file instead of nix
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Flake reference to resolve tools from
    #[arg(long, default_value = "nixpkgs", value_name = "REF")]
    pub flake: String,

    /// Inherit only essential variables from the parent environment
    #[arg(long)]
    pub hermetic: bool,
}

#[derive(Parser, Debug)]
#[command(name = "devsh")]
#[command(about = "Materialize declarative development environments as shell sessions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn", value_enum)]
    pub level: LogLevel,

    /// Output logs and errors in JSON format
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve a declaration and activate it as a shell session
    Run {
        /// Path to the declaration file
        declaration: PathBuf,

        /// Run a single command instead of an interactive session
        #[arg(long, value_name = "CMD")]
        command: Option<String>,

        #[command(flatten)]
        resolve: ResolveArgs,
    },
    /// Parse and validate a declaration without resolving anything
    Check {
        /// Path to the declaration file
        declaration: PathBuf,
    },
    /// Resolve and assemble, then print the environment without activating
    Print {
        /// Path to the declaration file
        declaration: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t)]
        output: OutputFormat,

        #[command(flatten)]
        resolve: ResolveArgs,
    },
}

/// Parse command line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
