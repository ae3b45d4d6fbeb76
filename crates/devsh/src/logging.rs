//! Tracing subscriber setup for the CLI.

use clap::ValueEnum;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log level selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Most verbose.
    Trace,
    /// Debugging detail.
    Debug,
    /// High-level progress.
    Info,
    /// Problems only (default).
    Warn,
    /// Failures only.
    Error,
}

impl LogLevel {
    /// The level as an env-filter directive fragment.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Initialize tracing with the given level and format.
///
/// `RUST_LOG` overrides the CLI level when set.
///
/// # Errors
///
/// Returns an error if the filter cannot be built or a subscriber is
/// already installed.
pub fn init_tracing(level: LogLevel, json: bool) -> miette::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            let l = level.as_str();
            EnvFilter::try_new(format!("devsh={l},devsh_core={l}"))
        })
        .map_err(|e| miette::miette!("Failed to create tracing filter: {e}"))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| miette::miette!("Failed to initialize tracing: {e}"))?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| miette::miette!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
