//! Log level selection and tracing subscriber setup.

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::EnvFilter;

use crate::env::Environment;

/// Variable holding the default log level.
pub const LOG_LEVEL_ENV_VAR: &str = "GITAI_LOG_LEVEL";

/// HTTP stack crates kept at warn so debug output stays readable.
const QUIET_DEPENDENCIES: &str = "hyper=warn,hyper_util=warn,h2=warn,reqwest=warn,rustls=warn";

/// Console verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Errors only.
    Quiet,
    /// Info, warnings and errors.
    #[default]
    Normal,
    /// Everything, including debug output.
    Verbose,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Verbose => "verbose",
        }
    }

    /// The tracing level this verbosity maps to.
    pub fn directive(&self) -> &'static str {
        match self {
            LogLevel::Quiet => "error",
            LogLevel::Normal => "info",
            LogLevel::Verbose => "debug",
        }
    }

    /// Pick the level: command-line flags first, then [`LOG_LEVEL_ENV_VAR`],
    /// then [`LogLevel::Normal`]. Unknown values fall back to normal.
    pub fn select(quiet: bool, verbose: bool, env: &dyn Environment) -> Self {
        if quiet {
            return LogLevel::Quiet;
        }
        if verbose {
            return LogLevel::Verbose;
        }
        env.non_empty(LOG_LEVEL_ENV_VAR)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quiet" => Ok(LogLevel::Quiet),
            "normal" => Ok(LogLevel::Normal),
            "verbose" => Ok(LogLevel::Verbose),
            _ => Err(format!("Unknown log level: {}", s)),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter for `level`. A non-empty `RUST_LOG` overrides it.
pub fn env_filter(level: LogLevel, env: &dyn Environment) -> EnvFilter {
    if let Some(directives) = env.non_empty(EnvFilter::DEFAULT_ENV)
        && let Ok(filter) = EnvFilter::try_new(&directives)
    {
        return filter;
    }
    EnvFilter::new(format!("{},{}", level.directive(), QUIET_DEPENDENCIES))
}

/// Install the global subscriber, writing to stderr.
///
/// Call once, before any command runs.
pub fn init_tracing(level: LogLevel, env: &dyn Environment) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level, env))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
