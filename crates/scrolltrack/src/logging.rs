//! Logging setup.
//!
//! Everything logs through `tracing` under the `scrolltrack` target:
//!
//! - `debug`: curve measurement, config file resolution, listener attach
//!   and detach, simulation runs.
//! - `trace`: one event per scroll update that changed the timeline state,
//!   plus skipped updates while the container or curve is unmounted.
//!
//! Scroll updates fire at frame rate, so `trace` is only reached with `-vv`.

use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Targets whose level follows the CLI verbosity.
const LOG_TARGETS: &[&str] = &["scrolltrack", "scrolltrack_web"];

/// How much the CLI logs to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors only (`-q`).
    Quiet,
    /// Info and above.
    #[default]
    Normal,
    /// Curve, config and listener lifecycle (`-v`).
    Verbose,
    /// Every scroll update (`-vv`).
    Trace,
}

impl Verbosity {
    /// Pick a verbosity from the CLI's `-v` count and `-q` flag.
    ///
    /// `-q` wins over any number of `-v`.
    #[must_use]
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// The most detailed level that is emitted.
    #[must_use]
    pub fn to_level_filter(&self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::INFO,
            Self::Verbose => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// `EnvFilter` directives applying this level to scrolltrack's targets.
    #[must_use]
    pub fn directives(&self) -> String {
        let level = self.to_level_filter();
        LOG_TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Install the stderr subscriber.
///
/// Stdout is reserved for command output (tables, JSON), so logs never mix
/// into it. `RUST_LOG`, when set, replaces the directives derived from
/// `verbosity`. Calling this more than once keeps the first subscriber.
///
/// ```no_run
/// use scrolltrack::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::from_flags(2, false));
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directives()));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false),
    );

    let _ = subscriber.try_init();
}

/// Subscriber for unit tests: warnings and errors, captured per test.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
