//! Logging setup for the `evault` binary.
//!
//! Logs go to stderr so that grids printed on stdout stay pipeable. `RUST_LOG`
//! overrides the directives derived from `-q`/`-v`.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How much to log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Info and above.
    #[default]
    Normal,
    /// Debug and above, including page fetches.
    Verbose,
    /// Everything, including the HTTP client.
    Trace,
}

impl Verbosity {
    /// Level applied to this crate's own events.
    #[must_use]
    pub fn level(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::ERROR,
            Self::Normal => LevelFilter::INFO,
            Self::Verbose => LevelFilter::DEBUG,
            Self::Trace => LevelFilter::TRACE,
        }
    }

    /// Filter directives used when `RUST_LOG` is unset.
    #[must_use]
    pub fn directives(self) -> String {
        let own = format!("evault={}", self.level()).to_lowercase();
        match self {
            Self::Trace => format!("{own},reqwest=debug"),
            _ => own,
        }
    }
}

/// Install the global subscriber.
///
/// Safe to call more than once; only the first call has an effect.
///
/// ```no_run
/// use evault::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::Verbose);
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directives()));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity >= Verbosity::Verbose)
        .without_time();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}
