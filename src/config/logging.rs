//! Tracing subscriber setup
//!
//! Filter directives come from `GOALS_LOG`, then `RUST_LOG`, defaulting to
//! warnings only so log lines don't interleave with the shell's output.

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "GOALS_LOG";

const DEFAULT_FILTER: &str = "budget_goals=warn";

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber, writing to stderr
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // Another subscriber may already be installed (e.g. by a test harness)
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init_tracing();
        super::init_tracing();
    }
}
