//! Subscriber setup for binaries and tests.
//!
//! The library only emits `tracing` events; nothing is printed unless a
//! subscriber is installed.  [`init`] installs a formatter on stderr whose
//! filter comes from `RUST_LOG` when set, and from a verbosity count
//! otherwise.

use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, EnvFilter};

/// Default directive for a `-v` count: `0` warn, `1` info, `2` debug,
/// anything higher trace.
pub fn directive_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn filter_for(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive_for(verbosity)))
}

/// Installs the global subscriber.
///
/// Fails if another subscriber is already installed.
pub fn init(verbosity: u8) -> Result<(), TryInitError> {
    fmt()
        .with_env_filter(filter_for(verbosity))
        .with_writer(std::io::stderr)
        .with_target(verbosity > 2)
        .finish()
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_ladder() {
        assert_eq!(directive_for(0), "warn");
        assert_eq!(directive_for(1), "info");
        assert_eq!(directive_for(2), "debug");
        assert_eq!(directive_for(9), "trace");
    }

    #[test]
    fn test_second_init_is_rejected() {
        let _ = init(0);
        assert!(init(0).is_err());
    }
}
