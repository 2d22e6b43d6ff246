//! Tracing subscriber setup.
//!
//! Tasks log their transitions at `debug` and suppressed callback panics at
//! `warn` through the `tracing` facade. These helpers install a subscriber
//! for binaries and tests that do not bring their own.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Builds the filter from `RUST_LOG`, falling back to `default_directive`.
fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Installs a global subscriber.
///
/// `RUST_LOG` takes precedence over `default_directive` (for example
/// `"cancellable=debug"`). Returns false if a global subscriber was
/// already installed, in which case nothing changes.
pub fn init_tracing(default_directive: &str, format: LogFormat) -> bool {
    let registry = tracing_subscriber::registry().with(env_filter(default_directive));
    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .is_ok(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .is_ok(),
    }
}

/// Initialize tracing for test runs.
///
/// Safe to call from every test; only the first call installs the subscriber.
#[cfg(test)]
pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format_is_pretty() {
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }

    #[test]
    fn test_env_filter_fallback() {
        let filter = env_filter("cancellable=debug");
        assert!(filter.to_string().contains("debug") || std::env::var("RUST_LOG").is_ok());
    }

    #[test]
    fn test_second_init_is_noop() {
        init_test_tracing();
        assert!(!init_tracing("cancellable=debug", LogFormat::Json));
    }
}
