//! Logging setup for provider processes embedding the search engine.
//!
//! The search pipeline instruments itself with `tracing` spans and events;
//! these helpers install a subscriber that writes them to **stderr**, since
//! in a provider process stdout belongs to the plugin handshake.
//!
//! Filtering follows the `RUST_LOG` environment variable:
//!
//! ```bash
//! # Debug output for the search engine only
//! RUST_LOG=vcd_template_search=debug ./my-provider
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

fn stderr_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
}

/// Install the default subscriber: stderr output, `RUST_LOG` filtering,
/// `info` level when `RUST_LOG` is unset.
///
/// # Panics
///
/// Panics if a global subscriber has already been set; use
/// [`try_init_logging`] when that is a possibility (tests, repeated
/// initialization).
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(stderr_layer())
        .init();
}

/// Like [`init_logging`], but with a caller-chosen fallback level when
/// `RUST_LOG` is unset (e.g. `"debug"`).
pub fn init_logging_with_default(default_level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(stderr_layer())
        .init();
}

/// Non-panicking variant of [`init_logging`].
///
/// Returns `true` if the subscriber was installed, `false` if one was
/// already set.
pub fn try_init_logging() -> bool {
    tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(stderr_layer())
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    // The global subscriber can only be installed once per process, so the
    // init functions themselves are not unit-testable here; the filter
    // syntax is.

    use tracing_subscriber::EnvFilter;

    #[test]
    fn test_env_filter_syntax() {
        assert!(EnvFilter::try_new("info").is_ok());
        assert!(EnvFilter::try_new("vcd_template_search=debug").is_ok());
        assert!(EnvFilter::try_new("warn,vcd_template_search=trace").is_ok());
    }
}
