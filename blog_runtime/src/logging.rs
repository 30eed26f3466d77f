//! Tracing subscriber setup.
//!
//! Logs go to stderr so they never interleave with shell output on
//! stdout. `RUST_LOG` takes precedence over the configured level.

use std::io::Write;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use crate::config::RuntimeConfig;

pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Filter from `RUST_LOG` if present and valid, else from `log_level`.
pub fn env_filter(config: &RuntimeConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &RuntimeConfig) -> Result<(), InitError> {
    let builder = fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .with_target(true);

    if config.log_json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
}

/// [`init`], writing a failure to `sink` instead of returning it.
/// No subscriber may be listening yet, so the failure bypasses tracing.
pub fn init_or_report(config: &RuntimeConfig, mut sink: impl Write) -> bool {
    match init(config) {
        Ok(()) => true,
        Err(e) => {
            let _ = writeln!(sink, "blog: logging disabled: {e}");
            false
        }
    }
}
