//! Runtime-level errors. Domain outcomes stay in `blog_engine::error`.

use std::path::PathBuf;

use blog_engine::error::ApplyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error{}: {source}", location(.path.as_deref()))]
    Load {
        path: Option<PathBuf>,
        #[source]
        source: ::config::ConfigError,
    },
}

fn location(path: Option<&std::path::Path>) -> String {
    path.map(|p| format!(" in {}", p.display())).unwrap_or_default()
}

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("event at position {position} rejected: {source}")]
    Apply {
        position: usize,
        #[source]
        source: ApplyError,
    },
    #[error("replay diverged: expected hash {expected}, got {actual}")]
    Diverged { expected: String, actual: String },
}
