//! Runtime configuration.
//!
//! Layering, lowest to highest precedence:
//!   1. built-in defaults
//!   2. JSON file named by `BLOG_CONFIG` (if set)
//!   3. `BLOG_`-prefixed environment variables (`BLOG_LOG_LEVEL`, ...)
//!
//! Unknown keys are rejected from every layer. `RUST_LOG`, when set,
//! still wins over `log_level` at subscriber setup.

use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File, FileFormat, Map};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

pub const CONFIG_PATH_VAR: &str = "BLOG_CONFIG";
pub const ENV_PREFIX: &str = "BLOG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Default `EnvFilter` directive, e.g. `info` or `blog_engine=debug`.
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
    /// Input word that leaves a post field unchanged while editing.
    pub skip_word: String,
    pub welcome: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_json: false,
            skip_word: blog_engine::posts::SKIP_SENTINEL.to_string(),
            welcome: "Welcome to the blog. I hope you like it!".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Resolve the configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_VAR).map(PathBuf::from);
        let vars = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        Self::load_from(path.as_deref(), vars)
    }

    /// Layer the defaults, the optional JSON file at `path` and the
    /// `BLOG_` entries of `vars`. `BLOG_CONFIG` itself is not a setting.
    pub fn load_from(
        path: Option<&Path>,
        mut vars: Map<String, String>,
    ) -> Result<Self, ConfigError> {
        vars.remove(CONFIG_PATH_VAR);
        let fail = |source: ::config::ConfigError| ConfigError::Load {
            path: path.map(Path::to_path_buf),
            source,
        };

        let mut builder = Config::builder().add_source(defaults()?);
        if let Some(path) = path {
            info!(path = %path.display(), "loading config file");
            builder = builder.add_source(File::from(path).format(FileFormat::Json).required(true));
        }
        builder
            .add_source(Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(fail)
    }

    /// Defaults overlaid with an inline JSON document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(defaults()?)
            .add_source(File::from_str(raw, FileFormat::Json))
            .build()
            .and_then(|config| config.try_deserialize())
            .map_err(|source| ConfigError::Load { path: None, source })
    }
}

fn defaults() -> Result<Config, ConfigError> {
    Config::try_from(&RuntimeConfig::default())
        .map_err(|source| ConfigError::Load { path: None, source })
}
