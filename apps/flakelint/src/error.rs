//! Error type shared by the plugin, the diff parser, and the config loader.

use std::path::PathBuf;

/// Errors raised while loading the plugin or running the wrapped tool.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The external tool could not be found on `PATH`.
    #[error("command '{command}' not found. Please install it and ensure it's in your PATH.")]
    CommandNotFound { command: String },

    /// A diff header path carried neither the `original/` nor the `fixed/` prefix.
    #[error("unexpected error format: {0}")]
    UnexpectedErrorFormat(String),

    /// A plugin table was present but had no `config` entry.
    #[error("{location}.config must be set")]
    MissingPluginConfig { location: String },

    /// The plugin `config` table did not match the setting schema.
    #[error("invalid setting in {location}: {message}")]
    InvalidSetting { location: String, message: String },

    /// A target name other than `lint` or `format`.
    #[error("unknown target '{0}' (expected lint or format)")]
    UnknownTarget(String),

    #[error("failed to parse {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    ConfigYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid glob pattern '{pattern}': {source}")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
