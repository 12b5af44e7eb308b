// src/error.rs

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("line range {start}..{end} does not fit a document of {line_count} lines")]
    LineRange {
        start: usize,
        end: usize,
        line_count: usize,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
