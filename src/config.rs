// src/config.rs
//
// `.adoc-reflow.toml`:
//
//     width = 72
//
// The engine takes any width; clamping to a sane range happens here, on the
// host side.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const CONFIG_FILE_NAME: &str = ".adoc-reflow.toml";
pub const DEFAULT_WIDTH: usize = 80;
pub const MIN_WIDTH: usize = 20;
pub const MAX_WIDTH: usize = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: DEFAULT_WIDTH,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    /// Nearest config file at or above `start_dir`, with its contents.
    pub fn discover<P: AsRef<Path>>(start_dir: P) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        for dir in start_dir.as_ref().ancestors() {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if let Some(config) = Self::load_from_path(&candidate)? {
                return Ok(Some((candidate, config)));
            }
        }
        Ok(None)
    }
}

/// Bound a requested width to `MIN_WIDTH..=MAX_WIDTH`.
pub fn clamp_width(width: usize) -> usize {
    width.clamp(MIN_WIDTH, MAX_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let loaded = Config::load_from_path(dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_loads_width() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "width = 72\n").unwrap();

        let config = Config::load_from_path(&path).unwrap().unwrap();
        assert_eq!(config, Config { width: 72 });
    }

    #[test]
    fn test_empty_file_uses_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "").unwrap();

        let config = Config::load_from_path(&path).unwrap().unwrap();
        assert_eq!(config.width, DEFAULT_WIDTH);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "widht = 72\n").unwrap();

        let err = Config::load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_discover_walks_up() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("docs").join("guide");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "width = 100\n").unwrap();

        let (path, config) = Config::discover(&nested).unwrap().unwrap();
        assert_eq!(path, dir.path().join(CONFIG_FILE_NAME));
        assert_eq!(config.width, 100);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let original = Config { width: 66 };
        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(original, deserialized);
    }

    #[rstest]
    #[case(0, MIN_WIDTH)]
    #[case(19, 20)]
    #[case(72, 72)]
    #[case(200, 200)]
    #[case(1000, MAX_WIDTH)]
    fn test_width_is_clamped(#[case] width: usize, #[case] expected: usize) {
        assert_eq!(clamp_width(width), expected);
    }
}
