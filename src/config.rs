//! Configuration loading
//!
//! Defaults, then `<config_dir>/dictionary/config.json` (or `--config`), then
//! command-line flags and their environment variables.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory of dictionary files, one entry per line
    pub dictionary_dir: PathBuf,
    /// Plain-text book used for word frequencies
    pub frequency_corpus: PathBuf,
    /// Listen address of the HTTP API
    pub bind_addr: String,
    /// Public URL of the API, quoted in help texts
    pub public_domain: String,
    /// Explain corrections unless a request says otherwise
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionary_dir: PathBuf::from("Gutenburg_Dictionary"),
            frequency_corpus: PathBuf::from("Gutenburg_EBook").join("TheAdventuresOfSherlockHolmes.txt"),
            bind_addr: "127.0.0.1:8080".to_string(),
            public_domain: "http://localhost:8080".to_string(),
            debug: false,
        }
    }
}

/// Get the path to the default configuration file
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Cannot determine config directory")?;
    Ok(config_dir.join("dictionary").join("config.json"))
}

/// Load the configuration. An explicit `path` must exist; the default one may not.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config_from(path),
        None => {
            let path = match config_path() {
                Ok(path) => path,
                Err(_) => return Ok(Config::default()),
            };
            if !path.exists() {
                return Ok(Config::default());
            }
            load_config_from(&path)
        }
    }
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let config: Config = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    Ok(config)
}
