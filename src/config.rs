use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use crate::service::DEFAULT_ENDPOINT;

pub const ENDPOINT_ENV: &str = "TOON_CONVERTER_ENDPOINT";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub endpoint: Option<String>,
    pub download_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    /// Persist `endpoint` while keeping the rest of the file. Fails without
    /// touching the file when the existing contents can't be parsed.
    pub fn save_endpoint(endpoint: &str) -> Result<()> {
        Self::save_endpoint_to(&Self::get_config_path()?, endpoint)
    }

    pub fn save_endpoint_to(config_path: &Path, endpoint: &str) -> Result<()> {
        let mut config = Self::load_from(config_path)?;
        config.endpoint = Some(endpoint.to_string());
        config.save_to(config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    /// Endpoint to use: CLI flag, then environment, then config file, then default
    pub fn resolve_endpoint(&self, cli_endpoint: Option<&str>) -> String {
        cli_endpoint
            .map(str::to_owned)
            .or_else(|| std::env::var(ENDPOINT_ENV).ok().filter(|v| !v.is_empty()))
            .or_else(|| self.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("toon-converter"))
    }

    fn get_config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }
}
