use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::transport::DEFAULT_USER_AGENT;

/// Environment variable that overrides the configured generative API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Settings for the generative fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerativeConfig {
    /// Absent means the fallback is disabled, which is a valid state.
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    /// Base of an OpenAI-compatible API; `/chat/completions` is appended.
    pub base_url: String,
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            temperature: 0.5,
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }
}

/// Third-party endpoints the lookups talk to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub geocoding_url: String,
    pub forecast_url: String,
    pub encyclopedia_search_url: String,
    pub encyclopedia_summary_url: String,
    pub user_agent: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoding_url: "https://geocoding-api.open-meteo.com/v1/search".to_string(),
            forecast_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            encyclopedia_search_url: "https://en.wikipedia.org/w/rest.php/v1/search/title"
                .to_string(),
            encyclopedia_summary_url: "https://en.wikipedia.org/api/rest_v1/page/summary"
                .to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// [generative]
/// api_key = "..."
/// model = "gpt-4o-mini"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub generative: GenerativeConfig,
    pub endpoints: Endpoints,
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "jarvis", "assistant")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Generative API key, preferring the environment over the file.
    pub fn api_key(&self) -> Option<String> {
        self.api_key_with_override(std::env::var(API_KEY_ENV).ok())
    }

    /// Blank values on either side count as absent.
    pub fn api_key_with_override(&self, env_value: Option<String>) -> Option<String> {
        env_value
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                self.generative
                    .api_key
                    .clone()
                    .filter(|key| !key.trim().is_empty())
            })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        let api_key = api_key.trim().to_string();
        self.generative.api_key = (!api_key.is_empty()).then_some(api_key);
    }
}
