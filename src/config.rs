//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// API key configuration.
    #[serde(default)]
    pub keys: KeysConfig,

    /// Default values used when a CLI flag is not given.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// API key configuration.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// Gemini API key.
    pub gemini: Option<String>,
    /// `OctoAI` API token.
    pub octoai: Option<String>,
}

/// Default parameter values from config file.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Model used by `chat`.
    pub chat_model: String,
    /// Model used by `caption`.
    pub caption_model: String,
    /// Image generation engine used by `generate`.
    pub engine: String,
    /// Output format for generated images.
    pub format: String,
    /// Directory generated images are saved into.
    pub output_dir: PathBuf,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            chat_model: "pro".to_string(),
            caption_model: "flash".to_string(),
            engine: "sdxl".to_string(),
            format: "jpeg".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Get the Gemini API key, preferring environment variables.
    ///
    /// `api_key` is accepted as a legacy variable name.
    #[must_use]
    pub fn gemini_key(&self) -> Option<String> {
        env_non_empty("GEMINI_API_KEY")
            .or_else(|| env_non_empty("api_key"))
            .or_else(|| self.keys.gemini.clone())
    }

    /// Get the `OctoAI` token, preferring the environment variable.
    #[must_use]
    pub fn octoai_key(&self) -> Option<String> {
        env_non_empty("OCTOAI_TOKEN").or_else(|| self.keys.octoai.clone())
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Load a `.env` file from the working directory, if one exists.
///
/// Variables already present in the environment are not overwritten.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("ignoring unreadable .env file: {e}"),
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `GURU_CONFIG` environment variable
/// 3. `~/.config/guru/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("GURU_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/guru/config.toml")
    } else {
        PathBuf::from("guru.toml")
    }
}
