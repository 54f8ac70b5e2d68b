use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

pub const CONFIG_FILE: &str = "retrovault.json";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Runtime settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: String,
    pub api_base: String,
    /// Display frame period in milliseconds.
    pub frame_ms: u64,
    pub request_timeout_secs: u64,
    /// Fixed RNG seed for reproducible sessions; random when absent.
    pub seed: Option<u64>,
    /// Read from the environment only.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            frame_ms: 16,
            request_timeout_secs: 30,
            seed: None,
            api_key: None,
        }
    }
}

impl Config {
    /// Settings file (when present and valid) plus the API key from
    /// `API_KEY` or `GEMINI_API_KEY`.
    pub fn load() -> Self {
        let path = data_path(CONFIG_FILE);
        let mut config = match fs::read_to_string(&path) {
            Ok(text) => match Self::from_json(&text) {
                Ok(config) => {
                    log::info!("Loaded settings from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring malformed {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No {} found, using defaults", CONFIG_FILE);
                Self::default()
            }
        };
        config.api_key = api_key_from_env();
        if config.api_key.is_none() {
            log::warn!("API_KEY is not set; history lookups will fail");
        }
        config
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

fn api_key_from_env() -> Option<String> {
    ["API_KEY", "GEMINI_API_KEY"]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|key| !key.trim().is_empty())
}

/// A file next to the executable, or in the working directory when the
/// executable path is unknown.
pub fn data_path(file: &str) -> PathBuf {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            return dir.join(file);
        }
    }
    PathBuf::from(file)
}
