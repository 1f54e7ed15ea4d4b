//! # Configuration
//!
//! Settings live in `<home>/config.json`, where home is `~/.movier` unless
//! `MOVIER_HOME` says otherwise. A missing file means defaults.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `api_key` | none | OMDb API key (`OMDB_API_KEY` wins when set) |
//! | `api_url` | `https://www.omdbapi.com/` | OMDb endpoint |
//! | `timeout_secs` | `10` | Per-request timeout |
//! | `retries` | `2` | Extra attempts for failed requests |
//! | `min_file_size_mb` | `100` | Smaller files are not movies |
//! | `language` | `english` | Answer suggested by the language prompt |
//! | `auto_guess` | `true` | Let clear winners skip the choice menu |
//! | `max_keyword_prompts` | `5` | Keyword prompts per search |
//! | `max_research_rounds` | `3` | "Use another keyword" rounds per file |
//! | `player` | platform default | Command used to play a movie |

use crate::error::{MovierError, Result};
use crate::provider::omdb::DEFAULT_API_URL;
use crate::resolver::ResolverLimits;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";

pub const HOME_ENV: &str = "MOVIER_HOME";
pub const API_KEY_ENV: &str = "OMDB_API_KEY";

pub const KEYS: [&str; 10] = [
    "api_key",
    "api_url",
    "timeout_secs",
    "retries",
    "min_file_size_mb",
    "language",
    "auto_guess",
    "max_keyword_prompts",
    "max_research_rounds",
    "player",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MovierConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub api_url: String,
    pub timeout_secs: u64,
    pub retries: u32,
    pub min_file_size_mb: u64,
    pub language: String,
    pub auto_guess: bool,
    pub max_keyword_prompts: u32,
    pub max_research_rounds: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<String>,
}

impl Default for MovierConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: 10,
            retries: 2,
            min_file_size_mb: 100,
            language: "english".to_string(),
            auto_guess: true,
            max_keyword_prompts: 5,
            max_research_rounds: 3,
            player: None,
        }
    }
}

impl MovierConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: MovierConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }

    /// The key from the environment, else the configured one.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn min_file_size(&self) -> u64 {
        self.min_file_size_mb * 1024 * 1024
    }

    pub fn limits(&self) -> ResolverLimits {
        ResolverLimits {
            max_keyword_prompts: self.max_keyword_prompts,
            max_research_rounds: self.max_research_rounds,
        }
    }

    /// Display value of a key. `None` for unknown keys.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match normalize_key(key).as_str() {
            "api_key" => self.api_key.clone().unwrap_or_default(),
            "api_url" => self.api_url.clone(),
            "timeout_secs" => self.timeout_secs.to_string(),
            "retries" => self.retries.to_string(),
            "min_file_size_mb" => self.min_file_size_mb.to_string(),
            "language" => self.language.clone(),
            "auto_guess" => self.auto_guess.to_string(),
            "max_keyword_prompts" => self.max_keyword_prompts.to_string(),
            "max_research_rounds" => self.max_research_rounds.to_string(),
            "player" => self.player.clone().unwrap_or_default(),
            _ => return None,
        };
        Some(value)
    }

    /// Parses and sets one key. An empty value clears optional keys.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let key = normalize_key(key);
        let value = value.trim();
        match key.as_str() {
            "api_key" => self.api_key = non_empty(value),
            "api_url" => self.api_url = value.to_string(),
            "timeout_secs" => self.timeout_secs = parse_number(&key, value)?,
            "retries" => self.retries = parse_number(&key, value)?,
            "min_file_size_mb" => self.min_file_size_mb = parse_number(&key, value)?,
            "language" => self.language = value.to_string(),
            "auto_guess" => self.auto_guess = parse_bool(&key, value)?,
            "max_keyword_prompts" => self.max_keyword_prompts = parse_number(&key, value)?,
            "max_research_rounds" => self.max_research_rounds = parse_number(&key, value)?,
            "player" => self.player = non_empty(value),
            _ => return Err(MovierError::Config(format!("Unknown config key: {}", key))),
        }
        Ok(())
    }
}

/// `MOVIER_HOME`, else `~/.movier`.
pub fn home_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|h| !h.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".movier"))
        .ok_or_else(|| MovierError::Config("Cannot find the home directory".to_string()))
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('-', "_")
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| MovierError::Config(format!("{} expects a number, got '{}'", key, value)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(MovierError::Config(format!(
            "{} expects true or false, got '{}'",
            key, value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = MovierConfig::default();
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.min_file_size(), 100 * 1024 * 1024);
        assert!(config.auto_guess);
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_load_missing_config() {
        let temp = tempdir().unwrap();
        let config = MovierConfig::load(temp.path().join("nope")).unwrap();
        assert_eq!(config, MovierConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp = tempdir().unwrap();
        let mut config = MovierConfig::default();
        config.set("language", "hindi").unwrap();
        config.set("auto-guess", "no").unwrap();
        config.save(temp.path()).unwrap();

        let loaded = MovierConfig::load(temp.path()).unwrap();
        assert_eq!(loaded.language, "hindi");
        assert!(!loaded.auto_guess);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(CONFIG_FILENAME), r#"{"retries": 5}"#).unwrap();
        let config = MovierConfig::load(temp.path()).unwrap();
        assert_eq!(config.retries, 5);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = MovierConfig::default();
        assert!(matches!(
            config.set("retries", "many"),
            Err(MovierError::Config(_))
        ));
        assert!(matches!(
            config.set("colour", "blue"),
            Err(MovierError::Config(_))
        ));
        assert_eq!(config, MovierConfig::default());
    }

    #[test]
    fn test_get_every_key() {
        let config = MovierConfig::default();
        for key in KEYS {
            assert!(config.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(config.get("timeout-secs").as_deref(), Some("10"));
        assert_eq!(config.get("bogus"), None);
    }

    #[test]
    fn test_empty_value_clears_optional_keys() {
        let mut config = MovierConfig::default();
        config.set("player", "mpv").unwrap();
        assert_eq!(config.player.as_deref(), Some("mpv"));
        config.set("player", "").unwrap();
        assert_eq!(config.player, None);
    }
}
