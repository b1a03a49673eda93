//! Configuration for Motriz.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::MotrizResult;

/// Main configuration for Motriz.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Intent learning settings.
    #[serde(default)]
    pub learning: LearningConfig,

    /// Snapshot persistence settings.
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Chat assistant settings.
    #[serde(default)]
    pub assistant: AssistantConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format (text, json).
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Intent learning settings.
///
/// Only the caller-side acceptance thresholds live here. Similarity weights,
/// confidence bounds and the reachability cutoff are engine constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningConfig {
    /// Minimum adjusted score to dispatch a matched pattern's action.
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,

    /// Adjusted score above which `learn` merges into an existing pattern.
    #[serde(default = "default_duplicate_threshold")]
    pub duplicate_threshold: f64,

    /// Seed the curated baseline when the store is empty after loading.
    #[serde(default = "default_true")]
    pub bootstrap_baseline: bool,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            match_threshold: default_match_threshold(),
            duplicate_threshold: default_duplicate_threshold(),
            bootstrap_baseline: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_match_threshold() -> f64 {
    0.6
}

fn default_duplicate_threshold() -> f64 {
    0.85
}

/// Snapshot persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Snapshot file path.
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,

    /// Number of engine mutations between background saves.
    #[serde(default = "default_save_every")]
    pub save_every: u64,

    /// Extra write attempts after a failed save.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Pause between write attempts (in milliseconds).
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            snapshot_path: default_snapshot_path(),
            save_every: default_save_every(),
            retry_attempts: default_retry_attempts(),
            retry_backoff_ms: default_retry_backoff(),
        }
    }
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from(".motriz/knowledge.json")
}

fn default_save_every() -> u64 {
    5
}

fn default_retry_attempts() -> u32 {
    2
}

fn default_retry_backoff() -> u64 {
    200
}

/// Chat assistant settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Maximum number of suggestions returned with each answer.
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// Number of recent history turns searched for a serial number.
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// JSON inventory backing the in-memory equipment directory.
    #[serde(default)]
    pub inventory_path: Option<PathBuf>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            max_suggestions: default_max_suggestions(),
            history_window: default_history_window(),
            inventory_path: None,
        }
    }
}

fn default_max_suggestions() -> usize {
    3
}

fn default_history_window() -> usize {
    10
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// Relative `snapshot_path` and `inventory_path` are resolved against
    /// the directory containing the file.
    pub fn load<P: AsRef<Path>>(path: P) -> MotrizResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        config.validate()?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Rebases relative file paths onto `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        rebase(&mut self.persistence.snapshot_path, base);
        if let Some(inventory) = self.assistant.inventory_path.as_mut() {
            rebase(inventory, base);
        }
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> MotrizResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Creates default configuration.
    pub fn default_config() -> Self {
        Self {
            general: GeneralConfig::default(),
            learning: LearningConfig::default(),
            persistence: PersistenceConfig::default(),
            assistant: AssistantConfig::default(),
        }
    }

    /// Tries to load configuration from current directory or uses default.
    pub fn load_or_default() -> Self {
        Self::load("motriz.toml").unwrap_or_else(|_| Self::default_config())
    }

    /// Rejects thresholds outside [0, 1].
    pub fn validate(&self) -> MotrizResult<()> {
        let thresholds = [
            ("learning.match_threshold", self.learning.match_threshold),
            ("learning.duplicate_threshold", self.learning.duplicate_threshold),
        ];

        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(crate::MotrizError::config(format!(
                    "{} deve estar entre 0.0 e 1.0 (recebido {})",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

fn rebase(path: &mut PathBuf, base: &Path) {
    if path.is_relative() && !base.as_os_str().is_empty() {
        *path = base.join(&*path);
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
