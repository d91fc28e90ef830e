use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, TaskweaveError};

/// Top-level configuration for the taskweave pipeline.
///
/// Loaded from a TOML file; every section falls back to defaults when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskweaveConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub confirmation: ConfirmationConfig,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

impl TaskweaveConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TaskweaveConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration, falling back to defaults if the file is missing
    /// or unparsable.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| TaskweaveError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory for all persisted state.
    pub data_dir: PathBuf,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

/// Confirmation workflow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Snapshot file for pending/processed confirmation items, relative to
    /// `general.data_dir` unless absolute.
    pub storage_file: PathBuf,
    /// Extracted items below this confidence are still queued for
    /// confirmation; the value is recorded for display thresholds.
    pub min_confidence: f64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            storage_file: PathBuf::from("confirmations.json"),
            min_confidence: 0.6,
        }
    }
}

impl ConfirmationConfig {
    /// Resolve the snapshot path against the data directory.
    pub fn storage_path(&self, data_dir: &Path) -> PathBuf {
        if self.storage_file.is_absolute() {
            self.storage_file.clone()
        } else {
            data_dir.join(&self.storage_file)
        }
    }
}

/// Task synthesis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Jaccard similarity above which an incoming item is a duplicate.
    pub duplicate_threshold: f64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            duplicate_threshold: 0.8,
        }
    }
}

/// Local language model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:11434".to_string(),
            model: "llama2".to_string(),
            timeout_secs: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TaskweaveConfig::default();
        assert_eq!(config.general.data_dir, PathBuf::from("data"));
        assert!((config.confirmation.min_confidence - 0.6).abs() < f64::EPSILON);
        assert!((config.synthesis.duplicate_threshold - 0.8).abs() < f64::EPSILON);
        assert!(config.llm.enabled);
        assert_eq!(config.llm.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_storage_path_resolution() {
        let config = ConfirmationConfig::default();
        let resolved = config.storage_path(Path::new("/var/taskweave"));
        assert_eq!(resolved, PathBuf::from("/var/taskweave/confirmations.json"));

        let absolute = ConfirmationConfig {
            storage_file: PathBuf::from("/tmp/items.json"),
            ..ConfirmationConfig::default()
        };
        assert_eq!(
            absolute.storage_path(Path::new("/var/taskweave")),
            PathBuf::from("/tmp/items.json")
        );
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = TaskweaveConfig::default();
        config.llm.model = "mistral".to_string();
        config.synthesis.duplicate_threshold = 0.9;
        config.save(&path).unwrap();

        let loaded = TaskweaveConfig::load(&path).unwrap();
        assert_eq!(loaded.llm.model, "mistral");
        assert!((loaded.synthesis.duplicate_threshold - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let config = TaskweaveConfig::load_or_default(Path::new("/nonexistent/config.toml"));
        assert_eq!(config.llm.model, "llama2");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: TaskweaveConfig = toml::from_str(
            r#"
            [llm]
            model = "phi3"
            "#,
        )
        .unwrap();
        assert_eq!(config.llm.model, "phi3");
        assert_eq!(config.llm.base_url, "http://localhost:11434");
        assert!((config.synthesis.duplicate_threshold - 0.8).abs() < f64::EPSILON);
    }
}
