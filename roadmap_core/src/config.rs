//! Configuration file support for Manabi.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/manabi/config.toml`.

use crate::session::SessionLimits;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub review: ReviewConfig,

    #[serde(default)]
    pub final_exam: FinalExamConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Review session parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReviewConfig {
    #[serde(default = "default_target_streak")]
    pub target_streak: u32,

    #[serde(default = "default_max_questions")]
    pub max_questions: u32,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            target_streak: default_target_streak(),
            max_questions: default_max_questions(),
        }
    }
}

/// Final exam parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FinalExamConfig {
    #[serde(default = "default_final_total")]
    pub total: u32,

    #[serde(default = "default_pass_rate")]
    pub pass_rate: f64,
}

impl Default for FinalExamConfig {
    fn default() -> Self {
        Self {
            total: default_final_total(),
            pass_rate: default_pass_rate(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("manabi")
}

fn default_target_streak() -> u32 {
    3
}

fn default_max_questions() -> u32 {
    10
}

fn default_final_total() -> u32 {
    10
}

fn default_pass_rate() -> f64 {
    0.7
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("manabi").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Session limits derived from the review and final-exam sections
    pub fn session_limits(&self) -> SessionLimits {
        SessionLimits {
            target_streak: self.review.target_streak,
            max_questions: self.review.max_questions,
            final_total: self.final_exam.total,
            pass_rate: self.final_exam.pass_rate,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.review.target_streak == 0 {
            return Err(Error::Config("review.target_streak must be >= 1".into()));
        }
        if self.review.max_questions == 0 {
            return Err(Error::Config("review.max_questions must be >= 1".into()));
        }
        if self.final_exam.total == 0 {
            return Err(Error::Config("final_exam.total must be >= 1".into()));
        }
        if !(0.0..=1.0).contains(&self.final_exam.pass_rate) {
            return Err(Error::Config(
                "final_exam.pass_rate must be between 0 and 1".into(),
            ));
        }
        Ok(())
    }
}
