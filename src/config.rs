use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

const MIN_OPTION_COUNT: usize = 2;
const MAX_OPTION_COUNT: usize = 8;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Number of multiple-choice options per quiz question.
    #[serde(default = "default_option_count")]
    pub option_count: usize,
    /// Require tone diacritics in typed pronunciation answers instead of
    /// accepting the loose folded comparison.
    #[serde(default)]
    pub strict_pronunciation: bool,
}

fn default_option_count() -> usize {
    4
}

impl Default for Config {
    fn default() -> Self {
        Self {
            option_count: default_option_count(),
            strict_pronunciation: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hskdr")
            .join("config.toml")
    }

    /// Clamp out-of-range values from hand-edited config files.
    pub fn validate(&mut self) {
        self.option_count = self.option_count.clamp(MIN_OPTION_COUNT, MAX_OPTION_COUNT);
    }
}
