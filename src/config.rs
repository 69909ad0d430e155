use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatError};
use crate::stat::Stat;

/// Application configuration loaded from boxscore.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataConfig,
    pub display: DisplayConfig,
    pub plot: PlotConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Season file loaded at start-up
    pub season_file: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Print the season table after loading
    pub show_on_start: bool,
    /// Decimal places for numbers in the table
    pub precision: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Stat on the horizontal axis; empty disables the start-up plot
    pub x: String,
    /// Optional stat on the vertical axis
    pub y: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default tracing filter when RUST_LOG is unset
    pub level: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            season_file: "season.csv".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            show_on_start: true,
            precision: 1,
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            x: "pts".to_string(),
            y: "ast".to_string(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "info".to_string(),
        }
    }
}

impl PlotConfig {
    /// The configured stat pair, or `None` when plotting is disabled.
    pub fn stats(&self) -> Result<Option<(Stat, Option<Stat>)>> {
        if self.x.trim().is_empty() {
            return Ok(None);
        }
        let x = self.x.parse()?;
        let y = if self.y.trim().is_empty() {
            None
        } else {
            Some(self.y.parse()?)
        };
        Ok(Some((x, y)))
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            StatError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| StatError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Load `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Config::load(path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| StatError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
