//! Application configuration.
//!
//! Stored as JSON. Every field has a default, so a partial file (or no file
//! at all) is valid. Command-line flags override what is loaded here.

use crate::cleaning::schema::ColumnSchema;
use crate::error::{CleanError, Result, ResultExt as _};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "inflight-clean";
pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputsConfig {
    pub file_a: PathBuf,
    pub file_b: PathBuf,
    /// Names used in logs and report section headers
    pub label_a: String,
    pub label_b: String,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            file_a: PathBuf::from("data/raw/extract_a.csv"),
            file_b: PathBuf::from("data/raw/extract_b.csv"),
            label_a: "File A".to_owned(),
            label_b: "File B".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputsConfig {
    /// Combined cleaned dataset (`.csv` or `.parquet`)
    pub cleaned: PathBuf,
    pub report: PathBuf,
}

impl Default for OutputsConfig {
    fn default() -> Self {
        Self {
            cleaned: PathBuf::from("data/clean/cleaned_data_combined.csv"),
            report: PathBuf::from("data/clean/cleaning_report.txt"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// Write rotating log files in addition to the console
    pub file_output: bool,
    /// Overrides the platform data directory
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file_output: true,
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub inputs: InputsConfig,
    pub outputs: OutputsConfig,
    pub schema: ColumnSchema,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// `<config dir>/inflight-clean/config.json`
    ///
    /// # Errors
    ///
    /// Returns an error if the platform has no config directory.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CleanError::Config("Failed to get config directory".to_owned()))?;
        Ok(config_dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Loads `path` when given, otherwise the default location if it exists,
    /// otherwise defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit path is missing or any file fails to
    /// parse or validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_path() {
                Ok(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        config.schema.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        Self::from_json(&contents)
    }

    /// # Errors
    ///
    /// Returns [`CleanError::Config`] for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes pretty JSON, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }
}
