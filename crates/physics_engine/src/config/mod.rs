//! Configuration system
//!
//! File-backed configuration shared by the physics world and host
//! applications. The format is chosen from the file extension.

use std::path::Path;

pub use serde::{Serialize, Deserialize};

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML (`.toml`)
    Toml,
    /// Rusty Object Notation (`.ron`)
    Ron,
}

impl ConfigFormat {
    /// Pick a format from a path's extension
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Parse configuration text in the given format
    fn from_str_as(contents: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        match format {
            ConfigFormat::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
            ConfigFormat::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Serialize configuration in the given format
    fn to_string_as(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        match format {
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
            }
            ConfigFormat::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string())),
        }
    }

    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;
        Self::from_str_as(&contents, format)
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = self.to_string_as(ConfigFormat::from_path(path)?)?;
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
