//! Configuration via `cairn.toml`
//!
//! A missing file means defaults. To change settings, edit the file and
//! rebuild the factory.

use std::path::{Path, PathBuf};

use cairn_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Config file name conventionally placed next to the application.
pub const CONFIG_FILE_NAME: &str = "cairn.toml";

/// Configuration loaded from `cairn.toml`.
///
/// # Example
///
/// ```toml
/// # Entity kinds registered at startup, one name per line
/// entities = "entities.txt"
/// default_page_size = 20
/// max_page_size = 1000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CairnConfig {
    /// Optional entity kind resource registered when the factory is built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<PathBuf>,
    /// Page size used by `EntityDao::first_page`.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    /// Largest page a DAO will assemble.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

fn default_page_size() -> u32 {
    20
}

fn default_max_page_size() -> u32 {
    1000
}

impl Default for CairnConfig {
    fn default() -> Self {
        Self {
            entities: None,
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl CairnConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# Cairn configuration
#
# Entity kind resource registered at startup (optional).
# One kind name per line; blank lines and lines starting with '#' are skipped.
# entities = "entities.txt"

# Page size for first_page() requests (default: 20)
default_page_size = 20

# Largest page a DAO will assemble; larger requests are rejected (default: 1000)
max_page_size = 1000
"#
    }

    /// Check page size bounds.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if `default_page_size` exceeds `max_page_size`.
    pub fn validate(&self) -> Result<()> {
        if self.default_page_size > self.max_page_size {
            return Err(Error::invalid_input(format!(
                "default_page_size {} exceeds max_page_size {}",
                self.default_page_size, self.max_page_size
            )));
        }
        Ok(())
    }

    /// Read and parse config from a file path.
    ///
    /// Relative `entities` paths resolve against the config file's directory.
    ///
    /// # Errors
    ///
    /// `Configuration` if the file cannot be read, `InvalidInput` if it
    /// cannot be parsed or fails validation.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let mut config: CairnConfig = toml::from_str(&content).map_err(|e| {
            Error::invalid_input(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;

        if let (Some(entities), Some(dir)) = (config.entities.as_mut(), path.parent()) {
            if entities.is_relative() {
                *entities = dir.join(&*entities);
            }
        }

        info!(
            path = %path.display(),
            default_page_size = config.default_page_size,
            max_page_size = config.max_page_size,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Read config from `path`, or defaults if the file does not exist.
    pub fn from_file_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::configuration(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::configuration(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::configuration(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
