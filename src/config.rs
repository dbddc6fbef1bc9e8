use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::errors::ConfigError;
use crate::provenance::DEFAULT_FEATURE_URI_KEY;
use crate::style::Palette;

/// ## Structure
/// This module contains the data structures for the configuration file.
///
/// ```text
/// Config
///   ├── palette: Palette
///   │   ├── colors: Vec<String>
///   │   └── symbols: Vec<String>
///   ├── feature_uri_key: String
///   ├── skip_pending_steps: bool
///   └── exports: Vec<ExportProfileItem>
///       ├── filename: String
///       └── exporter: ExportFileType
///           ├── JSON
///           ├── YAML
///           ├── CSV
///           └── Custom(CustomExportProfile)
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub palette: Palette,
    pub feature_uri_key: String,
    pub skip_pending_steps: bool,
    pub exports: Vec<ExportProfileItem>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            feature_uri_key: DEFAULT_FEATURE_URI_KEY.to_string(),
            skip_pending_steps: false,
            exports: Vec::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExportProfileItem {
    pub filename: String,
    pub exporter: ExportFileType,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum ExportFileType {
    JSON,
    YAML,
    CSV,
    Custom(CustomExportProfile),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CustomExportProfile {
    pub template: String,
    pub partials: Option<HashMap<String, String>>,
}

impl ExportFileType {
    /// Resolves relative template and partial paths against `base_dir`
    pub fn resolved_against(&self, base_dir: &Path) -> Self {
        match self {
            ExportFileType::Custom(profile) => {
                ExportFileType::Custom(profile.resolved_against(base_dir))
            }
            other => other.clone(),
        }
    }
}

impl CustomExportProfile {
    pub fn resolved_against(&self, base_dir: &Path) -> Self {
        let resolve = |path: &String| base_dir.join(path).display().to_string();
        Self {
            template: resolve(&self.template),
            partials: self.partials.as_ref().map(|partials| {
                partials
                    .iter()
                    .map(|(name, path)| (name.clone(), resolve(path)))
                    .collect()
            }),
        }
    }
}

impl Config {
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.palette.colors.is_empty() {
            return Err(ConfigError::InvalidPalette(
                "at least one color is required".to_string(),
            ));
        }
        if self.palette.symbols.is_empty() {
            return Err(ConfigError::InvalidPalette(
                "at least one symbol is required".to_string(),
            ));
        }
        if self.feature_uri_key.trim().is_empty() {
            return Err(ConfigError::InvalidFeatureUriKey(
                self.feature_uri_key.clone(),
            ));
        }
        Ok(())
    }
}
