//! Prompt store configuration

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::Value as YamlValue;

use crate::error::PromptError;

/// Configuration for a [`crate::PromptManager`]
///
/// Only `source-directory` has a defined effect. Unrecognized keys are
/// accepted and carried in `extra` so callers can layer their own settings
/// through the same object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Directory scanned for source units
    #[serde(rename = "source-directory", default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Unrecognized keys, kept but otherwise ignored
    #[serde(flatten)]
    pub extra: BTreeMap<String, YamlValue>,
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("prompts")
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            extra: BTreeMap::new(),
        }
    }
}

impl PromptConfig {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self, PromptError> {
        if let Some(config_path) = path {
            return Self::load_from_file(config_path);
        }

        let local = PathBuf::from("promptstore.yml");
        if local.exists() {
            return Self::load_from_file(&local);
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, PromptError> {
        let content = std::fs::read_to_string(path).map_err(|source| PromptError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_yaml::from_str(&content).map_err(|source| PromptError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;

        tracing::info!("Loaded config from: {}", path.display());
        Ok(config)
    }

    /// Layer `overrides` on top of this config
    ///
    /// `source-directory` is replaced; extra keys deep-merge the way the
    /// template trees do (mappings union, other values overwrite).
    pub fn overlay(mut self, overrides: PromptConfig) -> Self {
        self.source_dir = overrides.source_dir;
        for (key, value) in overrides.extra {
            match self.extra.get_mut(&key) {
                Some(existing) => merge_values(existing, value),
                None => {
                    self.extra.insert(key, value);
                }
            }
        }
        self
    }
}

fn merge_values(target: &mut YamlValue, source: YamlValue) {
    match (target, source) {
        (YamlValue::Mapping(target_map), YamlValue::Mapping(source_map)) => {
            for (key, value) in source_map {
                match target_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}
