use crate::error::ConfigError;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tabs_protocol::{find_known_source, KNOWN_SOURCES};

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    sources: BTreeMap<String, toml::Value>,
}

/// Which sources contribute tabs. Every known source defaults to disabled.
///
/// Changing a flag never touches disk; call [`SourcesConfig::save`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourcesConfig {
    enabled: BTreeMap<String, bool>,
}

impl SourcesConfig {
    /// Loads `path`, falling back to all-disabled on any error.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => config,
            Err(err) => {
                warn!("Ignoring unreadable source config: {err}");
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    err,
                })
            }
        };
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        let mut config = Self::default();
        for (name, value) in file.sources {
            let Some(known) = find_known_source(&name) else {
                warn!("Ignoring unknown source {name:?} in config");
                continue;
            };
            match value.as_bool() {
                Some(flag) => {
                    config.enabled.insert(known.name.to_string(), flag);
                }
                None => warn!("Source flag for {name} is not a boolean ({value}); treating as disabled"),
            }
        }
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        let sources = KNOWN_SOURCES
            .iter()
            .map(|s| (s.name.to_string(), toml::Value::Boolean(self.is_enabled(s.name))))
            .collect();
        Ok(toml::to_string_pretty(&ConfigFile { sources })?)
    }

    /// Writes the config next to `path` and renames it into place.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |err| ConfigError::Io {
            path: path.to_path_buf(),
            err,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = self.to_toml_string()?;
        let tmp = path.with_extension("toml.tmp");
        std::fs::write(&tmp, text).map_err(io_err)?;
        std::fs::rename(&tmp, path).map_err(io_err)?;
        Ok(())
    }

    pub fn set_config_option(&mut self, name: &str, value: bool) -> Result<(), ConfigError> {
        let known =
            find_known_source(name).ok_or_else(|| ConfigError::UnknownSource(name.to_string()))?;
        self.enabled.insert(known.name.to_string(), value);
        Ok(())
    }

    #[must_use]
    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled.get(name).copied().unwrap_or(false)
    }

    /// Enabled sources in display order.
    #[must_use]
    pub fn enabled_sources(&self) -> Vec<String> {
        KNOWN_SOURCES
            .iter()
            .filter(|s| self.is_enabled(s.name))
            .map(|s| s.name.to_string())
            .collect()
    }

    /// `(name, enabled)` for every known source.
    #[must_use]
    pub fn flags(&self) -> Vec<(&'static str, bool)> {
        KNOWN_SOURCES
            .iter()
            .map(|s| (s.name, self.is_enabled(s.name)))
            .collect()
    }
}
