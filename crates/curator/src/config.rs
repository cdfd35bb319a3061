use curator_core::template::{PromptTemplate, UnmatchedPlaceholders};
use curator_core::SortPolicy;
use serde::Deserialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings read from `curator.toml`. Every section is optional.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub vault: VaultConfig,
    pub view: ViewConfig,
    pub generation: GenerationConfig,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    pub root: PathBuf,
    /// Vault-relative folders or files to leave out of the scan.
    pub exclude: Vec<String>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            exclude: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub sort: SortPolicy,
    pub group_by_folder: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            sort: SortPolicy::Frequency,
            group_by_folder: true,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Vault-relative folder for new notes; empty means the vault root.
    pub new_note_folder: String,
    pub default_template: Option<String>,
    pub unmatched_placeholders: UnmatchedPlaceholders,
    pub templates: Vec<PromptTemplate>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            new_note_folder: String::new(),
            default_template: None,
            unmatched_placeholders: UnmatchedPlaceholders::Keep,
            templates: vec![PromptTemplate::default_summary()],
        }
    }
}

impl GenerationConfig {
    /// Template by name, else the configured default, else the first one.
    pub fn template(&self, name: Option<&str>) -> Option<&PromptTemplate> {
        match name.or(self.default_template.as_deref()) {
            Some(wanted) => self.templates.iter().find(|t| t.name == wanted),
            None => self.templates.first(),
        }
    }
}

impl Config {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
