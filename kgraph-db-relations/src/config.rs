//! Configuration for the relation layer.
//!
//! Settings live under the `[relations]` section of a TOML (or JSON) config
//! file. Every file field is `Option`; anything left out falls back to the
//! defaults below. IRIs may be written compactly with a well-known prefix
//! (`kg:name`, `rdfs:label`).
//!
//! ```toml
//! [relations]
//! max_page_size = 50
//! default_page_size = 10
//! search_properties = ["kg:name", "rdfs:label"]
//! ```

use kgraph_vocab::{kg, prefixes, rdfs};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_MAX_PAGE_SIZE: usize = 100;
pub const DEFAULT_PAGE_SIZE: usize = 20;

// ---------------------------------------------------------------------------
// File config serde types (all Option, absence means "not set in file")
// ---------------------------------------------------------------------------

/// Top-level config file structure. Sections other than `[relations]` are
/// tolerated and ignored.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct KgraphFileConfig {
    /// `[relations]`
    #[serde(default)]
    pub relations: Option<RelationsFileConfig>,
}

/// The `[relations]` section
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct RelationsFileConfig {
    pub max_page_size: Option<usize>,
    pub default_page_size: Option<usize>,
    pub search_properties: Option<Vec<String>>,
    pub edge_class: Option<String>,
}

// ---------------------------------------------------------------------------
// Resolved config
// ---------------------------------------------------------------------------

/// Resolved relation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationsConfig {
    /// Largest accepted `pageSize`
    pub max_page_size: usize,
    /// Page size used when a filter gives none
    pub default_page_size: usize,
    /// Literal properties matched by `searchText`
    pub search_properties: Vec<String>,
    /// Type hint for edge documents that carry no type
    pub edge_class: String,
}

impl Default for RelationsConfig {
    fn default() -> Self {
        Self {
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            default_page_size: DEFAULT_PAGE_SIZE,
            search_properties: vec![
                kg::NAME.to_string(),
                kg::DESCRIPTION.to_string(),
                rdfs::LABEL.to_string(),
            ],
            edge_class: kg::EDGE.to_string(),
        }
    }
}

impl RelationsConfig {
    /// Apply a `[relations]` section over the defaults.
    pub fn from_file_config(file: &RelationsFileConfig) -> Result<Self, ConfigFileError> {
        let mut config = Self::default();
        if let Some(max) = file.max_page_size {
            config.max_page_size = max;
        }
        if let Some(size) = file.default_page_size {
            config.default_page_size = size;
        }
        if let Some(ref props) = file.search_properties {
            config.search_properties = props.iter().map(|p| expand_well_known(p)).collect();
        }
        if let Some(ref class) = file.edge_class {
            config.edge_class = expand_well_known(class);
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document and resolve its `[relations]` section.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigFileError> {
        let file: KgraphFileConfig =
            toml::from_str(content).map_err(|e| ConfigFileError::Parse {
                path: PathBuf::from("<string>"),
                detail: e.to_string(),
            })?;
        Self::from_file_config(&file.relations.unwrap_or_default())
    }

    /// Load and resolve the `[relations]` section of a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let file = load_config(path)?;
        let config = Self::from_file_config(&file.relations.unwrap_or_default())?;
        debug!(
            path = %path.display(),
            max_page_size = config.max_page_size,
            default_page_size = config.default_page_size,
            "loaded relations config"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigFileError> {
        if self.max_page_size == 0 {
            return Err(ConfigFileError::InvalidValue(
                "max_page_size must be at least 1".to_string(),
            ));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ConfigFileError::InvalidValue(format!(
                "default_page_size must be between 1 and {} (got {})",
                self.max_page_size, self.default_page_size
            )));
        }
        if self.edge_class.trim().is_empty() {
            return Err(ConfigFileError::InvalidValue(
                "edge_class must not be empty".to_string(),
            ));
        }
        if let Some(bad) = self.search_properties.iter().find(|p| !p.contains(':')) {
            return Err(ConfigFileError::InvalidValue(format!(
                "search property '{}' is not an IRI",
                bad
            )));
        }
        Ok(())
    }
}

/// Expand `prefix:local` when the prefix is one of the well-known ones.
fn expand_well_known(iri: &str) -> String {
    iri.split_once(':')
        .and_then(|(prefix, local)| {
            prefixes::WELL_KNOWN
                .iter()
                .find(|(p, _)| *p == prefix)
                .map(|(_, ns)| format!("{}{}", ns, local))
        })
        .unwrap_or_else(|| iri.to_string())
}

// ---------------------------------------------------------------------------
// Config file loading
// ---------------------------------------------------------------------------

/// Load a config file from the given path. Detects format by extension:
/// `.json` → JSON, everything else → TOML.
pub fn load_config(path: &Path) -> Result<KgraphFileConfig, ConfigFileError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigFileError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    if content.trim().is_empty() {
        return Ok(KgraphFileConfig::default());
    }

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&content).map_err(|e| ConfigFileError::Parse {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    } else {
        toml::from_str(&content).map_err(|e| ConfigFileError::Parse {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {detail}")]
    Parse { path: PathBuf, detail: String },
    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}
