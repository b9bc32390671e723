//! Loading variable files.
//!
//! Variables are read from YAML (`.yaml`, `.yml`) or JSON (`.json`) files.
//! Each file must hold a mapping; several files merge by top-level name,
//! later files winning.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::liquid::Variables;
use crate::liquid::value::NotAMapping;

#[derive(thiserror::Error, Debug)]
pub enum VariablesError {
    #[error("failed to read variables file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unsupported variables file {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(PathBuf),

    #[error("{path}: {source}")]
    NotAMapping { path: PathBuf, source: NotAMapping },
}

/// Variable file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

impl Format {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

/// Parse variables from text in the format implied by `path`.
pub fn parse(path: &Path, content: &str) -> Result<Variables, VariablesError> {
    let format =
        Format::from_path(path).ok_or_else(|| VariablesError::UnsupportedFormat(path.into()))?;

    let not_a_mapping = |source| VariablesError::NotAMapping {
        path: path.into(),
        source,
    };

    match format {
        Format::Yaml => {
            let value: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|source| VariablesError::Yaml {
                    path: path.into(),
                    source,
                })?;
            Variables::try_from(value).map_err(not_a_mapping)
        }
        Format::Json => {
            let value: serde_json::Value =
                serde_json::from_str(content).map_err(|source| VariablesError::Json {
                    path: path.into(),
                    source,
                })?;
            Variables::try_from(value).map_err(not_a_mapping)
        }
    }
}

/// Read and parse one variables file.
pub async fn load_file(path: &Path) -> Result<Variables, VariablesError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| VariablesError::Read {
            path: path.into(),
            source,
        })?;
    let variables = parse(path, &content)?;
    debug!(path = %path.display(), count = variables.len(), "loaded variables");
    Ok(variables)
}

/// Load and merge variables files in order.
pub async fn load_all(paths: &[PathBuf]) -> Result<Variables, VariablesError> {
    let mut variables = Variables::new();
    for path in paths {
        variables.merge(load_file(path).await?);
    }
    Ok(variables)
}
