use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing required field: {0}")]
    MissingField(String),
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("duplicate element id: {0}")]
    DuplicateId(String),

    #[error("{relationship} refers to unknown element `{key}`")]
    UnknownReference {
        relationship: &'static str,
        key: String,
    },

    #[error("{relationship} reference `{key}` matches several elements; give them explicit ids")]
    AmbiguousReference {
        relationship: &'static str,
        key: String,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },
}

/// Host file-system failures. User cancellation is reported through
/// [`crate::Outcome::Cancelled`], never here.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to clear directory {path}: {source}")]
    ClearDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GenerateError {
    pub fn path(&self) -> &PathBuf {
        match self {
            GenerateError::CreateDirectory { path, .. }
            | GenerateError::ClearDirectory { path, .. }
            | GenerateError::WriteFile { path, .. } => path,
        }
    }
}
