//! Error types for model catalog loading and schema generation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors while turning model definitions into schema documents.
///
/// These are definition errors in the surrounding model declarations; a
/// partially generated document is never returned in their place.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("unknown model '{name}'")]
    UnknownModel { name: String },

    #[error("field '{model}.{field}' references undefined model '{target}'")]
    UnresolvedModel {
        model: String,
        field: String,
        target: String,
    },

    #[error("model '{model}' is recursive and cannot be inlined: {}", path.join(" -> "))]
    RecursiveModel { model: String, path: Vec<String> },

    #[error("conflicting schema definitions registered under '{key}'")]
    ConflictingDefinition { key: String },

    #[error("field '{name}' is an object and cannot be used as a query parameter")]
    ObjectQueryParameter { name: String },
}

impl MapError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Errors while loading a model catalog.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Definition errors (exit code 2)
    #[error("invalid model catalog: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model catalog: expected array of models, got {actual}")]
    InvalidCatalog { actual: String },

    #[error("model '{name}' is declared more than once")]
    DuplicateModel { name: String },
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            _ => 2,
        }
    }
}
