//! Model catalog loading from files, strings, and HTTP URLs.
//!
//! A catalog document is either an array of model definitions or an object
//! with a `models` array:
//!
//! ```json
//! { "models": [ { "name": "User", "fields": [ { "name": "id", "type": "integer" } ] } ] }
//! ```

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::LoadError;
use crate::model::{ModelCatalog, ModelDefinition};
use crate::types::json_type_name;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a model catalog from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// `LoadError::InvalidJson` if it isn't a valid catalog, or
/// `LoadError::DuplicateModel` if a model name repeats.
pub fn load_catalog(path: &Path) -> Result<ModelCatalog, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    let catalog = load_catalog_str(&content)?;
    debug!(path = %path.display(), models = catalog.len(), "loaded model catalog");
    Ok(catalog)
}

/// Load a model catalog from a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't valid JSON or a
/// model is malformed.
pub fn load_catalog_str(content: &str) -> Result<ModelCatalog, LoadError> {
    let value: Value =
        serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })?;
    catalog_from_value(value)
}

/// Build a model catalog from an already-parsed JSON document.
pub fn catalog_from_value(value: Value) -> Result<ModelCatalog, LoadError> {
    let models = match value {
        Value::Object(mut map) => match map.remove("models") {
            Some(models @ Value::Array(_)) => models,
            Some(other) => {
                return Err(LoadError::InvalidCatalog {
                    actual: json_type_name(&other).to_string(),
                })
            }
            None => {
                return Err(LoadError::InvalidCatalog {
                    actual: "object without models".to_string(),
                })
            }
        },
        models @ Value::Array(_) => models,
        other => {
            return Err(LoadError::InvalidCatalog {
                actual: json_type_name(&other).to_string(),
            })
        }
    };

    let models: Vec<ModelDefinition> =
        serde_json::from_value(models).map_err(|source| LoadError::InvalidJson { source })?;
    ModelCatalog::from_models(models)
}

/// Load a model catalog from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `LoadError::NetworkError` if the request fails, or the errors of
/// [`catalog_from_value`] if the body isn't a valid catalog.
#[cfg(feature = "remote")]
pub fn load_catalog_url(url: &str) -> Result<ModelCatalog, LoadError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|source| LoadError::NetworkError {
            url: url.to_string(),
            source,
        })?;

    let response = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .map_err(|source| LoadError::NetworkError {
            url: url.to_string(),
            source,
        })?;

    let value: Value = response.json().map_err(|source| LoadError::NetworkError {
        url: url.to_string(),
        source,
    })?;

    let catalog = catalog_from_value(value)?;
    debug!(url, models = catalog.len(), "fetched model catalog");
    Ok(catalog)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load a catalog from a file path or, with the `remote` feature, a URL.
pub fn load_catalog_auto(source: &str) -> Result<ModelCatalog, LoadError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_catalog_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(LoadError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_catalog(Path::new(source))
    }
}
