//! Loading RAML documents and JSON schemas from files.

use std::path::Path;

use serde_json::Value;

use crate::error::ConvertError;

/// Load RAML text from a file.
///
/// # Errors
///
/// Returns `ConvertError::FileNotFound` if the file doesn't exist,
/// or `ConvertError::ReadError` if it can't be read as UTF-8 text.
pub fn load_raml(path: &Path) -> Result<String, ConvertError> {
    read_text(path)
}

/// Load a JSON schema from a file.
///
/// # Errors
///
/// Returns `ConvertError::FileNotFound` if the file doesn't exist,
/// or `ConvertError::InvalidJson` if the file isn't valid JSON.
pub fn load_schema(path: &Path) -> Result<Value, ConvertError> {
    let content = read_text(path)?;
    load_schema_str(&content)
}

/// Load a JSON schema from a string.
///
/// # Errors
///
/// Returns `ConvertError::InvalidJson` if the string isn't valid JSON.
pub fn load_schema_str(content: &str) -> Result<Value, ConvertError> {
    serde_json::from_str(content).map_err(|source| ConvertError::InvalidJson { source })
}

fn read_text(path: &Path) -> Result<String, ConvertError> {
    if !path.exists() {
        return Err(ConvertError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    std::fs::read_to_string(path).map_err(|source| ConvertError::ReadError {
        path: path.to_path_buf(),
        source,
    })
}
