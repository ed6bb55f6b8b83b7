//! Error types for RAML conversion, parsing and schema validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the RAML parser collaborator.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("cannot write wrapped RAML document: {source}")]
    TempFile {
        #[source]
        source: std::io::Error,
    },

    #[error("cannot run RAML parser '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("RAML parser '{program}' failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("RAML parser produced invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("RAML parser output is {actual}, expected a JSON Schema object")]
    NotAnObject { actual: String },
}

impl ParseError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ParseError::TempFile { .. } | ParseError::Spawn { .. } => 3,
            _ => 2,
        }
    }
}

/// Errors during meta-schema validation.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("Invalid JSON Schema: {path} {message}")]
    Invalid { path: String, message: String },

    #[error("no schema with key or ref \"{uri}\"")]
    SchemaNotFound { uri: String },

    #[error("validation requires the jsonschema engine: {reason}")]
    DependencyMissing { reason: String },
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::Invalid { .. } => 1,
            ValidateError::SchemaNotFound { .. } => 2,
            ValidateError::DependencyMissing { .. } => 3,
        }
    }
}

/// Errors during conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Input errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("expected a '#%RAML 1.0 Library' document, found header \"{found}\"")]
    InvalidHeader { found: String },

    #[error("invalid draft \"{draft}\": expected 04, 06 or 07")]
    InvalidDraft { draft: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validate(#[from] ValidateError),
}

impl ConvertError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConvertError::FileNotFound { .. } | ConvertError::ReadError { .. } => 3,
            ConvertError::Parse(e) => e.exit_code(),
            ConvertError::Validate(e) => e.exit_code(),
            _ => 2,
        }
    }
}
