//! Meta-schema validation of converted schemas.
//!
//! Validation is a capability behind [`SchemaValidator`]. The default
//! engine checks a schema against the official meta-schema named by its own
//! `$schema`, using the `jsonschema` crate. When the crate is built without
//! the `validation` feature the engine is unavailable, and validating
//! reports [`ValidateError::DependencyMissing`] instead of silently passing.

#[cfg(feature = "validation")]
use std::sync::OnceLock;

use serde_json::Value;

use crate::error::ValidateError;
use crate::types::Draft;

/// Something that can check a JSON Schema against its meta-schema.
pub trait SchemaValidator {
    /// Validate `schema`, reporting the first violation.
    ///
    /// # Errors
    ///
    /// Returns `ValidateError::Invalid` when the schema breaks its
    /// meta-schema, `ValidateError::SchemaNotFound` for an unknown
    /// `$schema`, and `ValidateError::DependencyMissing` when validation
    /// cannot run at all.
    fn validate(&self, schema: &Value) -> Result<(), ValidateError>;
}

/// Validate `schema` with the default engine.
pub fn validate_json_schema(schema: &Value) -> Result<(), ValidateError> {
    default_validator().validate(schema)
}

/// The engine compiled into this build.
#[cfg(feature = "validation")]
pub fn default_validator() -> Box<dyn SchemaValidator> {
    Box::new(MetaSchemaValidator)
}

/// The engine compiled into this build.
#[cfg(not(feature = "validation"))]
pub fn default_validator() -> Box<dyn SchemaValidator> {
    Box::new(UnavailableValidator::new(
        "dt2js was built without the `validation` feature",
    ))
}

/// Resolve the draft a schema declares through `$schema`.
///
/// Schemas without `$schema` are treated as draft-04.
///
/// # Errors
///
/// Returns `ValidateError::SchemaNotFound` for URIs outside drafts 04/06/07.
pub fn declared_draft(schema: &Value) -> Result<Draft, ValidateError> {
    match schema.get("$schema") {
        None => Ok(Draft::Draft04),
        Some(Value::String(uri)) => {
            Draft::from_meta_schema_uri(uri).ok_or_else(|| ValidateError::SchemaNotFound {
                uri: uri.clone(),
            })
        }
        Some(other) => Err(ValidateError::SchemaNotFound {
            uri: other.to_string(),
        }),
    }
}

/// A validator that always reports the engine as missing.
#[derive(Debug, Clone)]
pub struct UnavailableValidator {
    reason: String,
}

impl UnavailableValidator {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl SchemaValidator for UnavailableValidator {
    fn validate(&self, _schema: &Value) -> Result<(), ValidateError> {
        Err(ValidateError::DependencyMissing {
            reason: self.reason.clone(),
        })
    }
}

/// Validates against the embedded draft-04/06/07 meta-schemas.
#[cfg(feature = "validation")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MetaSchemaValidator;

#[cfg(feature = "validation")]
type MetaEngine = Result<jsonschema::Validator, String>;

#[cfg(feature = "validation")]
impl MetaSchemaValidator {
    /// The compiled meta-schema validator for `draft`, built on first use.
    fn engine(draft: Draft) -> Result<&'static jsonschema::Validator, ValidateError> {
        static DRAFT04: OnceLock<MetaEngine> = OnceLock::new();
        static DRAFT06: OnceLock<MetaEngine> = OnceLock::new();
        static DRAFT07: OnceLock<MetaEngine> = OnceLock::new();

        let (cell, source, engine_draft) = match draft {
            Draft::Draft04 => (&DRAFT04, include_str!("meta/draft-04.json"), jsonschema::Draft::Draft4),
            Draft::Draft06 => (&DRAFT06, include_str!("meta/draft-06.json"), jsonschema::Draft::Draft6),
            Draft::Draft07 => (&DRAFT07, include_str!("meta/draft-07.json"), jsonschema::Draft::Draft7),
        };

        cell.get_or_init(|| build_engine(draft, source, engine_draft))
            .as_ref()
            .map_err(|reason| ValidateError::DependencyMissing {
                reason: reason.clone(),
            })
    }
}

#[cfg(feature = "validation")]
fn build_engine(draft: Draft, source: &str, engine_draft: jsonschema::Draft) -> MetaEngine {
    tracing::debug!(%draft, "compiling meta-schema");
    let meta: Value = serde_json::from_str(source)
        .map_err(|e| format!("embedded draft-{} meta-schema is unreadable: {}", draft, e))?;
    jsonschema::options()
        .with_draft(engine_draft)
        .build(&meta)
        .map_err(|e| e.to_string())
}

#[cfg(feature = "validation")]
impl SchemaValidator for MetaSchemaValidator {
    fn validate(&self, schema: &Value) -> Result<(), ValidateError> {
        let draft = declared_draft(schema)?;
        tracing::debug!(%draft, "validating against meta-schema");

        match Self::engine(draft)?.iter_errors(schema).next() {
            None => Ok(()),
            Some(error) => Err(ValidateError::Invalid {
                path: data_path(&error.instance_path.to_string()),
                message: error.to_string(),
            }),
        }
    }
}

/// Render a JSON Pointer as a `data.a.b` path.
fn data_path(pointer: &str) -> String {
    let mut path = String::from("data");
    for segment in pointer.split('/').skip(1) {
        // Unescape JSON Pointer encoding (~1 = /, ~0 = ~)
        path.push('.');
        path.push_str(&segment.replace("~1", "/").replace("~0", "~"));
    }
    path
}
