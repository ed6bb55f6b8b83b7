//! Conversion pipeline - RAML type to validated JSON Schema.

use serde_json::Value;

use crate::error::ConvertError;
use crate::fixer::fix_schema;
use crate::migrate::migrate;
use crate::parser::RamlParser;
use crate::types::ConvertOptions;
use crate::validator::{default_validator, SchemaValidator};
use crate::wrapper::{check_raml_header, patch_raml_data};

/// Convert the RAML type `type_name` declared in `raml` to JSON Schema.
///
/// Uses the default validation engine when `options.validate` is set.
///
/// # Errors
///
/// See [`convert_with`].
pub fn convert(
    raml: &str,
    type_name: &str,
    parser: &dyn RamlParser,
    options: &ConvertOptions,
) -> Result<Value, ConvertError> {
    let validator = default_validator();
    convert_with(raml, type_name, parser, validator.as_ref(), options)
}

/// Convert the RAML type `type_name` declared in `raml` to JSON Schema,
/// validating with `validator`.
///
/// The library is wrapped into an API document, handed to `parser`, fixed
/// up, migrated to `options.draft`, and validated against its meta-schema.
/// The first failing stage aborts the conversion.
///
/// # Errors
///
/// - `ConvertError::InvalidHeader` if `raml` is not a RAML 1.0 library
/// - `ConvertError::Parse` with the parser's error, unchanged
/// - `ConvertError::Validate` if the result fails validation or
///   validation cannot run
pub fn convert_with(
    raml: &str,
    type_name: &str,
    parser: &dyn RamlParser,
    validator: &dyn SchemaValidator,
    options: &ConvertOptions,
) -> Result<Value, ConvertError> {
    check_raml_header(raml)?;
    let document = patch_raml_data(raml, type_name);
    tracing::debug!(type_name, "wrapped RAML library for conversion");

    let raw = parser.parse(&document, type_name, options.base_path.as_deref())?;
    tracing::debug!(type_name, "parsed RAML into raw schema");

    let fixed = fix_schema(raw);
    let schema = migrate(fixed, options.draft);
    tracing::debug!(type_name, draft = %options.draft, "migrated schema");

    if options.validate {
        validator.validate(&schema)?;
    }

    Ok(schema)
}
