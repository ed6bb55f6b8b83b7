//! RAML data type to JSON Schema conversion.
//!
//! Converts a single type declared in a RAML 1.0 library into a JSON Schema
//! targeting draft-04, draft-06 or draft-07, and validates the result
//! against the draft's meta-schema.
//!
//! # Pipeline
//!
//! | Stage | Function | Effect |
//! |-------|----------|--------|
//! | Wrap | [`patch_raml_data`] | Library → API with `GET /for/conversion/<Type>` |
//! | Parse | [`RamlParser::parse`] | External RAML toolchain → raw draft-04 schema |
//! | Fix | [`fix_schema`] | `type: file`, `x-amf-*` keys, `examples` mappings |
//! | Migrate | [`migrate_draft`] | draft-04 → 06 / 07 |
//! | Validate | [`SchemaValidator::validate`] | Meta-schema check |
//!
//! # Example
//!
//! ```
//! use dt2js::{fix_schema, migrate_draft};
//! use serde_json::json;
//!
//! // Raw output of the RAML parser for a `file` type with allowed MIME types
//! let raw = json!({
//!     "$schema": "http://json-schema.org/draft-04/schema#",
//!     "id": "avatar",
//!     "type": "file",
//!     "x-amf-fileTypes": ["image/png"]
//! });
//!
//! let fixed = fix_schema(raw);
//! assert_eq!(fixed["type"], "string");
//! assert_eq!(fixed["media"]["anyOf"][0]["mediaType"], "image/png");
//!
//! let schema = migrate_draft(&fixed, "07").unwrap();
//! assert_eq!(schema["$id"], "avatar");
//! assert_eq!(schema["$schema"], "http://json-schema.org/draft-07/schema#");
//! ```

mod convert;
mod error;
mod fixer;
mod loader;
mod migrate;
mod parser;
mod types;
mod validator;
mod wrapper;

pub use convert::{convert, convert_with};
pub use error::{ConvertError, ParseError, ValidateError};
pub use fixer::{
    fix_file_type_properties, fix_schema, fix_structure_inconsistencies, remove_x_amf_properties,
};
pub use loader::{load_raml, load_schema, load_schema_str};
pub use migrate::{migrate, migrate_draft};
pub use parser::{parse_schema_output, CommandParser, RamlParser};
pub use types::{json_type_name, ConvertOptions, Draft, X_AMF_PREFIX};
pub use validator::{
    declared_draft, default_validator, validate_json_schema, SchemaValidator,
    UnavailableValidator,
};
pub use wrapper::{
    check_raml_header, conversion_endpoint, patch_raml_data, RAML_API_TAG, RAML_LIBRARY_TAG,
};

#[cfg(feature = "validation")]
pub use validator::MetaSchemaValidator;
