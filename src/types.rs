//! Core types for RAML to JSON Schema conversion.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

/// Prefix the RAML parser puts on its vendor extension keywords.
pub const X_AMF_PREFIX: &str = "x-amf-";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Target JSON Schema draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Draft {
    #[default]
    #[serde(rename = "04")]
    Draft04,
    #[serde(rename = "06")]
    Draft06,
    #[serde(rename = "07")]
    Draft07,
}

impl Draft {
    /// Parse a draft selector (`"04"`, `"06"` or `"07"`).
    ///
    /// Returns `None` for anything else (caller should error).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "04" => Some(Draft::Draft04),
            "06" => Some(Draft::Draft06),
            "07" => Some(Draft::Draft07),
            _ => None,
        }
    }

    /// The selector string for this draft.
    pub fn as_str(&self) -> &'static str {
        match self {
            Draft::Draft04 => "04",
            Draft::Draft06 => "06",
            Draft::Draft07 => "07",
        }
    }

    /// Canonical meta-schema URI, as written into `$schema`.
    pub fn meta_schema_uri(&self) -> &'static str {
        match self {
            Draft::Draft04 => "http://json-schema.org/draft-04/schema#",
            Draft::Draft06 => "http://json-schema.org/draft-06/schema#",
            Draft::Draft07 => "http://json-schema.org/draft-07/schema#",
        }
    }

    /// Look up the draft a `$schema` URI refers to.
    ///
    /// Accepts `http` and `https` and an optional trailing `#`.
    pub fn from_meta_schema_uri(uri: &str) -> Option<Self> {
        let normalized = uri.trim_end_matches('#');
        let normalized = normalized
            .strip_prefix("https://")
            .or_else(|| normalized.strip_prefix("http://"))?;
        match normalized {
            "json-schema.org/draft-04/schema" => Some(Draft::Draft04),
            "json-schema.org/draft-06/schema" => Some(Draft::Draft06),
            "json-schema.org/draft-07/schema" => Some(Draft::Draft07),
            _ => None,
        }
    }
}

impl fmt::Display for Draft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for a single conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Draft the output schema is migrated to.
    pub draft: Draft,
    /// Validate the output against its meta-schema before returning it.
    pub validate: bool,
    /// Directory the wrapped document is parsed from, so relative
    /// `!include` references in the RAML resolve.
    pub base_path: Option<PathBuf>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::new(Draft::default())
    }
}

impl ConvertOptions {
    /// Create options targeting `draft`, with validation enabled.
    pub fn new(draft: Draft) -> Self {
        Self {
            draft,
            validate: true,
            base_path: None,
        }
    }

    /// Enable or disable meta-schema validation of the result.
    pub fn validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// Set the directory used to resolve `!include` references.
    pub fn base_path(mut self, base_path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn draft_parse_valid() {
        assert_eq!(Draft::parse("04"), Some(Draft::Draft04));
        assert_eq!(Draft::parse("06"), Some(Draft::Draft06));
        assert_eq!(Draft::parse("07"), Some(Draft::Draft07));
    }

    #[test]
    fn draft_parse_invalid() {
        assert_eq!(Draft::parse("123"), None);
        assert_eq!(Draft::parse("4"), None);
        assert_eq!(Draft::parse("2020-12"), None);
        assert_eq!(Draft::parse(""), None);
    }

    #[test]
    fn draft_display_round_trips_selector() {
        for draft in [Draft::Draft04, Draft::Draft06, Draft::Draft07] {
            assert_eq!(Draft::parse(&draft.to_string()), Some(draft));
        }
    }

    #[test]
    fn meta_schema_uri_lookup_is_lenient() {
        assert_eq!(
            Draft::from_meta_schema_uri("http://json-schema.org/draft-04/schema"),
            Some(Draft::Draft04)
        );
        assert_eq!(
            Draft::from_meta_schema_uri("http://json-schema.org/draft-06/schema#"),
            Some(Draft::Draft06)
        );
        assert_eq!(
            Draft::from_meta_schema_uri("https://json-schema.org/draft-07/schema#"),
            Some(Draft::Draft07)
        );
        assert_eq!(
            Draft::from_meta_schema_uri("http://json-schema.org/draft-03/schema"),
            None
        );
        assert_eq!(
            Draft::from_meta_schema_uri("https://json-schema.org/draft/2020-12/schema"),
            None
        );
    }

    #[test]
    fn meta_schema_uri_matches_lookup() {
        for draft in [Draft::Draft04, Draft::Draft06, Draft::Draft07] {
            assert_eq!(Draft::from_meta_schema_uri(draft.meta_schema_uri()), Some(draft));
        }
    }

    #[test]
    fn convert_options_defaults() {
        let opts = ConvertOptions::default();
        assert_eq!(opts.draft, Draft::Draft04);
        assert!(opts.validate);
        assert!(opts.base_path.is_none());

        let opts = ConvertOptions::new(Draft::Draft07)
            .validate(false)
            .base_path("raml");
        assert_eq!(opts.draft, Draft::Draft07);
        assert!(!opts.validate);
        assert_eq!(opts.base_path, Some(PathBuf::from("raml")));
    }

    #[test]
    fn json_type_names() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!([1])), "array");
        assert_eq!(json_type_name(&json!({})), "object");
    }
}
