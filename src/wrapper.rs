//! Wraps a RAML type library into a minimal API document.
//!
//! The RAML parser only emits JSON Schema for types reachable from an
//! operation body, so the library is turned into an API with a single
//! `GET /for/conversion/<Type>` whose `200` response body is the type.

use crate::error::ConvertError;

/// Header of the RAML library documents accepted as input.
pub const RAML_LIBRARY_TAG: &str = "#%RAML 1.0 Library";

/// Header of the wrapped API document.
pub const RAML_API_TAG: &str = "#%RAML 1.0";

const CONVERSION_ROOT: &str = "/for/conversion";

/// Path of the synthetic endpoint that returns `type_name`.
pub fn conversion_endpoint(type_name: &str) -> String {
    format!("{}/{}", CONVERSION_ROOT, type_name)
}

/// Turn a RAML library into an API document exposing `type_name`.
///
/// The library tag on the first line (ignoring trailing whitespace, as
/// [`check_raml_header`] does) is rewritten to the API tag and a
/// resource returning `type_name` as `application/json` is appended. Text
/// whose first line is not the library tag is kept as-is. Nothing is parsed
/// and `type_name` is not checked against the declared types.
pub fn patch_raml_data(raml: &str, type_name: &str) -> String {
    let (first_line, rest) = match raml.split_once('\n') {
        Some((first, rest)) => (first, Some(rest)),
        None => (raml, None),
    };

    let mut patched = String::with_capacity(raml.len() + 160);
    if first_line.trim_end() == RAML_LIBRARY_TAG {
        patched.push_str(RAML_API_TAG);
        if first_line.ends_with('\r') {
            patched.push('\r');
        }
    } else {
        patched.push_str(first_line);
    }
    if let Some(rest) = rest {
        patched.push('\n');
        patched.push_str(rest);
    }

    let trimmed_len = patched.trim_end_matches(['\r', '\n']).len();
    patched.truncate(trimmed_len);

    patched.push_str("\n\n");
    patched.push_str(&conversion_resource(type_name));
    patched
}

/// Check that `raml` starts with a RAML 1.0 library or API header.
///
/// # Errors
///
/// Returns `ConvertError::InvalidHeader` with the offending first line.
pub fn check_raml_header(raml: &str) -> Result<(), ConvertError> {
    let first_line = raml.lines().next().unwrap_or("").trim_end();
    if first_line == RAML_LIBRARY_TAG || first_line == RAML_API_TAG {
        Ok(())
    } else {
        Err(ConvertError::InvalidHeader {
            found: first_line.to_string(),
        })
    }
}

fn conversion_resource(type_name: &str) -> String {
    format!(
        "{endpoint}:\n  get:\n    responses:\n      200:\n        body:\n          application/json:\n            type: {type_name}",
        endpoint = conversion_endpoint(type_name),
    )
}
