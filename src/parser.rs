//! The RAML parser collaborator.
//!
//! Turning RAML into JSON Schema is delegated to an external RAML/AMF
//! toolchain. [`RamlParser`] is the seam; [`CommandParser`] drives an
//! external program.

use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use serde_json::Value;

use crate::error::ParseError;
use crate::types::json_type_name;

/// Produces the raw JSON Schema of a wrapped RAML document.
pub trait RamlParser {
    /// Parse `document` (a wrapped RAML API) and return the draft-04 JSON
    /// Schema of the `200` `application/json` body of
    /// `/for/conversion/<type_name>`.
    ///
    /// `base_path` is the directory relative `!include`s resolve against.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` when the document cannot be parsed.
    fn parse(
        &self,
        document: &str,
        type_name: &str,
        base_path: Option<&Path>,
    ) -> Result<Value, ParseError>;
}

impl<F> RamlParser for F
where
    F: Fn(&str, &str, Option<&Path>) -> Result<Value, ParseError>,
{
    fn parse(
        &self,
        document: &str,
        type_name: &str,
        base_path: Option<&Path>,
    ) -> Result<Value, ParseError> {
        self(document, type_name, base_path)
    }
}

/// Runs an external program to parse RAML.
///
/// The program is invoked as `<program> [args...] <document> <type_name>`,
/// where `<document>` is a temporary `.raml` file holding the wrapped
/// document. It must print the body schema as a JSON object on stdout and
/// exit with status 0.
///
/// The temporary file is created in the base path when one is given, so the
/// document's relative `!include`s resolve. The program runs from the
/// caller's working directory, so relative program paths and arguments
/// resolve as they would in a shell.
#[derive(Debug, Clone)]
pub struct CommandParser {
    program: OsString,
    args: Vec<OsString>,
}

impl CommandParser {
    /// Create a parser running `program` with no extra arguments.
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add arguments passed before the document path.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

impl RamlParser for CommandParser {
    fn parse(
        &self,
        document: &str,
        type_name: &str,
        base_path: Option<&Path>,
    ) -> Result<Value, ParseError> {
        let dir = base_path
            .map(Path::to_path_buf)
            .unwrap_or_else(std::env::temp_dir);

        let mut file = tempfile::Builder::new()
            .prefix("dt2js-")
            .suffix(".raml")
            .tempfile_in(&dir)
            .map_err(|source| ParseError::TempFile { source })?;
        file.write_all(document.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|source| ParseError::TempFile { source })?;

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).stdin(Stdio::null());
        cmd.arg(file.path()).arg(type_name);

        tracing::trace!(program = %self.program_name(), document = %file.path().display(), "running RAML parser");
        let output = cmd.output().map_err(|source| ParseError::Spawn {
            program: self.program_name(),
            source,
        })?;

        if !output.status.success() {
            return Err(ParseError::Failed {
                program: self.program_name(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_schema_output(&output.stdout)
    }
}

/// Parse the parser's stdout into a schema object.
///
/// # Errors
///
/// Returns `ParseError::InvalidJson` for malformed JSON and
/// `ParseError::NotAnObject` for any JSON value that is not an object.
pub fn parse_schema_output(stdout: &[u8]) -> Result<Value, ParseError> {
    let schema: Value =
        serde_json::from_slice(stdout).map_err(|source| ParseError::InvalidJson { source })?;
    if schema.is_object() {
        Ok(schema)
    } else {
        Err(ParseError::NotAnObject {
            actual: json_type_name(&schema).to_string(),
        })
    }
}
