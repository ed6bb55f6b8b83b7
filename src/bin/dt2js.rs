//! dt2js CLI
//!
//! Command-line interface for converting RAML data types to JSON Schema.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dt2js::{
    convert, declared_draft, fix_schema, load_raml, load_schema, migrate, patch_raml_data,
    validate_json_schema, CommandParser, ConvertError, ConvertOptions, Draft, ValidateError,
};
use serde::Serialize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dt2js")]
#[command(about = "Convert RAML data types to JSON Schema")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a RAML type to JSON Schema
    Convert {
        /// RAML 1.0 library file declaring the type
        raml: PathBuf,

        /// Name of the type to convert
        type_name: String,

        /// Target JSON Schema draft: 04, 06 or 07
        #[arg(long, short, default_value = "04")]
        draft: String,

        /// RAML parser program; receives the wrapped document path and type name
        #[arg(long, env = "DT2JS_PARSER")]
        parser: String,

        /// Extra argument passed to the parser before the document path
        #[arg(long = "parser-arg", allow_hyphen_values = true)]
        parser_args: Vec<String>,

        /// Skip meta-schema validation of the result
        #[arg(long)]
        no_validate: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the RAML API document handed to the parser
    Wrap {
        /// RAML 1.0 library file declaring the type
        raml: PathBuf,

        /// Name of the type to expose
        type_name: String,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Apply the structural fix-ups to a raw parser schema
    Fix {
        /// JSON Schema file produced by the RAML parser
        schema: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Migrate a draft-04 schema to another draft
    Migrate {
        /// Draft-04 JSON Schema file
        schema: PathBuf,

        /// Target JSON Schema draft: 04, 06 or 07
        #[arg(long, short)]
        draft: String,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a schema against the meta-schema named by its $schema
    Validate {
        /// JSON Schema file to validate
        schema: PathBuf,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            raml,
            type_name,
            draft,
            parser,
            parser_args,
            no_validate,
            output,
            pretty,
        } => run_convert(ConvertArgs {
            raml,
            type_name,
            draft,
            parser,
            parser_args,
            validate: !no_validate,
            output,
            pretty,
        }),

        Commands::Wrap {
            raml,
            type_name,
            output,
        } => run_wrap(&raml, &type_name, output),

        Commands::Fix {
            schema,
            output,
            pretty,
        } => run_fix(&schema, output, pretty),

        Commands::Migrate {
            schema,
            draft,
            output,
            pretty,
        } => run_migrate(&schema, &draft, output, pretty),

        Commands::Validate { schema, json } => run_validate(&schema, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

struct ConvertArgs {
    raml: PathBuf,
    type_name: String,
    draft: String,
    parser: String,
    parser_args: Vec<String>,
    validate: bool,
    output: Option<PathBuf>,
    pretty: bool,
}

fn run_convert(args: ConvertArgs) -> Result<(), u8> {
    let ConvertArgs {
        raml: raml_path,
        type_name,
        draft,
        parser,
        parser_args,
        validate,
        output,
        pretty,
    } = args;

    let draft = parse_draft(&draft)?;
    let raml = load_raml(&raml_path).map_err(fail)?;

    // Relative !includes resolve against the library's directory
    let base_path = raml_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let parser = CommandParser::new(parser).args(parser_args);
    let options = ConvertOptions::new(draft)
        .validate(validate)
        .base_path(base_path);

    let schema = convert(&raml, &type_name, &parser, &options).map_err(fail)?;
    write_json(&schema, pretty, output)
}

fn run_wrap(raml_path: &Path, type_name: &str, output: Option<PathBuf>) -> Result<(), u8> {
    let raml = load_raml(raml_path).map_err(fail)?;
    write_output(&patch_raml_data(&raml, type_name), output)
}

fn run_fix(schema_path: &Path, output: Option<PathBuf>, pretty: bool) -> Result<(), u8> {
    let schema = load_schema(schema_path).map_err(fail)?;
    write_json(&fix_schema(schema), pretty, output)
}

fn run_migrate(
    schema_path: &Path,
    draft: &str,
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<(), u8> {
    let draft = parse_draft(draft)?;
    let schema = load_schema(schema_path).map_err(fail)?;
    write_json(&migrate(schema, draft), pretty, output)
}

/// Machine-readable result of `dt2js validate --json`.
#[derive(Serialize)]
struct ValidationReport {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    draft: Option<Draft>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn run_validate(schema_path: &Path, json_output: bool) -> Result<(), u8> {
    let schema = load_schema(schema_path).map_err(|e| {
        report_error(json_output, &format!("loading schema: {}", e));
        e.exit_code() as u8
    })?;

    match validate_json_schema(&schema) {
        Ok(()) => {
            if json_output {
                print_report(&ValidationReport {
                    valid: true,
                    draft: declared_draft(&schema).ok(),
                    path: None,
                    error: None,
                });
            } else {
                println!("Valid");
            }
            Ok(())
        }
        Err(e) => {
            let path = match &e {
                ValidateError::Invalid { path, .. } => Some(path.clone()),
                _ => None,
            };
            if json_output {
                print_report(&ValidationReport {
                    valid: false,
                    draft: declared_draft(&schema).ok(),
                    path,
                    error: Some(e.to_string()),
                });
            } else {
                eprintln!("{}", e);
            }
            Err(e.exit_code() as u8)
        }
    }
}

fn parse_draft(draft: &str) -> Result<Draft, u8> {
    Draft::parse(draft).ok_or_else(|| {
        fail(ConvertError::InvalidDraft {
            draft: draft.to_string(),
        })
    })
}

fn fail(e: ConvertError) -> u8 {
    eprintln!("Error: {}", e);
    e.exit_code() as u8
}

fn print_report(report: &ValidationReport) {
    match serde_json::to_string(report) {
        Ok(line) => println!("{}", line),
        Err(e) => eprintln!("Error serializing report: {}", e),
    }
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        print_report(&ValidationReport {
            valid: false,
            draft: None,
            path: None,
            error: Some(msg.to_string()),
        });
    } else {
        eprintln!("Error: {}", msg);
    }
}

fn write_json(value: &Value, pretty: bool, output: Option<PathBuf>) -> Result<(), u8> {
    let json_output = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    write_output(&json_output, output)
}

fn write_output(content: &str, output: Option<PathBuf>) -> Result<(), u8> {
    match output {
        Some(path) => {
            std::fs::write(&path, content).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", content);
        }
    }

    Ok(())
}
