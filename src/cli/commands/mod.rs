//! CLI command implementations

pub mod generate;
pub mod validate;

use crate::cli::error::CliError;
use crate::import::{ImportError, SQLImporter, SchemaFileImporter, SchemaFormat};
use crate::models::SourceSchema;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Source schema input format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Yaml,
    Json,
    Sql,
}

impl InputFormat {
    /// Format implied by the file extension (`.sql`, `.json`, `.yaml`/`.yml`)
    pub fn from_path(path: &Path) -> Option<Self> {
        if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("sql"))
        {
            return Some(InputFormat::Sql);
        }
        SchemaFormat::from_path(path).map(|format| match format {
            SchemaFormat::Yaml => InputFormat::Yaml,
            SchemaFormat::Json => InputFormat::Json,
        })
    }
}

/// Options shared by every command that reads a source schema
#[derive(Debug, Clone)]
pub struct InputArgs {
    pub input: PathBuf,
    /// Explicit format; otherwise taken from the extension, then the content
    pub format: Option<InputFormat>,
    /// SQL dialect for DDL input
    pub dialect: String,
}

/// Load the source schema named by `args`.
///
/// Recoverable import problems are logged. An import that yields no entities and
/// reports errors fails with the first error.
pub fn load_schema(args: &InputArgs) -> Result<SourceSchema, CliError> {
    if !args.input.exists() {
        return Err(CliError::FileNotFound(args.input.clone()));
    }

    let format = args.format.or_else(|| InputFormat::from_path(&args.input));
    let result = match format {
        Some(InputFormat::Sql) => {
            let sql = std::fs::read_to_string(&args.input)
                .map_err(|e| CliError::FileReadError(args.input.clone(), e.to_string()))?;
            SQLImporter::new(&args.dialect)
                .parse(&sql)
                .map_err(|e| ImportError::ParseError(e.to_string()))?
        }
        Some(InputFormat::Yaml) => {
            SchemaFileImporter::with_format(SchemaFormat::Yaml).import_file(&args.input)?
        }
        Some(InputFormat::Json) => {
            SchemaFileImporter::with_format(SchemaFormat::Json).import_file(&args.input)?
        }
        None => SchemaFileImporter::new().import_file(&args.input)?,
    };

    if result.schema.is_empty()
        && let Some(error) = result.errors.first()
    {
        return Err(CliError::ImportError(error.clone()));
    }
    for error in &result.errors {
        warn!("{}: {}", args.input.display(), error);
    }
    Ok(result.schema)
}
