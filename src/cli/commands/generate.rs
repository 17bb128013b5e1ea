//! Generate command implementation

use super::{InputArgs, load_schema};
use crate::cli::error::CliError;
use crate::config::GeneratorConfig;
use crate::convert::SchemaGenerator;
use crate::export::{DjangoExporter, ExportResult, JsonExporter, YamlExporter};
use std::path::{Path, PathBuf};
use tracing::info;

/// Output target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFormat {
    Django,
    Json,
    Yaml,
}

/// Arguments for the generate command
#[derive(Debug, Clone)]
pub struct GenerateArgs {
    pub input: InputArgs,
    pub target: TargetFormat,
    /// Output file; stdout when absent
    pub output: Option<PathBuf>,
    /// Config file; `.schema-bridge.toml` in the current directory when absent
    pub config: Option<PathBuf>,
    /// `(table, entity)` names registered before generation
    pub entities: Vec<(String, String)>,
    /// Overwrite an existing output file
    pub force: bool,
}

/// Parse a `TABLE=NAME` entity mapping
pub fn parse_entity_mapping(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((table, entity)) if !table.trim().is_empty() && !entity.trim().is_empty() => {
            Ok((table.trim().to_string(), entity.trim().to_string()))
        }
        _ => Err(format!("expected TABLE=NAME, got '{}'", value)),
    }
}

fn load_config(path: Option<&Path>) -> Result<GeneratorConfig, CliError> {
    let config = match path {
        Some(path) if !path.exists() => return Err(CliError::FileNotFound(path.to_path_buf())),
        Some(path) => GeneratorConfig::load_file(path)?,
        None => GeneratorConfig::load(Path::new("."))?,
    };
    Ok(config)
}

/// Import, convert and export, returning the rendered output.
pub fn run_generate(args: &GenerateArgs) -> Result<ExportResult, CliError> {
    let config = load_config(args.config.as_deref())?;
    let schema = load_schema(&args.input)?;

    let mut generator = SchemaGenerator::from_config(&config);
    for (table, entity) in &args.entities {
        generator.register(table, entity);
    }
    let definitions = generator.generate_all(&schema.entities)?;

    let skipped: usize = definitions.iter().map(|d| d.skipped.len()).sum();
    info!(
        "Generated {} entities ({} skipped fields)",
        definitions.len(),
        skipped
    );

    let result = match args.target {
        TargetFormat::Django => DjangoExporter::new(config.export.managed).export(&definitions)?,
        TargetFormat::Json => JsonExporter.export(&definitions)?,
        TargetFormat::Yaml => YamlExporter.export(&definitions)?,
    };
    Ok(result)
}

/// Handle the generate command
pub fn handle_generate(args: &GenerateArgs) -> Result<(), CliError> {
    if let Some(output) = &args.output
        && output.exists()
        && !args.force
    {
        return Err(CliError::OutputExists(output.clone()));
    }

    let result = run_generate(args)?;

    match &args.output {
        Some(output) => {
            std::fs::write(output, &result.content)
                .map_err(|e| CliError::FileWriteError(output.clone(), e.to_string()))?;
            println!("Wrote {} output to {}", result.format, output.display());
        }
        None => print!("{}", result.content),
    }
    Ok(())
}
