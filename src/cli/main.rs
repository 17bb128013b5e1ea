//! CLI binary entry point for schema-bridge-cli

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use schema_bridge::cli::commands::generate::{
    GenerateArgs, TargetFormat, handle_generate, parse_entity_mapping,
};
#[cfg(feature = "cli")]
use schema_bridge::cli::commands::validate::handle_validate;
#[cfg(feature = "cli")]
use schema_bridge::cli::commands::{InputArgs, InputFormat};
#[cfg(feature = "cli")]
use schema_bridge::cli::logging::{DEFAULT_LOG_LEVEL, init_tracing};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "schema-bridge-cli")]
#[command(about = "Translate source ORM schema metadata into target entity definitions")]
#[command(version)]
struct Cli {
    /// Log level when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Generate target entity definitions from a source schema
    Generate {
        /// Source schema file (YAML, JSON or SQL DDL)
        input: PathBuf,
        /// Input format (default: from the file extension, then the content)
        #[arg(long, value_enum)]
        input_format: Option<InputFormatArg>,
        /// SQL dialect for DDL input
        #[arg(short, long, default_value = "generic")]
        dialect: String,
        /// Output target
        #[arg(short, long, value_enum, default_value = "django")]
        target: TargetFormatArg,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Configuration file (default: .schema-bridge.toml in the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Register a target entity name for a table (TABLE=NAME, repeatable)
        #[arg(long = "entity", value_parser = parse_entity_mapping)]
        entities: Vec<(String, String)>,
        /// Overwrite existing files without prompting
        #[arg(short, long)]
        force: bool,
    },
    /// Lint a source schema without generating anything
    Validate {
        /// Source schema file (YAML, JSON or SQL DDL)
        input: PathBuf,
        /// Input format (default: from the file extension, then the content)
        #[arg(long, value_enum)]
        input_format: Option<InputFormatArg>,
        /// SQL dialect for DDL input
        #[arg(short, long, default_value = "generic")]
        dialect: String,
    },
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum InputFormatArg {
    /// YAML schema document
    Yaml,
    /// JSON schema document
    Json,
    /// SQL (CREATE TABLE statements)
    Sql,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum TargetFormatArg {
    /// Django models.py
    Django,
    /// JSON entity document
    Json,
    /// YAML entity document
    Yaml,
}

#[cfg(feature = "cli")]
fn convert_input_format(format: InputFormatArg) -> InputFormat {
    match format {
        InputFormatArg::Yaml => InputFormat::Yaml,
        InputFormatArg::Json => InputFormat::Json,
        InputFormatArg::Sql => InputFormat::Sql,
    }
}

#[cfg(feature = "cli")]
fn convert_target_format(format: TargetFormatArg) -> TargetFormat {
    match format {
        TargetFormatArg::Django => TargetFormat::Django,
        TargetFormatArg::Json => TargetFormat::Json,
        TargetFormatArg::Yaml => TargetFormat::Yaml,
    }
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli.log_level) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Generate {
            input,
            input_format,
            dialect,
            target,
            output,
            config,
            entities,
            force,
        } => {
            let args = GenerateArgs {
                input: InputArgs {
                    input,
                    format: input_format.map(convert_input_format),
                    dialect,
                },
                target: convert_target_format(target),
                output,
                config,
                entities,
                force,
            };
            handle_generate(&args)
        }
        Commands::Validate {
            input,
            input_format,
            dialect,
        } => {
            let args = InputArgs {
                input,
                format: input_format.map(convert_input_format),
                dialect,
            };
            handle_validate(&args)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature is not enabled. Build with --features cli");
    std::process::exit(1);
}
