//! Validate command implementation

use super::{InputArgs, load_schema};
use crate::cli::error::CliError;
use crate::validation::{SchemaValidationResult, SchemaValidator};

/// Load and lint the source schema
pub fn run_validate(args: &InputArgs) -> Result<SchemaValidationResult, CliError> {
    let schema = load_schema(args)?;
    Ok(SchemaValidator::new().validate(&schema))
}

/// Handle the validate command
///
/// Every issue is printed. Warnings fail the command as well as errors.
pub fn handle_validate(args: &InputArgs) -> Result<(), CliError> {
    let result = run_validate(args)?;

    for issue in &result.errors {
        eprintln!("error: {}", issue);
    }
    for issue in &result.warnings {
        eprintln!("warning: {}", issue);
    }

    if !result.is_clean() {
        return Err(CliError::ValidationError(format!(
            "{} error(s), {} warning(s) in {}",
            result.errors.len(),
            result.warnings.len(),
            args.input.display()
        )));
    }

    println!("Validation successful");
    Ok(())
}
