//! Input validation utilities.
//!
//! Identifier checks for the names that flow into generated code: source table names,
//! target entity names and target field names. Generated field names are emitted into
//! the target language verbatim, so they must be valid identifiers there.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length for table names
pub const MAX_TABLE_NAME_LENGTH: usize = 255;

/// Maximum length for identifiers in general
pub const MAX_IDENTIFIER_LENGTH: usize = 255;

/// Maximum length for descriptions
pub const MAX_DESCRIPTION_LENGTH: usize = 10000;

/// Maximum size of a schema file accepted by the importers (10MB)
pub const MAX_SCHEMA_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Errors that can occur during input validation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    /// Input is empty when a value is required
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    /// Input exceeds maximum allowed length
    #[error("{field} exceeds maximum length (max: {max}, got: {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    /// Input contains invalid characters
    #[error("{field} contains invalid characters: {reason}")]
    InvalidCharacters { field: &'static str, reason: String },

    /// Input has invalid format
    #[error("{0}: {1}")]
    InvalidFormat(&'static str, String),

    /// Input is a reserved word
    #[error("{field} cannot be a reserved word: {word}")]
    ReservedWord { field: &'static str, word: String },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn check_length(name: &str, field: &'static str, max: usize) -> ValidationResult<()> {
    if name.is_empty() {
        return Err(ValidationError::Empty(field));
    }
    if name.len() > max {
        return Err(ValidationError::TooLong {
            field,
            max,
            actual: name.len(),
        });
    }
    Ok(())
}

/// Validate an identifier of the target language.
///
/// Letters, digits and underscores, not starting with a digit, not a keyword.
pub fn validate_identifier(name: &str, field: &'static str) -> ValidationResult<()> {
    check_length(name, field, MAX_IDENTIFIER_LENGTH)?;

    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat(
            field,
            "must start with a letter or underscore".to_string(),
        ));
    }

    if let Some(c) = name.chars().find(|c| !c.is_alphanumeric() && *c != '_') {
        return Err(ValidationError::InvalidCharacters {
            field,
            reason: format!("invalid character: '{}'", c),
        });
    }

    if is_reserved_keyword(name) {
        return Err(ValidationError::ReservedWord {
            field,
            word: name.to_string(),
        });
    }

    Ok(())
}

/// Validate a source table name.
///
/// # Rules
///
/// - Must not be empty
/// - Must not exceed 255 characters
/// - Must start with a letter or underscore
/// - May contain letters, digits, underscores, hyphens and dots (schema-qualified names)
///
/// # Examples
///
/// ```
/// use schema_bridge::validation::input::validate_table_name;
///
/// assert!(validate_table_name("cartoparent").is_ok());
/// assert!(validate_table_name("public.parent").is_ok());
/// assert!(validate_table_name("").is_err());
/// assert!(validate_table_name("123_invalid").is_err());
/// ```
pub fn validate_table_name(name: &str) -> ValidationResult<()> {
    check_length(name, "table name", MAX_TABLE_NAME_LENGTH)?;

    if !name.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        return Err(ValidationError::InvalidFormat(
            "table name",
            "must start with a letter or underscore".to_string(),
        ));
    }

    for c in name.chars() {
        if !c.is_alphanumeric() && c != '_' && c != '-' && c != '.' {
            return Err(ValidationError::InvalidCharacters {
                field: "table name",
                reason: format!("invalid character: '{}'", c),
            });
        }
    }

    Ok(())
}

/// Validate a target entity name.
///
/// Must be a valid identifier of the target language. UpperCamelCase is conventional
/// but not required (see [`is_upper_camel_case`]).
///
/// # Examples
///
/// ```
/// use schema_bridge::validation::input::validate_entity_name;
///
/// assert!(validate_entity_name("CarParentAssoc").is_ok());
/// assert!(validate_entity_name("Car-Parent").is_err());
/// assert!(validate_entity_name("class").is_err());
/// ```
pub fn validate_entity_name(name: &str) -> ValidationResult<()> {
    validate_identifier(name, "entity name")
}

/// Validate a target field name.
///
/// # Rules
///
/// - Must be a valid identifier and not a keyword
/// - Must not contain `__` (reserved for lookups by the target system)
/// - Must not end with an underscore
/// - Must not be `pk`
///
/// # Examples
///
/// ```
/// use schema_bridge::validation::input::validate_field_name;
///
/// assert!(validate_field_name("parent").is_ok());
/// assert!(validate_field_name("dog_").is_err());
/// assert!(validate_field_name("parent__id").is_err());
/// assert!(validate_field_name("pass").is_err());
/// ```
pub fn validate_field_name(name: &str) -> ValidationResult<()> {
    validate_identifier(name, "field name")?;

    if name.contains("__") {
        return Err(ValidationError::InvalidFormat(
            "field name",
            format!("'{}' must not contain \"__\"", name),
        ));
    }

    if name.ends_with('_') {
        return Err(ValidationError::InvalidFormat(
            "field name",
            format!("'{}' must not end with an underscore", name),
        ));
    }

    if name == "pk" {
        return Err(ValidationError::ReservedWord {
            field: "field name",
            word: name.to_string(),
        });
    }

    Ok(())
}

/// Validate a description string.
pub fn validate_description(desc: &str) -> ValidationResult<()> {
    if desc.len() > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::TooLong {
            field: "description",
            max: MAX_DESCRIPTION_LENGTH,
            actual: desc.len(),
        });
    }
    Ok(())
}

/// Validate the size of a schema file before reading it.
pub fn validate_schema_file_size(file_size: u64) -> ValidationResult<()> {
    if file_size > MAX_SCHEMA_FILE_SIZE {
        return Err(ValidationError::TooLong {
            field: "schema file size",
            max: MAX_SCHEMA_FILE_SIZE as usize,
            actual: file_size as usize,
        });
    }
    Ok(())
}

/// Whether `name` is UpperCamelCase (starts uppercase, no underscores).
pub fn is_upper_camel_case(name: &str) -> bool {
    name.starts_with(|c: char| c.is_uppercase()) && !name.contains('_')
}

/// Check if a word is a keyword of the target language.
fn is_reserved_keyword(word: &str) -> bool {
    const KEYWORDS: &[&str] = &[
        "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
        "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
        "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise",
        "return", "try", "while", "with", "yield",
    ];

    KEYWORDS.contains(&word)
}
