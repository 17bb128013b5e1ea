//! Validation functionality
//!
//! Provides validation logic for:
//! - Identifier validation (table, entity and field names)
//! - Whole-schema validation (unresolved references, composite keys, unmapped types)

pub mod input;
pub mod schema;

pub use input::{
    ValidationError, validate_entity_name, validate_field_name, validate_schema_file_size,
    validate_table_name,
};
pub use schema::{SchemaIssue, SchemaValidationResult, SchemaValidator};
