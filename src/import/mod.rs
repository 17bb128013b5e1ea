//! Import functionality
//!
//! Loads the source system's schema metadata into a [`SourceSchema`]:
//! - Schema documents (YAML or JSON) describing entities, columns and relationships
//! - SQL (CREATE TABLE statements)

pub mod schema_file;
pub mod sql;

use crate::models::SourceSchema;

/// Result of an import operation.
///
/// Contains the imported schema and any errors/warnings from the import process.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[must_use = "import results should be processed or errors checked"]
pub struct ImportResult {
    /// Entities extracted from the import
    pub schema: SourceSchema,
    /// Parse errors/warnings
    pub errors: Vec<ImportError>,
}

impl ImportResult {
    pub fn new(schema: SourceSchema) -> Self {
        Self {
            schema,
            errors: Vec::new(),
        }
    }
}

/// Error during import
#[derive(Debug, Clone, PartialEq, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum ImportError {
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("IO error: {0}")]
    IoError(String),
}

// Re-export for convenience
pub use schema_file::{SchemaFileImporter, SchemaFormat};
pub use sql::SQLImporter;
