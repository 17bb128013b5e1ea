//! Schema Bridge - ORM schema translation engine
//!
//! Translates entity metadata declared in a source object-relational mapping system
//! into target entity definitions for a second mapping system over the same tables.
//!
//! Provides:
//! - Source schema models and loaders (schema documents, SQL DDL)
//! - The conversion engine: column type mapping, table registry, foreign-key and
//!   many-to-many resolution, two-pass batch generation
//! - Export adapters (JSON / YAML documents, Django `models.py`)
//! - Validation and configuration

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod convert;
pub mod export;
pub mod import;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{ConfigError, GenerationOptions, GeneratorConfig};
pub use convert::{ConversionError, SchemaGenerator, TableRegistry, generate};
pub use export::{DjangoExporter, ExportError, ExportResult, JsonExporter, YamlExporter};
pub use import::{ImportError, ImportResult, SQLImporter, SchemaFileImporter};
pub use validation::{SchemaValidationResult, SchemaValidator};

// Re-export models
pub use models::enums::*;
pub use models::{
    FieldSpec, SourceColumn, SourceEntity, SourceRelationship, SourceSchema,
    TargetEntityDefinition,
};
