//! Schema translation engine
//!
//! Turns source entities into target entity definitions:
//! - [`column_mapper`]: source column type to target field type
//! - [`registry`]: table name to target entity name resolution
//! - [`relationships`]: foreign key detection and naming
//! - [`many_to_many`]: association fields routed through junction entities
//! - [`generator`]: per-entity orchestration and the two-pass batch driver

pub mod column_mapper;
pub mod generator;
pub mod many_to_many;
pub mod naming;
pub mod registry;
pub mod relationships;

pub use column_mapper::{UnsupportedTypeError, map_column};
pub use generator::{SchemaGenerator, generate};
pub use many_to_many::{ManyToManyResolution, many_to_many};
pub use registry::{TableRegistry, UnknownTableError};
pub use relationships::{ForeignKeyResolution, foreign_keys, foreign_keys_reserving};

/// Fatal error while generating a target entity
///
/// Every variant names the entity being generated so the offending source schema
/// element can be located.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    #[error("Unsupported type in entity '{entity}': {source}")]
    UnsupportedType {
        entity: String,
        #[source]
        source: UnsupportedTypeError,
    },
    #[error("Unknown table referenced by '{entity}.{origin}': {source}")]
    UnknownTable {
        entity: String,
        /// Column or relationship holding the reference
        origin: String,
        #[source]
        source: UnknownTableError,
    },
    #[error(
        "Inconsistent relationship '{entity}.{relationship}': joins column '{column}' to '{remote}' but the foreign key targets '{target}'"
    )]
    InconsistentRelationship {
        entity: String,
        relationship: String,
        column: String,
        remote: String,
        /// Foreign key target as `table.column`
        target: String,
    },
    #[error("Invalid association '{entity}.{relationship}': {reason}")]
    InvalidAssociation {
        entity: String,
        relationship: String,
        reason: String,
    },
    #[error("Composite primary key on '{entity}' ({}) is not supported", .columns.join(", "))]
    CompositePrimaryKey { entity: String, columns: Vec<String> },
}

impl ConversionError {
    /// Entity whose generation failed
    pub fn entity(&self) -> &str {
        match self {
            ConversionError::UnsupportedType { entity, .. }
            | ConversionError::UnknownTable { entity, .. }
            | ConversionError::InconsistentRelationship { entity, .. }
            | ConversionError::InvalidAssociation { entity, .. }
            | ConversionError::CompositePrimaryKey { entity, .. } => entity,
        }
    }
}

pub type ConversionResult<T> = Result<T, ConversionError>;
