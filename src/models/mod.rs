//! Models module
//!
//! Defines the data structures on both sides of the translation:
//! - Source side: entities, columns and relationships exposed by the source mapping system
//! - Target side: entity definitions and field specifications for the target mapping system

pub mod column;
pub mod entity;
pub mod enums;
pub mod relationship;
pub mod target;

pub use column::{ForeignKeyTarget, SourceColumn};
pub use entity::{SourceEntity, SourceSchema};
pub use enums::*;
pub use relationship::{ColumnPair, SourceRelationship, SyncPair};
pub use target::{
    EntityRef, FieldOptions, FieldOverrides, FieldSpec, FieldType, ForeignKeyField,
    ManyToManyField, PlainField, RelatedName, SkippedField, TargetEntityDefinition,
};
