//! Whole-schema validation
//!
//! Reports every problem in a source schema at once, before generation stops at the
//! first fatal error.

use super::input::{
    is_upper_camel_case, validate_description, validate_entity_name, validate_field_name,
    validate_table_name,
};
use crate::convert::column_mapper::map_type;
use crate::models::{Direction, SourceSchema};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Problem found in a source schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SchemaIssue {
    #[error("table '{table}' is declared more than once")]
    DuplicateTable { table: String },

    #[error("'{table}.{origin}' references unknown table '{referenced}'")]
    UnknownReference {
        table: String,
        /// Column or relationship holding the reference
        origin: String,
        referenced: String,
    },

    #[error("table '{table}' has a composite primary key ({})", .columns.join(", "))]
    CompositePrimaryKey { table: String, columns: Vec<String> },

    #[error("column '{table}.{column}' has unsupported type '{type_name}'")]
    UnsupportedType {
        table: String,
        column: String,
        type_name: String,
    },

    #[error("table '{table}': invalid name '{name}': {reason}")]
    InvalidName {
        table: String,
        name: String,
        reason: String,
    },
}

/// Result of schema validation.
#[derive(Debug, Default, Serialize, Deserialize)]
#[must_use = "validation results should be checked for errors"]
pub struct SchemaValidationResult {
    /// Problems that make generation fail
    pub errors: Vec<SchemaIssue>,
    /// Names the target system will reject or warn about
    pub warnings: Vec<SchemaIssue>,
}

impl SchemaValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Source schema validator
#[derive(Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate `schema`
    ///
    /// # Example
    ///
    /// ```rust
    /// use schema_bridge::models::{ColumnType, SourceColumn, SourceEntity, SourceSchema};
    /// use schema_bridge::validation::schema::SchemaValidator;
    ///
    /// let schema = SourceSchema::new(vec![SourceEntity::new("child").with_column(
    ///     SourceColumn::new("parent_id", ColumnType::Integer).references("parent", "id"),
    /// )]);
    /// let result = SchemaValidator::new().validate(&schema);
    /// assert!(!result.is_valid());
    /// ```
    pub fn validate(&self, schema: &SourceSchema) -> SchemaValidationResult {
        let mut result = SchemaValidationResult::default();
        let tables: HashSet<&str> = schema.entities.iter().map(|e| e.table.as_str()).collect();
        let mut seen: HashSet<&str> = HashSet::new();

        for entity in &schema.entities {
            let table = entity.table.as_str();
            if !seen.insert(table) {
                result.errors.push(SchemaIssue::DuplicateTable {
                    table: table.to_string(),
                });
            }

            let invalid = |name: &str, reason: String| SchemaIssue::InvalidName {
                table: table.to_string(),
                name: name.to_string(),
                reason,
            };
            if let Err(e) = validate_table_name(table) {
                result.warnings.push(invalid(table, e.to_string()));
            }
            let entity_name = entity.default_entity_name();
            if let Err(e) = validate_entity_name(&entity_name) {
                result.warnings.push(invalid(&entity_name, e.to_string()));
            } else if !is_upper_camel_case(&entity_name) {
                result.warnings.push(invalid(
                    &entity_name,
                    "entity names are conventionally UpperCamelCase".to_string(),
                ));
            }

            let primary_keys = entity.primary_key_columns();
            if primary_keys.len() > 1 {
                result.errors.push(SchemaIssue::CompositePrimaryKey {
                    table: table.to_string(),
                    columns: primary_keys.iter().map(|c| c.name.clone()).collect(),
                });
            }

            for column in &entity.columns {
                for fk in &column.foreign_keys {
                    if !tables.contains(fk.table.as_str()) {
                        result.errors.push(SchemaIssue::UnknownReference {
                            table: table.to_string(),
                            origin: column.name.clone(),
                            referenced: fk.table.clone(),
                        });
                    }
                }
                if let Some(description) = &column.description
                    && let Err(e) = validate_description(description)
                {
                    result.warnings.push(invalid(&column.name, e.to_string()));
                }
                if column.is_foreign_key() {
                    continue;
                }
                if let Err(e) = map_type(column) {
                    result.errors.push(SchemaIssue::UnsupportedType {
                        table: table.to_string(),
                        column: e.column,
                        type_name: e.type_name,
                    });
                }
                if let Err(e) = validate_field_name(&column.name) {
                    result.warnings.push(invalid(&column.name, e.to_string()));
                }
            }

            for relationship in &entity.relationships {
                let mut referenced = vec![relationship.target.as_str()];
                if relationship.direction == Direction::ManyToMany
                    && let Some(secondary) = relationship.secondary.as_deref()
                {
                    referenced.push(secondary);
                }
                for other in referenced {
                    if !tables.contains(other) {
                        result.errors.push(SchemaIssue::UnknownReference {
                            table: table.to_string(),
                            origin: relationship.key.clone(),
                            referenced: other.to_string(),
                        });
                    }
                }
                if relationship.direction != Direction::OneToMany
                    && let Err(e) = validate_field_name(&relationship.key)
                {
                    result
                        .warnings
                        .push(invalid(&relationship.key, e.to_string()));
                }
            }
        }

        result
    }
}
