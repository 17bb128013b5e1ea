//! Source entity and schema model

use super::column::SourceColumn;
use super::relationship::SourceRelationship;
use heck::ToUpperCamelCase;
use serde::{Deserialize, Serialize};

/// A mapped entity of the source system: one table, its columns and relationships.
///
/// Entities are read-only input to the converter; nothing in the crate mutates them.
///
/// # Example
///
/// ```rust
/// use schema_bridge::models::{ColumnType, SourceColumn, SourceEntity, SourceRelationship};
///
/// let child = SourceEntity::new("child")
///     .with_column(SourceColumn::new("key", ColumnType::Integer).primary_key())
///     .with_column(SourceColumn::new("parent_id", ColumnType::Integer).references("parent", "id"))
///     .with_relationship(SourceRelationship::many_to_one("parent", "parent").pair("parent_id", "id"));
///
/// assert_eq!(child.default_entity_name(), "Child");
/// assert_eq!(child.primary_key_columns().len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceEntity {
    /// Declared entity (class) name, if the source declares one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Underlying table name
    pub table: String,
    /// Columns in declaration order
    #[serde(default)]
    pub columns: Vec<SourceColumn>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<SourceRelationship>,
}

impl SourceEntity {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            name: None,
            table: table.into(),
            columns: Vec::new(),
            relationships: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_column(mut self, column: SourceColumn) -> Self {
        self.columns.push(column);
        self
    }

    pub fn with_relationship(mut self, relationship: SourceRelationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    pub fn column(&self, name: &str) -> Option<&SourceColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Target entity name used when nothing has been registered for this table:
    /// the declared name, or the table name in UpperCamelCase.
    pub fn default_entity_name(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => self.table.to_upper_camel_case(),
        }
    }

    pub fn primary_key_columns(&self) -> Vec<&SourceColumn> {
        self.columns.iter().filter(|c| c.primary_key).collect()
    }
}

/// Ordered collection of source entities
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SourceSchema {
    #[serde(default)]
    pub entities: Vec<SourceEntity>,
}

impl SourceSchema {
    pub fn new(entities: Vec<SourceEntity>) -> Self {
        Self { entities }
    }

    pub fn entity_by_table(&self, table: &str) -> Option<&SourceEntity> {
        self.entities.iter().find(|e| e.table == table)
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnType;

    #[test]
    fn default_name_prefers_declared_name() {
        let entity = SourceEntity::new("cartoparent").named("CarParentAssoc");
        assert_eq!(entity.default_entity_name(), "CarParentAssoc");
        let entity = SourceEntity::new("order_line");
        assert_eq!(entity.default_entity_name(), "OrderLine");
    }

    #[test]
    fn finds_columns_and_entities() {
        let schema = SourceSchema::new(vec![
            SourceEntity::new("dog")
                .with_column(SourceColumn::new("id", ColumnType::Integer).primary_key()),
        ]);
        let dog = schema.entity_by_table("dog").unwrap();
        assert!(dog.column("id").is_some());
        assert!(dog.column("name").is_none());
        assert!(schema.entity_by_table("cat").is_none());
    }
}
