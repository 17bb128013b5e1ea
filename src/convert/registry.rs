//! Table registry
//!
//! Maps source table names to target entity names for one generation run. The registry
//! is an explicit value owned by the caller, so separate runs never share state.

use crate::models::{EntityRef, SourceEntity};
use std::collections::HashMap;
use tracing::debug;

/// Table referenced before any entity name was registered for it
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("table '{0}' has not been registered")]
pub struct UnknownTableError(pub String);

/// Source table name to target entity name mapping
///
/// Source entities registered with [`TableRegistry::register_source`] are kept as well,
/// so junction tables can be inspected when resolving many-to-many fields.
///
/// # Example
///
/// ```rust
/// use schema_bridge::convert::TableRegistry;
/// use schema_bridge::models::EntityRef;
///
/// let mut registry = TableRegistry::new();
/// registry.register("child", "DMChild");
///
/// assert_eq!(
///     registry.resolve("child", "parent").unwrap(),
///     EntityRef::Entity("DMChild".to_string())
/// );
/// assert_eq!(registry.resolve("child", "child").unwrap(), EntityRef::SelfRef);
/// assert!(registry.resolve("dog", "child").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableRegistry {
    names: HashMap<String, String>,
    sources: HashMap<String, SourceEntity>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `table` as `entity`, replacing any earlier name.
    ///
    /// Returns the previously registered name.
    pub fn register(&mut self, table: impl Into<String>, entity: impl Into<String>) -> Option<String> {
        let table = table.into();
        let entity = entity.into();
        debug!("Registering table '{}' as entity '{}'", table, entity);
        self.names.insert(table, entity)
    }

    /// Register `table` as `entity` unless a name is already registered.
    ///
    /// Returns whether the name was inserted.
    pub fn register_default(&mut self, table: &str, entity: &str) -> bool {
        if self.names.contains_key(table) {
            return false;
        }
        self.register(table, entity);
        true
    }

    /// Register a source entity under its default name (unless already named) and keep
    /// its metadata for junction lookups.
    pub fn register_source(&mut self, entity: &SourceEntity) {
        self.register_default(&entity.table, &entity.default_entity_name());
        self.sources.insert(entity.table.clone(), entity.clone());
    }

    pub fn entity_name(&self, table: &str) -> Option<&str> {
        self.names.get(table).map(String::as_str)
    }

    /// Source metadata of a registered table
    pub fn source(&self, table: &str) -> Option<&SourceEntity> {
        self.sources.get(table)
    }

    /// Resolve a referenced table from the point of view of `current_table`.
    ///
    /// A reference to the current table is a self reference and never consults the map.
    pub fn resolve(&self, table: &str, current_table: &str) -> Result<EntityRef, UnknownTableError> {
        if table == current_table {
            return Ok(EntityRef::SelfRef);
        }
        self.entity_name(table)
            .map(|name| EntityRef::Entity(name.to_string()))
            .ok_or_else(|| UnknownTableError(table.to_string()))
    }

    pub fn contains(&self, table: &str) -> bool {
        self.names.contains_key(table)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Registered (table, entity) pairs, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(t, e)| (t.as_str(), e.as_str()))
    }
}
