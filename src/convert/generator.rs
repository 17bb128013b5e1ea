//! Entity generator and batch driver
//!
//! [`generate`] builds one target entity. Field precedence, highest first:
//! 1. user overrides
//! 2. foreign key fields
//! 3. many-to-many fields
//! 4. plain columns not claimed above
//!
//! [`SchemaGenerator`] owns the registry for a run and generates whole schemas in two
//! passes: every table is registered before any reference is resolved.

use super::column_mapper::map_column;
use super::many_to_many::many_to_many;
use super::registry::TableRegistry;
use super::relationships::{entity_label, foreign_keys_reserving};
use super::{ConversionError, ConversionResult};
use crate::config::{GenerationOptions, GeneratorConfig};
use crate::models::{
    FieldOverrides, FieldSpec, SkippedField, SourceEntity, TargetEntityDefinition,
};
use crate::validation::input::validate_field_name;
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, error, info, warn};

/// Generate the target definition of one source entity.
///
/// Does not modify the registry: every table `entity` references, other than its own,
/// must already be registered.
pub fn generate(
    entity: &SourceEntity,
    registry: &TableRegistry,
    overrides: &FieldOverrides,
    options: &GenerationOptions,
) -> ConversionResult<TargetEntityDefinition> {
    let name = entity_label(entity, registry);

    let primary_keys = entity.primary_key_columns();
    if primary_keys.len() > 1 {
        return Err(ConversionError::CompositePrimaryKey {
            entity: name,
            columns: primary_keys.iter().map(|c| c.name.clone()).collect(),
        });
    }

    let associations = many_to_many(entity, registry, options)?;
    let reserved: HashSet<String> = overrides.keys().cloned().collect();
    let references = foreign_keys_reserving(entity, registry, &reserved, options)?;

    let mut fields: IndexMap<String, FieldSpec> = overrides.clone();
    for field_name in overrides.keys() {
        debug!("Field '{}.{}' is user-declared", name, field_name);
    }

    let mut skipped = references.skipped.clone();

    // Only relationship keys can land here; synthesized names avoid overrides
    for (field_name, fk) in references.fields.iter() {
        if fields.contains_key(field_name) {
            let reason = format!(
                "foreign key field '{}' is replaced by a user-declared field",
                field_name
            );
            warn!("Entity '{}': column '{}' {}", name, fk.db_column, reason);
            skipped.push(SkippedField {
                name: fk.db_column.clone(),
                reason,
            });
            continue;
        }
        fields.insert(field_name.clone(), FieldSpec::ForeignKey(fk.clone()));
    }

    for (field_name, m2m) in associations.fields.iter() {
        if fields.contains_key(field_name) {
            let reason = format!(
                "many-to-many field '{}' collides with an existing field",
                field_name
            );
            warn!("Entity '{}': {}", name, reason);
            skipped.push(SkippedField {
                name: field_name.clone(),
                reason,
            });
            continue;
        }
        fields.insert(field_name.clone(), FieldSpec::ManyToMany(m2m.clone()));
    }

    for column in &entity.columns {
        if references.claims_column(&column.name) {
            continue;
        }
        if fields.contains_key(&column.name) {
            if !overrides.contains_key(&column.name) {
                warn!(
                    "Column '{}.{}' collides with a generated relation field; not mapped",
                    entity.table, column.name
                );
            }
            continue;
        }
        let field = map_column(column).map_err(|source| {
            ConversionError::UnsupportedType {
                entity: name.clone(),
                source,
            }
        })?;
        fields.insert(column.name.clone(), FieldSpec::Plain(field));
    }

    for field_name in fields.keys() {
        if let Err(e) = validate_field_name(field_name) {
            warn!("Entity '{}': {}", name, e);
        }
    }

    let primary_key = fields
        .iter()
        .find(|(_, spec)| spec.is_primary_key())
        .map(|(field_name, _)| field_name.clone());

    skipped.extend(associations.skipped);

    debug!(
        "Generated '{}' ({} fields, {} skipped)",
        name,
        fields.len(),
        skipped.len()
    );

    Ok(TargetEntityDefinition {
        name,
        table: entity.table.clone(),
        fields,
        primary_key,
        skipped,
    })
}

/// Generation run: owns the table registry, options and overrides
///
/// # Example
///
/// ```rust
/// use schema_bridge::convert::SchemaGenerator;
/// use schema_bridge::models::{ColumnType, FieldSpec, SourceColumn, SourceEntity};
///
/// let parent = SourceEntity::new("parent")
///     .with_column(SourceColumn::new("id", ColumnType::Integer).primary_key());
/// let child = SourceEntity::new("child")
///     .with_column(SourceColumn::new("key", ColumnType::Integer).primary_key())
///     .with_column(SourceColumn::new("parent_id", ColumnType::Integer).references("parent", "id"));
///
/// let mut generator = SchemaGenerator::default();
/// generator.register("parent", "DMParent");
///
/// // child is generated before parent is visited
/// let definitions = generator.generate_all(&[child, parent]).unwrap();
/// match &definitions[0].fields["parent"] {
///     FieldSpec::ForeignKey(fk) => assert_eq!(fk.to.to_string(), "DMParent"),
///     other => panic!("unexpected field {other:?}"),
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaGenerator {
    registry: TableRegistry,
    options: GenerationOptions,
    overrides: BTreeMap<String, FieldOverrides>,
}

impl SchemaGenerator {
    pub fn new(options: GenerationOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Generator with the options, entity names and overrides of `config`
    pub fn from_config(config: &GeneratorConfig) -> Self {
        let mut generator = Self::new(config.generator.clone());
        for (table, entity) in &config.entities {
            generator.register(table, entity);
        }
        generator.overrides = config.overrides.clone();
        generator
    }

    /// Register a target entity name for `table`, replacing any earlier name.
    pub fn register(&mut self, table: impl Into<String>, entity: impl Into<String>) {
        self.registry.register(table, entity);
    }

    /// Set the user-declared fields of an entity (keyed by entity name or table name)
    pub fn set_overrides(&mut self, entity: impl Into<String>, overrides: FieldOverrides) {
        self.overrides.insert(entity.into(), overrides);
    }

    pub fn registry(&self) -> &TableRegistry {
        &self.registry
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    fn overrides_for(&self, entity: &SourceEntity) -> FieldOverrides {
        self.registry
            .entity_name(&entity.table)
            .and_then(|name| self.overrides.get(name))
            .or_else(|| self.overrides.get(&entity.table))
            .cloned()
            .unwrap_or_default()
    }

    /// Register every entity, then generate each of them in order.
    ///
    /// Names registered before the call are kept. Stops at the first fatal error.
    pub fn generate_all(
        &mut self,
        entities: &[SourceEntity],
    ) -> ConversionResult<Vec<TargetEntityDefinition>> {
        for entity in entities {
            self.registry.register_source(entity);
        }
        info!("Registered {} tables", self.registry.len());

        let mut definitions = Vec::with_capacity(entities.len());
        for entity in entities {
            definitions.push(self.generate_registered(entity)?);
        }
        info!("Generated {} entities", definitions.len());
        Ok(definitions)
    }

    /// Register `entity` (unless already named) and generate it.
    ///
    /// Single-pass use: every table it references must have been registered by an
    /// earlier call or by [`SchemaGenerator::register`].
    pub fn generate_entity(&mut self, entity: &SourceEntity) -> ConversionResult<TargetEntityDefinition> {
        self.registry.register_source(entity);
        self.generate_registered(entity)
    }

    fn generate_registered(&self, entity: &SourceEntity) -> ConversionResult<TargetEntityDefinition> {
        let overrides = self.overrides_for(entity);
        generate(entity, &self.registry, &overrides, &self.options).inspect_err(|e| {
            error!(
                "Failed to generate entity '{}' (table '{}'): {}",
                e.entity(),
                entity.table,
                e
            );
        })
    }
}
