//! Relationship resolver
//!
//! Decides which columns of an entity become foreign key fields and what they are
//! called. Planning ([`plan_foreign_keys`]) only looks at the entity and the names it
//! must avoid; resolution ([`foreign_keys`]) then binds every planned key to a target
//! entity through the registry.
//!
//! Naming rules:
//! - A column joined by a MANY_TO_ONE relationship takes the relationship's key, and the
//!   relationship's back reference as reverse accessor.
//! - Any other foreign key column gets a synthesized name (see [`super::naming`]) and no
//!   reverse accessor.
//!
//! Multi-column keys are skipped with a warning, never fatal.

use super::naming::{disambiguate, synthesize_field_name};
use super::registry::TableRegistry;
use super::{ConversionError, ConversionResult};
use crate::config::GenerationOptions;
use crate::models::{
    Direction, FieldOptions, ForeignKeyField, ForeignKeyTarget, RelatedName, SkippedField,
    SourceEntity, SourceRelationship,
};
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Foreign key chosen for one column, before target resolution
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedForeignKey {
    pub field_name: String,
    pub column: String,
    pub target: ForeignKeyTarget,
    pub related_name: RelatedName,
    /// Relationship the name was taken from, if any
    pub relationship: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForeignKeyPlan {
    pub planned: Vec<PlannedForeignKey>,
    pub skipped: Vec<SkippedField>,
}

impl ForeignKeyPlan {
    /// Field planned for `column`
    pub fn field_for_column(&self, column: &str) -> Option<&str> {
        self.planned
            .iter()
            .find(|p| p.column == column)
            .map(|p| p.field_name.as_str())
    }
}

/// Foreign key fields of one entity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForeignKeyResolution {
    pub fields: IndexMap<String, ForeignKeyField>,
    /// Columns represented by a foreign key field
    pub consumed_columns: HashSet<String>,
    /// Foreign key columns that produce no field
    pub skipped: Vec<SkippedField>,
}

impl ForeignKeyResolution {
    /// Whether `column` must not be mapped as a plain field
    pub fn claims_column(&self, column: &str) -> bool {
        self.consumed_columns.contains(column) || self.skipped.iter().any(|s| s.name == column)
    }
}

fn skip(entity: &SourceEntity, column: &str, reason: String) -> SkippedField {
    warn!(
        "Skipping foreign key column '{}.{}': {}",
        entity.table, column, reason
    );
    SkippedField {
        name: column.to_string(),
        reason,
    }
}

fn matching_relationship<'a>(entity: &'a SourceEntity, column: &str) -> Option<&'a SourceRelationship> {
    let mut matches = entity
        .relationships
        .iter()
        .filter(|r| r.direction == Direction::ManyToOne && r.joins_on(column));
    let first = matches.next()?;
    if matches.next().is_some() {
        warn!(
            "Column '{}.{}' is joined by several relationships; using '{}'",
            entity.table, column, first.key
        );
    }
    Some(first)
}

/// Choose field names for every foreign key column of `entity`.
///
/// Synthesized names avoid the entity's columns, its relationship keys and every name
/// in `reserved` (user-declared fields). `entity_name` is reported in errors.
///
/// Fails only when a relationship disagrees with the foreign key it joins on.
pub fn plan_foreign_keys(
    entity: &SourceEntity,
    entity_name: &str,
    reserved: &HashSet<String>,
    fk_suffix: &str,
) -> ConversionResult<ForeignKeyPlan> {
    let mut plan = ForeignKeyPlan::default();
    let mut taken: HashSet<String> = entity
        .columns
        .iter()
        .map(|c| c.name.clone())
        .chain(entity.relationships.iter().map(|r| r.key.clone()))
        .chain(reserved.iter().cloned())
        .collect();

    for column in entity.columns.iter().filter(|c| c.is_foreign_key()) {
        if column.foreign_keys.len() > 1 {
            plan.skipped.push(skip(
                entity,
                &column.name,
                format!(
                    "column references {} targets; multi-column foreign keys are not supported",
                    column.foreign_keys.len()
                ),
            ));
            continue;
        }
        let target = &column.foreign_keys[0];

        let planned = match matching_relationship(entity, &column.name) {
            Some(relationship) => {
                if relationship.pairs.len() > 1 {
                    plan.skipped.push(skip(
                        entity,
                        &column.name,
                        format!(
                            "relationship '{}' joins on {} column pairs; multi-column foreign keys are not supported",
                            relationship.key,
                            relationship.pairs.len()
                        ),
                    ));
                    continue;
                }
                let remote = relationship
                    .pairs
                    .iter()
                    .find(|p| p.local == column.name)
                    .map(|p| p.remote.as_str())
                    .unwrap_or_default();
                if remote != target.column || relationship.target != target.table {
                    return Err(ConversionError::InconsistentRelationship {
                        entity: entity_name.to_string(),
                        relationship: relationship.key.clone(),
                        column: column.name.clone(),
                        remote: format!("{}.{}", relationship.target, remote),
                        target: target.to_string(),
                    });
                }
                PlannedForeignKey {
                    field_name: relationship.key.clone(),
                    column: column.name.clone(),
                    target: target.clone(),
                    related_name: RelatedName::from_back_reference(
                        relationship.back_populates.as_deref(),
                    ),
                    relationship: Some(relationship.key.clone()),
                }
            }
            None => {
                let field_name =
                    disambiguate(synthesize_field_name(&column.name, fk_suffix), &taken);
                debug!(
                    "No relationship joins '{}.{}'; naming its foreign key '{}'",
                    entity.table, column.name, field_name
                );
                PlannedForeignKey {
                    field_name,
                    column: column.name.clone(),
                    target: target.clone(),
                    related_name: RelatedName::Suppressed,
                    relationship: None,
                }
            }
        };
        taken.insert(planned.field_name.clone());
        plan.planned.push(planned);
    }

    Ok(plan)
}

/// Resolve the foreign key fields of `entity`.
///
/// # Example
///
/// ```rust
/// use schema_bridge::config::GenerationOptions;
/// use schema_bridge::convert::{TableRegistry, foreign_keys};
/// use schema_bridge::models::{ColumnType, EntityRef, SourceColumn, SourceEntity};
///
/// let child = SourceEntity::new("child")
///     .with_column(SourceColumn::new("key", ColumnType::Integer).primary_key())
///     .with_column(SourceColumn::new("dog_id", ColumnType::Integer).references("dog", "id"));
///
/// let mut registry = TableRegistry::new();
/// registry.register("dog", "Dog");
///
/// let resolved = foreign_keys(&child, &registry, &GenerationOptions::default()).unwrap();
/// assert_eq!(resolved.fields["dog"].to, EntityRef::Entity("Dog".to_string()));
/// assert!(resolved.claims_column("dog_id"));
/// ```
pub fn foreign_keys(
    entity: &SourceEntity,
    registry: &TableRegistry,
    options: &GenerationOptions,
) -> ConversionResult<ForeignKeyResolution> {
    foreign_keys_reserving(entity, registry, &HashSet::new(), options)
}

/// Resolve the foreign key fields of `entity`, keeping synthesized names clear of
/// `reserved`.
pub fn foreign_keys_reserving(
    entity: &SourceEntity,
    registry: &TableRegistry,
    reserved: &HashSet<String>,
    options: &GenerationOptions,
) -> ConversionResult<ForeignKeyResolution> {
    let label = entity_label(entity, registry);
    let plan = plan_foreign_keys(entity, &label, reserved, &options.fk_suffix)?;
    let mut resolution = ForeignKeyResolution {
        skipped: plan.skipped,
        ..Default::default()
    };

    for planned in plan.planned {
        let to = registry
            .resolve(&planned.target.table, &entity.table)
            .map_err(|source| ConversionError::UnknownTable {
                entity: label.clone(),
                origin: planned.column.clone(),
                source,
            })?;
        let Some(column) = entity.column(&planned.column) else {
            continue;
        };
        debug!(
            "Foreign key '{}.{}' -> {} ({})",
            entity.table, planned.field_name, to, planned.target
        );
        resolution.consumed_columns.insert(planned.column.clone());
        resolution.fields.insert(
            planned.field_name,
            ForeignKeyField {
                to,
                on_delete: options.on_delete,
                db_column: planned.column,
                to_field: planned.target.column,
                related_name: planned.related_name,
                options: FieldOptions::from_column(column),
            },
        );
    }

    Ok(resolution)
}

/// Name of the field on `junction` that stores `junction_column`.
///
/// Uses the junction entity's own foreign key plan when its metadata is registered,
/// otherwise the naming convention for undeclared relationships.
pub fn junction_field_name(
    junction: Option<&SourceEntity>,
    junction_column: &str,
    registry: &TableRegistry,
    fk_suffix: &str,
) -> ConversionResult<String> {
    if let Some(junction) = junction {
        let label = entity_label(junction, registry);
        let plan = plan_foreign_keys(junction, &label, &HashSet::new(), fk_suffix)?;
        if let Some(field) = plan.field_for_column(junction_column) {
            return Ok(field.to_string());
        }
    }
    Ok(synthesize_field_name(junction_column, fk_suffix))
}

/// Entity name used in error reports
pub(crate) fn entity_label(entity: &SourceEntity, registry: &TableRegistry) -> String {
    registry
        .entity_name(&entity.table)
        .map(str::to_string)
        .unwrap_or_else(|| entity.default_entity_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnType, EntityRef, SourceColumn};

    fn child() -> SourceEntity {
        SourceEntity::new("child")
            .with_column(SourceColumn::new("key", ColumnType::Integer).primary_key())
            .with_column(
                SourceColumn::new("parent_id", ColumnType::Integer).references("parent", "id"),
            )
    }

    fn registry() -> TableRegistry {
        let mut registry = TableRegistry::new();
        registry.register("parent", "Parent");
        registry.register("child", "Child");
        registry
    }

    #[test]
    fn relationship_supplies_name_and_back_reference() {
        let entity = child().with_relationship(
            SourceRelationship::many_to_one("parent", "parent")
                .pair("parent_id", "id")
                .back_populates("children"),
        );
        let resolved = foreign_keys(&entity, &registry(), &GenerationOptions::default()).unwrap();
        let fk = &resolved.fields["parent"];
        assert_eq!(fk.to, EntityRef::Entity("Parent".to_string()));
        assert_eq!(fk.related_name, RelatedName::Name("children".to_string()));
        assert_eq!(fk.db_column, "parent_id");
        assert_eq!(fk.to_field, "id");
    }

    #[test]
    fn missing_back_reference_suppresses_reverse_accessor() {
        let entity = child().with_relationship(
            SourceRelationship::many_to_one("parent", "parent").pair("parent_id", "id"),
        );
        let resolved = foreign_keys(&entity, &registry(), &GenerationOptions::default()).unwrap();
        assert_eq!(resolved.fields["parent"].related_name, RelatedName::Suppressed);
    }

    #[test]
    fn synthesized_name_avoids_existing_columns() {
        let entity = child().with_column(SourceColumn::new("parent", ColumnType::Integer));
        let resolved = foreign_keys(&entity, &registry(), &GenerationOptions::default()).unwrap();
        assert!(resolved.fields.contains_key("parent_"));
        assert!(!resolved.fields.contains_key("parent"));
    }

    #[test]
    fn synthesized_name_avoids_reserved_names() {
        let reserved = HashSet::from(["parent".to_string(), "parent_".to_string()]);
        let resolved =
            foreign_keys_reserving(&child(), &registry(), &reserved, &GenerationOptions::default())
                .unwrap();
        assert_eq!(resolved.fields["parent__"].db_column, "parent_id");
    }

    #[test]
    fn inconsistent_relationship_reports_registered_name() {
        let entity = child().with_relationship(
            SourceRelationship::many_to_one("parent", "parent").pair("parent_id", "uuid"),
        );
        let mut registry = registry();
        registry.register("child", "DMChild");
        let err = foreign_keys(&entity, &registry, &GenerationOptions::default()).unwrap_err();
        assert_eq!(err.entity(), "DMChild");
    }

    #[test]
    fn mismatched_remote_column_is_fatal() {
        let entity = child().with_relationship(
            SourceRelationship::many_to_one("parent", "parent").pair("parent_id", "uuid"),
        );
        let err = foreign_keys(&entity, &registry(), &GenerationOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ConversionError::InconsistentRelationship { ref relationship, .. } if relationship == "parent"
        ));
    }

    #[test]
    fn multi_pair_relationship_is_skipped() {
        let entity = child()
            .with_column(
                SourceColumn::new("parent_rev", ColumnType::Integer).references("parent", "rev"),
            )
            .with_relationship(
                SourceRelationship::many_to_one("parent", "parent")
                    .pair("parent_id", "id")
                    .pair("parent_rev", "rev"),
            );
        let resolved = foreign_keys(&entity, &registry(), &GenerationOptions::default()).unwrap();
        assert!(resolved.fields.is_empty());
        assert_eq!(resolved.skipped.len(), 2);
        assert!(resolved.claims_column("parent_id"));
        assert!(resolved.claims_column("parent_rev"));
    }

    #[test]
    fn column_with_several_targets_is_skipped() {
        let entity = SourceEntity::new("child").with_column(
            SourceColumn::new("owner_id", ColumnType::Integer)
                .references("parent", "id")
                .references("dog", "id"),
        );
        let plan = plan_foreign_keys(&entity, "Child", &HashSet::new(), "_fk").unwrap();
        assert!(plan.planned.is_empty());
        assert_eq!(plan.skipped[0].name, "owner_id");
    }

    #[test]
    fn self_reference_resolves_to_sentinel() {
        let entity = SourceEntity::new("node")
            .with_column(SourceColumn::new("id", ColumnType::Integer).primary_key())
            .with_column(SourceColumn::new("parent_id", ColumnType::Integer).references("node", "id"));
        let resolved =
            foreign_keys(&entity, &TableRegistry::new(), &GenerationOptions::default()).unwrap();
        assert_eq!(resolved.fields["parent"].to, EntityRef::SelfRef);
    }

    #[test]
    fn unregistered_target_is_fatal() {
        let err = foreign_keys(&child(), &TableRegistry::new(), &GenerationOptions::default())
            .unwrap_err();
        match err {
            ConversionError::UnknownTable { origin, source, .. } => {
                assert_eq!(origin, "parent_id");
                assert_eq!(source.0, "parent");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn junction_field_falls_back_to_convention() {
        let registry = TableRegistry::new();
        assert_eq!(
            junction_field_name(None, "parent_id", &registry, "_fk").unwrap(),
            "parent"
        );
        let junction = SourceEntity::new("cartoparent")
            .with_column(SourceColumn::new("id_car", ColumnType::Integer).references("car", "car_id"))
            .with_relationship(SourceRelationship::many_to_one("car", "car").pair("id_car", "car_id"));
        assert_eq!(
            junction_field_name(Some(&junction), "id_car", &registry, "_fk").unwrap(),
            "car"
        );
    }
}
