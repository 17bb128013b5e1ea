//! Many-to-many resolver
//!
//! Turns MANY_TO_MANY relationships into fields routed through the junction entity.
//! The junction must be a simple association: exactly two distinct junction columns
//! across both synchronization sides.

use super::registry::{TableRegistry, UnknownTableError};
use super::relationships::{entity_label, junction_field_name};
use super::{ConversionError, ConversionResult};
use crate::config::GenerationOptions;
use crate::models::{
    Direction, ManyToManyField, RelatedName, SkippedField, SourceEntity, SourceRelationship,
};
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Many-to-many fields of one entity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManyToManyResolution {
    pub fields: IndexMap<String, ManyToManyField>,
    /// Relationships that produce no field
    pub skipped: Vec<SkippedField>,
}

/// Resolve every MANY_TO_MANY relationship of `entity`.
pub fn many_to_many(
    entity: &SourceEntity,
    registry: &TableRegistry,
    options: &GenerationOptions,
) -> ConversionResult<ManyToManyResolution> {
    let mut resolution = ManyToManyResolution::default();

    for relationship in entity
        .relationships
        .iter()
        .filter(|r| r.direction == Direction::ManyToMany)
    {
        if relationship.synchronize_pairs.len() > 1 {
            let reason = format!(
                "joins on {} local columns; multi-column many-to-many keys are not supported",
                relationship.synchronize_pairs.len()
            );
            warn!(
                "Skipping many-to-many relationship '{}.{}': {}",
                entity.table, relationship.key, reason
            );
            resolution.skipped.push(SkippedField {
                name: relationship.key.clone(),
                reason,
            });
            continue;
        }

        let field = resolve_association(entity, relationship, registry, options)?;
        debug!(
            "Many-to-many '{}.{}' -> {} through {} {:?}",
            entity.table, relationship.key, field.to, field.through, field.through_fields
        );
        resolution.fields.insert(relationship.key.clone(), field);
    }

    Ok(resolution)
}

fn resolve_association(
    entity: &SourceEntity,
    relationship: &SourceRelationship,
    registry: &TableRegistry,
    options: &GenerationOptions,
) -> ConversionResult<ManyToManyField> {
    let invalid = |reason: String| ConversionError::InvalidAssociation {
        entity: entity_label(entity, registry),
        relationship: relationship.key.clone(),
        reason,
    };

    let junction = relationship
        .secondary
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| invalid("no junction table declared".to_string()))?;

    let endpoints: HashSet<&str> = relationship
        .synchronize_pairs
        .iter()
        .chain(relationship.secondary_synchronize_pairs.iter())
        .map(|p| p.junction_column.as_str())
        .collect();
    let (Some(local), Some(remote), 2) = (
        relationship.synchronize_pairs.first(),
        relationship.secondary_synchronize_pairs.first(),
        endpoints.len(),
    ) else {
        return Err(invalid(format!(
            "junction table '{}' must expose exactly two synchronization columns, found {}",
            junction,
            endpoints.len()
        )));
    };

    let unknown = |origin: &str, source: UnknownTableError| ConversionError::UnknownTable {
        entity: entity_label(entity, registry),
        origin: origin.to_string(),
        source,
    };
    let through = registry
        .resolve(junction, &entity.table)
        .map_err(|source| unknown(&relationship.key, source))?;
    let to = registry
        .resolve(&relationship.target, &entity.table)
        .map_err(|source| unknown(&relationship.key, source))?;

    let junction_source = registry.source(junction);
    let through_fields = (
        junction_field_name(
            junction_source,
            &local.junction_column,
            registry,
            &options.fk_suffix,
        )?,
        junction_field_name(
            junction_source,
            &remote.junction_column,
            registry,
            &options.fk_suffix,
        )?,
    );

    let owner = entity_label(entity, registry);
    Ok(ManyToManyField {
        to,
        through: through.entity_name(&owner).to_string(),
        through_fields,
        related_name: RelatedName::from_back_reference(relationship.back_populates.as_deref()),
    })
}
