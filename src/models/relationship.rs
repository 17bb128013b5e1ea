//! Source relationship model

use super::enums::Direction;
use serde::{Deserialize, Serialize};

/// Local/remote column pair of a many-to-one join condition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ColumnPair {
    /// Column on the owning entity's table
    pub local: String,
    /// Column on the relationship's target table
    pub remote: String,
}

impl ColumnPair {
    pub fn new(local: impl Into<String>, remote: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            remote: remote.into(),
        }
    }
}

/// Synchronization pair of a many-to-many relationship
///
/// Ties a column of one side of the association to the junction table column that
/// stores its value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncPair {
    /// Column on the entity side (owning entity or target entity)
    pub column: String,
    /// Column on the junction table
    pub junction_column: String,
}

impl SyncPair {
    pub fn new(column: impl Into<String>, junction_column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            junction_column: junction_column.into(),
        }
    }
}

/// Relationship declared on a source entity
///
/// # Example
///
/// ```rust
/// use schema_bridge::models::{Direction, SourceRelationship};
///
/// let parent = SourceRelationship::many_to_one("parent", "parent")
///     .pair("parent_id", "id")
///     .back_populates("children");
/// assert_eq!(parent.direction, Direction::ManyToOne);
///
/// let cars = SourceRelationship::many_to_many("cars", "car", "cartoparent")
///     .sync("id", "parent_id")
///     .secondary_sync("car_id", "id_car")
///     .back_populates("drivers");
/// assert_eq!(cars.secondary.as_deref(), Some("cartoparent"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceRelationship {
    /// Attribute name of the relationship on the owning entity
    pub key: String,
    pub direction: Direction,
    /// Table name of the related entity
    pub target: String,
    /// Join condition columns (MANY_TO_ONE / ONE_TO_MANY)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pairs: Vec<ColumnPair>,
    /// Name of the inverse relationship on the target entity
    #[serde(
        default,
        alias = "backref",
        skip_serializing_if = "Option::is_none"
    )]
    pub back_populates: Option<String>,
    /// Junction table name (MANY_TO_MANY)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    /// Owning side columns and their junction columns (MANY_TO_MANY)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synchronize_pairs: Vec<SyncPair>,
    /// Target side columns and their junction columns (MANY_TO_MANY)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secondary_synchronize_pairs: Vec<SyncPair>,
}

impl SourceRelationship {
    fn with_direction(key: impl Into<String>, direction: Direction, target: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction,
            target: target.into(),
            pairs: Vec::new(),
            back_populates: None,
            secondary: None,
            synchronize_pairs: Vec::new(),
            secondary_synchronize_pairs: Vec::new(),
        }
    }

    pub fn many_to_one(key: impl Into<String>, target: impl Into<String>) -> Self {
        Self::with_direction(key, Direction::ManyToOne, target)
    }

    pub fn one_to_many(key: impl Into<String>, target: impl Into<String>) -> Self {
        Self::with_direction(key, Direction::OneToMany, target)
    }

    pub fn many_to_many(
        key: impl Into<String>,
        target: impl Into<String>,
        secondary: impl Into<String>,
    ) -> Self {
        let mut rel = Self::with_direction(key, Direction::ManyToMany, target);
        rel.secondary = Some(secondary.into());
        rel
    }

    pub fn pair(mut self, local: impl Into<String>, remote: impl Into<String>) -> Self {
        self.pairs.push(ColumnPair::new(local, remote));
        self
    }

    pub fn back_populates(mut self, name: impl Into<String>) -> Self {
        self.back_populates = Some(name.into());
        self
    }

    pub fn sync(mut self, column: impl Into<String>, junction_column: impl Into<String>) -> Self {
        self.synchronize_pairs
            .push(SyncPair::new(column, junction_column));
        self
    }

    pub fn secondary_sync(
        mut self,
        column: impl Into<String>,
        junction_column: impl Into<String>,
    ) -> Self {
        self.secondary_synchronize_pairs
            .push(SyncPair::new(column, junction_column));
        self
    }

    /// Whether any join pair of this relationship uses `column` on the owning side.
    pub fn joins_on(&self, column: &str) -> bool {
        self.pairs.iter().any(|p| p.local == column)
    }
}
