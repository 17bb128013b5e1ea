//! Source column model

use super::enums::ColumnType;
use serde::{Deserialize, Serialize};

/// Foreign key reference to another table's column
///
/// Deserializes from either the dotted form used by the source system
/// (`"parent.id"`) or an explicit `{ table, column }` map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "ForeignKeyRepr")]
pub struct ForeignKeyTarget {
    /// Referenced table name
    pub table: String,
    /// Referenced column name
    pub column: String,
}

impl ForeignKeyTarget {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Parse a dotted `table.column` reference.
    ///
    /// Schema-qualified references (`schema.table.column`) keep everything before the
    /// last dot as the table name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use schema_bridge::models::ForeignKeyTarget;
    ///
    /// let fk = ForeignKeyTarget::parse("parent.id").unwrap();
    /// assert_eq!(fk.table, "parent");
    /// assert_eq!(fk.column, "id");
    /// assert!(ForeignKeyTarget::parse("parent").is_none());
    /// ```
    pub fn parse(reference: &str) -> Option<Self> {
        let (table, column) = reference.trim().rsplit_once('.')?;
        if table.is_empty() || column.is_empty() {
            return None;
        }
        Some(Self::new(table, column))
    }
}

impl std::fmt::Display for ForeignKeyTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ForeignKeyRepr {
    Dotted(String),
    Explicit { table: String, column: String },
}

impl TryFrom<ForeignKeyRepr> for ForeignKeyTarget {
    type Error = String;

    fn try_from(repr: ForeignKeyRepr) -> Result<Self, Self::Error> {
        match repr {
            ForeignKeyRepr::Dotted(reference) => ForeignKeyTarget::parse(&reference).ok_or_else(
                || format!("invalid foreign key reference '{}': expected table.column", reference),
            ),
            ForeignKeyRepr::Explicit { table, column } => Ok(ForeignKeyTarget { table, column }),
        }
    }
}

/// Column of a source entity, as exposed by the source mapping system.
///
/// Nullability follows the source system's rule: when not declared, a column is
/// nullable unless it is part of the primary key. Use [`SourceColumn::is_nullable`]
/// rather than reading `nullable` directly.
///
/// # Example
///
/// ```rust
/// use schema_bridge::models::{ColumnType, SourceColumn};
///
/// let id = SourceColumn::new("id", ColumnType::Integer).primary_key();
/// assert!(!id.is_nullable());
///
/// let parent_id = SourceColumn::new("parent_id", ColumnType::Integer).references("parent", "id");
/// assert!(parent_id.is_nullable());
/// assert_eq!(parent_id.foreign_keys.len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceColumn {
    /// Column name
    pub name: String,
    /// Primitive type tag
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Declared nullability (`None` = source default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub primary_key: bool,
    /// Column description/documentation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Referenced columns, one per declared foreign key
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub foreign_keys: Vec<ForeignKeyTarget>,
}

impl SourceColumn {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: None,
            unique: false,
            primary_key: false,
            description: None,
            foreign_keys: Vec::new(),
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.foreign_keys.push(ForeignKeyTarget::new(table, column));
        self
    }

    /// Effective nullability of the column.
    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(!self.primary_key)
    }

    pub fn is_foreign_key(&self) -> bool {
        !self.foreign_keys.is_empty()
    }
}
