//! Target entity model
//!
//! The converter produces plain data: an ordered field-name to field-spec map per entity.
//! Adapters in [`crate::export`] turn it into whatever the target mapping system needs.
//!
//! # Serde Conventions
//!
//! - [`FieldSpec`] is internally tagged by `kind` (`plain`, `foreign_key`, `many_to_many`).
//! - [`FieldType`] is internally tagged by `type`.
//! - [`EntityRef`] and [`RelatedName`] serialize as bare strings, with the target
//!   system's sentinels `"self"` and `"+"`.

use super::enums::OnDelete;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar field types of the target system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    Integer,
    BigInteger,
    Float,
    Char {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_length: Option<u32>,
    },
    #[serde(rename = "citext")]
    CIText,
    Boolean,
    Binary,
    Date,
    #[serde(rename = "datetime")]
    DateTime,
}

/// Constructor arguments shared by every generated field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOptions {
    pub primary_key: bool,
    pub unique: bool,
    pub null: bool,
    pub blank: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

/// Scalar column field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainField {
    pub field_type: FieldType,
    #[serde(default)]
    pub options: FieldOptions,
}

impl PlainField {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            options: FieldOptions::default(),
        }
    }
}

/// Entity a relation field points at
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityRef {
    /// The entity being generated (self-referential relation)
    SelfRef,
    Entity(String),
}

impl EntityRef {
    /// Name of the referenced entity, resolving `SelfRef` to `owner`.
    pub fn entity_name<'a>(&'a self, owner: &'a str) -> &'a str {
        match self {
            EntityRef::SelfRef => owner,
            EntityRef::Entity(name) => name,
        }
    }
}

impl From<String> for EntityRef {
    fn from(s: String) -> Self {
        if s == "self" {
            EntityRef::SelfRef
        } else {
            EntityRef::Entity(s)
        }
    }
}

impl From<EntityRef> for String {
    fn from(r: EntityRef) -> Self {
        r.to_string()
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::SelfRef => f.write_str("self"),
            EntityRef::Entity(name) => f.write_str(name),
        }
    }
}

/// Name of the reverse accessor installed on the referenced entity
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RelatedName {
    Name(String),
    /// No reverse accessor
    #[default]
    Suppressed,
}

impl RelatedName {
    pub fn from_back_reference(back_reference: Option<&str>) -> Self {
        match back_reference {
            Some(name) if !name.is_empty() => RelatedName::Name(name.to_string()),
            _ => RelatedName::Suppressed,
        }
    }
}

impl From<String> for RelatedName {
    fn from(s: String) -> Self {
        if s == "+" || s.is_empty() {
            RelatedName::Suppressed
        } else {
            RelatedName::Name(s)
        }
    }
}

impl From<RelatedName> for String {
    fn from(r: RelatedName) -> Self {
        r.to_string()
    }
}

impl fmt::Display for RelatedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelatedName::Name(name) => f.write_str(name),
            RelatedName::Suppressed => f.write_str("+"),
        }
    }
}

/// Foreign key field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyField {
    pub to: EntityRef,
    #[serde(default)]
    pub on_delete: OnDelete,
    /// Source column holding the key
    pub db_column: String,
    /// Referenced column on the target table
    pub to_field: String,
    #[serde(default)]
    pub related_name: RelatedName,
    #[serde(default)]
    pub options: FieldOptions,
}

/// Many-to-many field routed through a junction entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManyToManyField {
    pub to: EntityRef,
    /// Junction entity name
    pub through: String,
    /// Junction field names pointing at (this side, the other side)
    pub through_fields: (String, String),
    #[serde(default)]
    pub related_name: RelatedName,
}

/// Field specification of a target entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldSpec {
    Plain(PlainField),
    ForeignKey(ForeignKeyField),
    ManyToMany(ManyToManyField),
}

impl FieldSpec {
    pub fn options(&self) -> Option<&FieldOptions> {
        match self {
            FieldSpec::Plain(field) => Some(&field.options),
            FieldSpec::ForeignKey(field) => Some(&field.options),
            FieldSpec::ManyToMany(_) => None,
        }
    }

    pub fn is_primary_key(&self) -> bool {
        self.options().is_some_and(|o| o.primary_key)
    }

    /// Entity referenced by a relation field
    pub fn related_entity(&self) -> Option<&EntityRef> {
        match self {
            FieldSpec::Plain(_) => None,
            FieldSpec::ForeignKey(field) => Some(&field.to),
            FieldSpec::ManyToMany(field) => Some(&field.to),
        }
    }
}

/// A source column or relationship that produced no field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedField {
    /// Column name or relationship key
    pub name: String,
    pub reason: String,
}

/// User-declared fields of one entity, keyed by field name
pub type FieldOverrides = IndexMap<String, FieldSpec>;

/// Complete target entity produced for one source entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetEntityDefinition {
    pub name: String,
    pub table: String,
    pub fields: IndexMap<String, FieldSpec>,
    /// Field carrying the primary key (`None`: the target supplies an implicit key)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedField>,
}

impl TargetEntityDefinition {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Names of other entities this entity references, self references excluded,
    /// through entities included.
    pub fn referenced_entities(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for spec in self.fields.values() {
            let (target, through) = match spec {
                FieldSpec::Plain(_) => continue,
                FieldSpec::ForeignKey(fk) => (&fk.to, None),
                FieldSpec::ManyToMany(m2m) => (&m2m.to, Some(m2m.through.as_str())),
            };
            if let EntityRef::Entity(name) = target
                && name != &self.name
                && !names.contains(&name.as_str())
            {
                names.push(name);
            }
            if let Some(through) = through
                && through != self.name
                && !names.contains(&through)
            {
                names.push(through);
            }
        }
        names
    }
}
