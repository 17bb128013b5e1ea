//! Enums shared by the source and target schema models
//!
//! # Serde Conventions
//!
//! - [`ColumnType`] is written as the source system's type name (`Integer`,
//!   `VARCHAR(100)`, `CIText`, ...) and parsed leniently, so schema files can use either
//!   the declarative class names or the SQL spelling.
//! - [`Direction`] uses the source system's `SCREAMING_SNAKE_CASE` names, with the
//!   unseparated spellings (`MANYTOONE`) accepted as aliases.
//! - [`OnDelete`] uses `snake_case`, matching the configuration file.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Primitive type tag of a source column.
///
/// Every type the source system can declare has a variant here, including the ones the
/// target system has no field for (`Text`, `Time`, `Json`, ...). Mapping to the target is
/// an exhaustive match in [`crate::convert::column_mapper`], so an unmapped type is a
/// visible decision rather than a missing table entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    Integer,
    BigInteger,
    SmallInteger,
    Float,
    Numeric {
        precision: Option<u32>,
        scale: Option<u32>,
    },
    /// Variable-length string (`String`, `VARCHAR`)
    String {
        length: Option<u32>,
    },
    /// Fixed-length string (`CHAR`)
    Char {
        length: Option<u32>,
    },
    /// Case-insensitive text
    CIText,
    Boolean,
    Binary,
    Date,
    DateTime,
    Text,
    Time,
    Interval,
    Json,
    Uuid,
    Enum {
        values: Vec<String>,
    },
    /// Vendor or user-defined type carried through by name
    Other {
        name: String,
    },
}

impl ColumnType {
    /// Canonical source-side name of this type, without arguments.
    pub fn type_name(&self) -> &str {
        match self {
            ColumnType::Integer => "Integer",
            ColumnType::BigInteger => "BigInteger",
            ColumnType::SmallInteger => "SmallInteger",
            ColumnType::Float => "Float",
            ColumnType::Numeric { .. } => "Numeric",
            ColumnType::String { .. } => "String",
            ColumnType::Char { .. } => "CHAR",
            ColumnType::CIText => "CIText",
            ColumnType::Boolean => "Boolean",
            ColumnType::Binary => "LargeBinary",
            ColumnType::Date => "Date",
            ColumnType::DateTime => "DateTime",
            ColumnType::Text => "Text",
            ColumnType::Time => "Time",
            ColumnType::Interval => "Interval",
            ColumnType::Json => "JSON",
            ColumnType::Uuid => "UUID",
            ColumnType::Enum { .. } => "Enum",
            ColumnType::Other { name } => name,
        }
    }
}

/// Split `NAME(arg, arg)` into the upper-cased base name and its trimmed arguments.
fn split_type_arguments(raw: &str) -> (String, Vec<String>) {
    let trimmed = raw.trim();
    match (trimmed.find('('), trimmed.rfind(')')) {
        (Some(open), Some(close)) if close > open => {
            let base = trimmed[..open].trim().to_uppercase();
            let args = trimmed[open + 1..close]
                .split(',')
                .map(|a| a.trim().trim_matches(|c| c == '\'' || c == '"').to_string())
                .filter(|a| !a.is_empty())
                .collect();
            (base, args)
        }
        _ => (trimmed.to_uppercase(), Vec::new()),
    }
}

impl From<&str> for ColumnType {
    fn from(raw: &str) -> Self {
        let (base, args) = split_type_arguments(raw);
        let first_arg = args.first().and_then(|a| a.parse::<u32>().ok());
        let second_arg = args.get(1).and_then(|a| a.parse::<u32>().ok());

        match base.as_str() {
            "INTEGER" | "INT" | "INT4" | "SERIAL" => ColumnType::Integer,
            "BIGINTEGER" | "BIGINT" | "INT8" | "BIGSERIAL" => ColumnType::BigInteger,
            "SMALLINTEGER" | "SMALLINT" | "INT2" | "TINYINT" => ColumnType::SmallInteger,
            "FLOAT" | "FLOAT4" | "FLOAT8" | "REAL" | "DOUBLE" | "DOUBLE PRECISION" => {
                ColumnType::Float
            }
            "NUMERIC" | "DECIMAL" => ColumnType::Numeric {
                precision: first_arg,
                scale: second_arg,
            },
            "STRING" | "VARCHAR" | "CHARACTER VARYING" | "NVARCHAR" | "UNICODE" => {
                ColumnType::String { length: first_arg }
            }
            "CHAR" | "CHARACTER" | "NCHAR" => ColumnType::Char { length: first_arg },
            "CITEXT" => ColumnType::CIText,
            "BOOLEAN" | "BOOL" => ColumnType::Boolean,
            "BYTEA" | "BINARY" | "VARBINARY" | "LARGEBINARY" | "BLOB" => ColumnType::Binary,
            "DATE" => ColumnType::Date,
            "DATETIME" | "TIMESTAMP" | "TIMESTAMPTZ" | "TIMESTAMP WITHOUT TIME ZONE"
            | "TIMESTAMP WITH TIME ZONE" => ColumnType::DateTime,
            "TEXT" | "UNICODETEXT" | "CLOB" => ColumnType::Text,
            "TIME" | "TIME WITHOUT TIME ZONE" | "TIME WITH TIME ZONE" => ColumnType::Time,
            "INTERVAL" => ColumnType::Interval,
            "JSON" | "JSONB" => ColumnType::Json,
            "UUID" => ColumnType::Uuid,
            "ENUM" => ColumnType::Enum { values: args },
            _ => ColumnType::Other {
                name: raw.trim().to_string(),
            },
        }
    }
}

impl From<String> for ColumnType {
    fn from(raw: String) -> Self {
        ColumnType::from(raw.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ColumnType::from(s))
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Numeric {
                precision: Some(p),
                scale: Some(s),
            } => write!(f, "Numeric({}, {})", p, s),
            ColumnType::Numeric {
                precision: Some(p),
                scale: None,
            } => write!(f, "Numeric({})", p),
            ColumnType::String { length: Some(n) } => write!(f, "String({})", n),
            ColumnType::Char { length: Some(n) } => write!(f, "CHAR({})", n),
            ColumnType::Enum { values } if !values.is_empty() => {
                let quoted: Vec<String> = values.iter().map(|v| format!("'{}'", v)).collect();
                write!(f, "Enum({})", quoted.join(", "))
            }
            other => f.write_str(other.type_name()),
        }
    }
}

impl From<ColumnType> for String {
    fn from(ty: ColumnType) -> Self {
        ty.to_string()
    }
}

/// Direction of a source relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    #[serde(alias = "MANYTOONE", alias = "many_to_one")]
    ManyToOne,
    #[serde(alias = "ONETOMANY", alias = "one_to_many")]
    OneToMany,
    #[serde(alias = "MANYTOMANY", alias = "many_to_many")]
    ManyToMany,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::ManyToOne => write!(f, "MANY_TO_ONE"),
            Direction::OneToMany => write!(f, "ONE_TO_MANY"),
            Direction::ManyToMany => write!(f, "MANY_TO_MANY"),
        }
    }
}

/// Referential action attached to generated foreign keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnDelete {
    Cascade,
    Protect,
    Restrict,
    SetNull,
    SetDefault,
    /// Leave referential integrity to the database (default: source tables are not
    /// owned by the target system)
    #[default]
    DoNothing,
}

impl FromStr for OnDelete {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "cascade" => Ok(OnDelete::Cascade),
            "protect" => Ok(OnDelete::Protect),
            "restrict" => Ok(OnDelete::Restrict),
            "set_null" => Ok(OnDelete::SetNull),
            "set_default" => Ok(OnDelete::SetDefault),
            "do_nothing" => Ok(OnDelete::DoNothing),
            _ => Err(format!(
                "Unknown on-delete policy: {}. Use cascade, protect, restrict, set_null, set_default or do_nothing.",
                s
            )),
        }
    }
}

impl fmt::Display for OnDelete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnDelete::Cascade => write!(f, "cascade"),
            OnDelete::Protect => write!(f, "protect"),
            OnDelete::Restrict => write!(f, "restrict"),
            OnDelete::SetNull => write!(f, "set_null"),
            OnDelete::SetDefault => write!(f, "set_default"),
            OnDelete::DoNothing => write!(f, "do_nothing"),
        }
    }
}
