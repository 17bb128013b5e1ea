//! Column type mapper
//!
//! Maps one source column to a scalar target field. The mapping is an exhaustive match
//! over [`ColumnType`]: types with no target field are listed explicitly and fail with
//! [`UnsupportedTypeError`] instead of falling back to a default.

use crate::models::{ColumnType, FieldOptions, FieldType, PlainField, SourceColumn};

/// Source column type with no registered target field
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("column '{column}' has type '{type_name}' with no target field mapping")]
pub struct UnsupportedTypeError {
    pub column: String,
    pub type_name: String,
}

impl FieldOptions {
    /// Constructor arguments every mapped column carries.
    ///
    /// `null` and `blank` both follow the column's effective nullability.
    pub fn from_column(column: &SourceColumn) -> Self {
        let nullable = column.is_nullable();
        Self {
            primary_key: column.primary_key,
            unique: column.unique,
            null: nullable,
            blank: nullable,
            help_text: column.description.clone().filter(|d| !d.is_empty()),
        }
    }
}

/// Target field type for a source column type.
pub fn map_type(column: &SourceColumn) -> Result<FieldType, UnsupportedTypeError> {
    let field_type = match &column.column_type {
        ColumnType::Integer => FieldType::Integer,
        ColumnType::BigInteger => FieldType::BigInteger,
        ColumnType::Float | ColumnType::Numeric { .. } => FieldType::Float,
        ColumnType::String { length } | ColumnType::Char { length } => FieldType::Char {
            max_length: *length,
        },
        ColumnType::CIText => FieldType::CIText,
        ColumnType::Boolean => FieldType::Boolean,
        ColumnType::Binary => FieldType::Binary,
        ColumnType::Date => FieldType::Date,
        ColumnType::DateTime => FieldType::DateTime,
        ColumnType::SmallInteger
        | ColumnType::Text
        | ColumnType::Time
        | ColumnType::Interval
        | ColumnType::Json
        | ColumnType::Uuid
        | ColumnType::Enum { .. }
        | ColumnType::Other { .. } => {
            return Err(UnsupportedTypeError {
                column: column.name.clone(),
                type_name: column.column_type.to_string(),
            });
        }
    };
    Ok(field_type)
}

/// Map a source column to a scalar target field.
///
/// # Example
///
/// ```rust
/// use schema_bridge::convert::map_column;
/// use schema_bridge::models::{ColumnType, FieldType, SourceColumn};
///
/// let name = SourceColumn::new("name", ColumnType::String { length: Some(100) }).nullable(false);
/// let field = map_column(&name).unwrap();
/// assert_eq!(field.field_type, FieldType::Char { max_length: Some(100) });
/// assert!(!field.options.null);
/// ```
pub fn map_column(column: &SourceColumn) -> Result<PlainField, UnsupportedTypeError> {
    Ok(PlainField {
        field_type: map_type(column)?,
        options: FieldOptions::from_column(column),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_supported_type() {
        let cases = [
            (ColumnType::Integer, FieldType::Integer),
            (ColumnType::BigInteger, FieldType::BigInteger),
            (ColumnType::Float, FieldType::Float),
            (
                ColumnType::Numeric {
                    precision: Some(10),
                    scale: Some(2),
                },
                FieldType::Float,
            ),
            (
                ColumnType::String { length: Some(50) },
                FieldType::Char {
                    max_length: Some(50),
                },
            ),
            (
                ColumnType::Char { length: None },
                FieldType::Char { max_length: None },
            ),
            (ColumnType::CIText, FieldType::CIText),
            (ColumnType::Boolean, FieldType::Boolean),
            (ColumnType::Binary, FieldType::Binary),
            (ColumnType::Date, FieldType::Date),
            (ColumnType::DateTime, FieldType::DateTime),
        ];
        for (column_type, expected) in cases {
            let column = SourceColumn::new("c", column_type);
            assert_eq!(map_column(&column).unwrap().field_type, expected);
        }
    }

    #[test]
    fn options_mirror_column_flags() {
        for (primary_key, unique, nullable) in [
            (true, true, false),
            (false, true, true),
            (false, false, false),
            (false, false, true),
        ] {
            let mut column = SourceColumn::new("c", ColumnType::Integer).nullable(nullable);
            column.primary_key = primary_key;
            column.unique = unique;
            let options = map_column(&column).unwrap().options;
            assert_eq!(options.primary_key, primary_key);
            assert_eq!(options.unique, unique);
            assert_eq!(options.null, nullable);
            assert_eq!(options.blank, nullable);
        }
    }

    #[test]
    fn description_becomes_help_text() {
        let column = SourceColumn::new("age", ColumnType::Integer).description("age in years");
        let options = map_column(&column).unwrap().options;
        assert_eq!(options.help_text.as_deref(), Some("age in years"));
    }

    #[test]
    fn unsupported_type_is_an_error() {
        let column = SourceColumn::new("notes", ColumnType::Text);
        let err = map_column(&column).unwrap_err();
        assert_eq!(err.column, "notes");
        assert_eq!(err.type_name, "Text");

        let column = SourceColumn::new(
            "shape",
            ColumnType::Other {
                name: "geometry".to_string(),
            },
        );
        assert_eq!(map_column(&column).unwrap_err().type_name, "geometry");
    }
}
