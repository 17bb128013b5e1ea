//! JSON and YAML exporters for generated entity definitions.

use super::{ExportError, ExportResult};
use crate::models::TargetEntityDefinition;
use serde::Serialize;

#[derive(Serialize)]
struct EntityDocument<'a> {
    entities: &'a [TargetEntityDefinition],
}

/// Exporter for JSON documents.
pub struct JsonExporter;

impl JsonExporter {
    /// Export definitions as a pretty-printed `{"entities": [...]}` document.
    ///
    /// # Example
    ///
    /// ```rust
    /// use schema_bridge::convert::SchemaGenerator;
    /// use schema_bridge::export::JsonExporter;
    /// use schema_bridge::models::{ColumnType, SourceColumn, SourceEntity};
    ///
    /// let dog = SourceEntity::new("dog")
    ///     .with_column(SourceColumn::new("id", ColumnType::Integer).primary_key());
    /// let definitions = SchemaGenerator::default().generate_all(&[dog]).unwrap();
    ///
    /// let result = JsonExporter.export(&definitions).unwrap();
    /// assert_eq!(result.format, "json");
    /// assert!(result.content.contains("\"name\": \"Dog\""));
    /// ```
    pub fn export(&self, definitions: &[TargetEntityDefinition]) -> Result<ExportResult, ExportError> {
        let content = serde_json::to_string_pretty(&EntityDocument {
            entities: definitions,
        })
        .map_err(|e| ExportError::SerializationError(e.to_string()))?;
        Ok(ExportResult {
            content,
            format: "json".to_string(),
        })
    }
}

/// Exporter for YAML documents.
pub struct YamlExporter;

impl YamlExporter {
    pub fn export(&self, definitions: &[TargetEntityDefinition]) -> Result<ExportResult, ExportError> {
        let content = serde_yaml::to_string(&EntityDocument {
            entities: definitions,
        })
        .map_err(|e| ExportError::SerializationError(e.to_string()))?;
        Ok(ExportResult {
            content,
            format: "yaml".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldSpec, FieldType, PlainField};
    use indexmap::IndexMap;

    fn definition() -> TargetEntityDefinition {
        let mut fields = IndexMap::new();
        fields.insert(
            "name".to_string(),
            FieldSpec::Plain(PlainField::new(FieldType::Char {
                max_length: Some(50),
            })),
        );
        TargetEntityDefinition {
            name: "Dog".to_string(),
            table: "dog".to_string(),
            fields,
            primary_key: None,
            skipped: Vec::new(),
        }
    }

    #[test]
    fn test_json_document_is_tagged() {
        let result = JsonExporter.export(&[definition()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&result.content).unwrap();
        let name = &value["entities"][0]["fields"]["name"];
        assert_eq!(name["kind"], "plain");
        assert_eq!(name["field_type"]["type"], "char");
        assert_eq!(name["field_type"]["max_length"], 50);
    }

    #[test]
    fn test_yaml_document_parses_back() {
        let result = YamlExporter.export(&[definition()]).unwrap();
        assert_eq!(result.format, "yaml");
        let value: serde_yaml::Value = serde_yaml::from_str(&result.content).unwrap();
        assert_eq!(value["entities"][0]["table"].as_str(), Some("dog"));
    }
}
