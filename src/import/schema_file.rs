//! Schema document import
//!
//! Reads a YAML or JSON document describing source entities. The document is either a
//! list of entities or a map with an `entities` list:
//!
//! ```yaml
//! entities:
//!   - table: parent
//!     columns:
//!       - { name: id, type: Integer, primary_key: true }
//!       - { name: name, type: String(50) }
//!     relationships:
//!       - key: cars
//!         direction: MANY_TO_MANY
//!         target: car
//!         secondary: cartoparent
//!         synchronize_pairs: [{ column: id, junction_column: parent_id }]
//!         secondary_synchronize_pairs: [{ column: car_id, junction_column: id_car }]
//!         back_populates: drivers
//! ```

use super::{ImportError, ImportResult};
use crate::models::{SourceEntity, SourceSchema};
use crate::validation::input::{validate_schema_file_size, validate_table_name};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Schema document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Yaml,
    Json,
}

impl SchemaFormat {
    /// Guess the format from the content: documents starting with `{` or `[` are JSON.
    pub fn detect(content: &str) -> Self {
        match content.trim_start().chars().next() {
            Some('{') | Some('[') => SchemaFormat::Json,
            _ => SchemaFormat::Yaml,
        }
    }

    /// Format implied by a file extension, if any
    pub fn from_path(path: &Path) -> Option<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Some(SchemaFormat::Yaml),
            Some("json") => Some(SchemaFormat::Json),
            _ => None,
        }
    }
}

impl std::str::FromStr for SchemaFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(SchemaFormat::Yaml),
            "json" => Ok(SchemaFormat::Json),
            _ => Err(format!("Unknown schema format: {}. Use 'yaml' or 'json'.", s)),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SchemaDocument {
    Bare(Vec<SourceEntity>),
    Wrapped(SourceSchema),
}

/// Schema document importer
#[derive(Debug, Default)]
pub struct SchemaFileImporter {
    /// Explicit format; detected from the content when `None`
    pub format: Option<SchemaFormat>,
}

impl SchemaFileImporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(format: SchemaFormat) -> Self {
        Self {
            format: Some(format),
        }
    }

    /// Import a schema document from a string
    ///
    /// # Example
    ///
    /// ```rust
    /// use schema_bridge::import::SchemaFileImporter;
    ///
    /// let yaml = r#"
    /// - table: dog
    ///   columns:
    ///     - { name: id, type: Integer, primary_key: true }
    ///     - { name: name, type: String(50) }
    /// "#;
    /// let result = SchemaFileImporter::new().import(yaml).unwrap();
    /// assert_eq!(result.schema.entities[0].columns.len(), 2);
    /// ```
    pub fn import(&self, content: &str) -> Result<ImportResult, ImportError> {
        let format = self.format.unwrap_or_else(|| SchemaFormat::detect(content));
        let document: SchemaDocument = match format {
            SchemaFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| ImportError::ParseError(format!("Failed to parse YAML: {}", e)))?,
            SchemaFormat::Json => serde_json::from_str(content)
                .map_err(|e| ImportError::ParseError(format!("Failed to parse JSON: {}", e)))?,
        };
        let entities = match document {
            SchemaDocument::Bare(entities) => entities,
            SchemaDocument::Wrapped(schema) => schema.entities,
        };

        let mut result = ImportResult::new(SourceSchema::default());
        for entity in entities {
            if entity.table.trim().is_empty() {
                result.errors.push(ImportError::ValidationError(
                    "entity without table name ignored".to_string(),
                ));
                continue;
            }
            if let Err(e) = validate_table_name(&entity.table) {
                warn!("Table name validation warning: {}", e);
            }
            result.schema.entities.push(entity);
        }

        info!(
            "Imported {} entities from {:?} schema document",
            result.schema.entities.len(),
            format
        );
        Ok(result)
    }

    /// Import a schema document from a file
    ///
    /// The format is taken from the importer, then the file extension, then the content.
    pub fn import_file(&self, path: &Path) -> Result<ImportResult, ImportError> {
        let metadata = std::fs::metadata(path)
            .map_err(|e| ImportError::IoError(format!("{}: {}", path.display(), e)))?;
        validate_schema_file_size(metadata.len())
            .map_err(|e| ImportError::ValidationError(e.to_string()))?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| ImportError::IoError(format!("{}: {}", path.display(), e)))?;

        let importer = Self {
            format: self.format.or_else(|| SchemaFormat::from_path(path)),
        };
        importer.import(&content)
    }
}
