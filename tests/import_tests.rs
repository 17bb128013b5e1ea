//! Import module tests

use schema_bridge::convert::SchemaGenerator;
use schema_bridge::import::{ImportError, SQLImporter, SchemaFileImporter, SchemaFormat};
use schema_bridge::models::{ColumnType, Direction, EntityRef, FieldSpec, ForeignKeyTarget};

const PARENT_CHILD_YAML: &str = r#"
entities:
  - table: parent
    columns:
      - { name: id, type: Integer, primary_key: true }
      - { name: name, type: String(50), nullable: false }
    relationships:
      - key: children
        direction: ONE_TO_MANY
        target: child
        pairs: [{ local: id, remote: parent_id }]
        back_populates: parent
  - table: child
    columns:
      - { name: key, type: Integer, primary_key: true }
      - { name: name, type: VARCHAR(50), description: "Child's name" }
      - { name: age, type: Integer }
      - { name: parent_id, type: Integer, foreign_keys: [parent.id] }
    relationships:
      - key: parent
        direction: MANY_TO_ONE
        target: parent
        pairs: [{ local: parent_id, remote: id }]
        backref: children
"#;

mod schema_file_import_tests {
    use super::*;

    #[test]
    fn test_import_yaml_document() {
        let result = SchemaFileImporter::new().import(PARENT_CHILD_YAML).unwrap();
        assert!(result.errors.is_empty());
        let schema = result.schema;
        assert_eq!(schema.entities.len(), 2);

        let child = schema.entity_by_table("child").unwrap();
        assert_eq!(
            child.column("name").unwrap().column_type,
            ColumnType::String { length: Some(50) }
        );
        assert_eq!(
            child.column("parent_id").unwrap().foreign_keys,
            vec![ForeignKeyTarget::new("parent", "id")]
        );
        let parent = &child.relationships[0];
        assert_eq!(parent.direction, Direction::ManyToOne);
        assert_eq!(parent.back_populates.as_deref(), Some("children"));
    }

    #[test]
    fn test_import_json_list() {
        let json = r#"[
            {"table": "dog", "name": "Hound", "columns": [
                {"name": "id", "type": "INTEGER", "primary_key": true},
                {"name": "owner_id", "type": "BIGINT",
                 "foreign_keys": [{"table": "owner", "column": "id"}]}
            ]}
        ]"#;
        let result = SchemaFileImporter::new().import(json).unwrap();
        let dog = &result.schema.entities[0];
        assert_eq!(dog.default_entity_name(), "Hound");
        assert_eq!(dog.columns[1].column_type, ColumnType::BigInteger);
        assert_eq!(
            dog.columns[1].foreign_keys,
            vec![ForeignKeyTarget::new("owner", "id")]
        );
    }

    #[test]
    fn test_malformed_document_is_parse_error() {
        let err = SchemaFileImporter::with_format(SchemaFormat::Json)
            .import("{\"entities\": [")
            .unwrap_err();
        assert!(matches!(err, ImportError::ParseError(_)));
    }

    #[test]
    fn test_import_file_uses_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.yml");
        std::fs::write(&path, PARENT_CHILD_YAML).unwrap();
        let result = SchemaFileImporter::new().import_file(&path).unwrap();
        assert_eq!(result.schema.entities.len(), 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SchemaFileImporter::new()
            .import_file(&dir.path().join("absent.yaml"))
            .unwrap_err();
        assert!(matches!(err, ImportError::IoError(_)));
    }

    #[test]
    fn test_imported_schema_generates() {
        let schema = SchemaFileImporter::new()
            .import(PARENT_CHILD_YAML)
            .unwrap()
            .schema;
        let definitions = SchemaGenerator::default()
            .generate_all(&schema.entities)
            .unwrap();
        let child = &definitions[1];
        match &child.fields["parent"] {
            FieldSpec::ForeignKey(fk) => {
                assert_eq!(fk.to, EntityRef::Entity("Parent".to_string()));
            }
            other => panic!("expected a foreign key, got {:?}", other),
        }
        let name = child.fields["name"].options().unwrap();
        assert_eq!(name.help_text.as_deref(), Some("Child's name"));
    }
}

mod sql_import_tests {
    use super::*;

    const DDL: &str = r#"
        CREATE TABLE parent (
            id INTEGER PRIMARY KEY,
            name VARCHAR(50) NOT NULL
        );
        CREATE TABLE child (
            id INTEGER PRIMARY KEY,
            name VARCHAR(50),
            parent_id INTEGER REFERENCES parent (id)
        );
    "#;

    #[test]
    fn test_parse_tables_and_references() {
        let result = SQLImporter::new("postgres").parse(DDL).unwrap();
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert_eq!(result.schema.entities.len(), 2);

        let parent = result.schema.entity_by_table("parent").unwrap();
        assert!(parent.column("id").unwrap().primary_key);
        assert_eq!(parent.column("name").unwrap().nullable, Some(false));

        let child = result.schema.entity_by_table("child").unwrap();
        assert_eq!(
            child.column("parent_id").unwrap().foreign_keys,
            vec![ForeignKeyTarget::new("parent", "id")]
        );
        assert!(child.relationships.is_empty());
    }

    #[test]
    fn test_ddl_takes_synthesized_name_path() {
        let schema = SQLImporter::new("postgres").parse(DDL).unwrap().schema;
        let definitions = SchemaGenerator::default()
            .generate_all(&schema.entities)
            .unwrap();
        let child = &definitions[1];
        assert!(child.fields.contains_key("parent"));
        assert!(!child.fields.contains_key("parent_id"));
    }
}
