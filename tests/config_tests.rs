//! Configuration tests

use schema_bridge::config::{CONFIG_FILENAME, GeneratorConfig};
use schema_bridge::convert::SchemaGenerator;
use schema_bridge::models::{
    ColumnType, FieldSpec, FieldType, OnDelete, SourceColumn, SourceEntity,
};

const CONFIG: &str = r#"
[generator]
on_delete = "protect"
fk_suffix = "_ref"

[entities]
child = "DMChild"

[overrides.DMChild.nickname]
kind = "plain"
field_type = { type = "char", max_length = 100 }
"#;

fn entities() -> Vec<SourceEntity> {
    vec![
        SourceEntity::new("owner")
            .with_column(SourceColumn::new("id", ColumnType::Integer).primary_key()),
        SourceEntity::new("child")
            .with_column(SourceColumn::new("id", ColumnType::Integer).primary_key())
            .with_column(SourceColumn::new("nickname", ColumnType::Text))
            .with_column(SourceColumn::new("owner", ColumnType::Integer).references("owner", "id")),
    ]
}

mod config_generation_tests {
    use super::*;

    #[test]
    fn test_config_drives_generation() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), CONFIG).unwrap();
        let config = GeneratorConfig::load(dir.path()).unwrap();

        let definitions = SchemaGenerator::from_config(&config)
            .generate_all(&entities())
            .unwrap();
        let child = &definitions[1];
        assert_eq!(child.name, "DMChild");

        // The override replaces the unsupported TEXT column
        assert_eq!(
            child.fields["nickname"],
            FieldSpec::Plain(schema_bridge::models::PlainField::new(FieldType::Char {
                max_length: Some(100)
            }))
        );

        // "owner" has no "_id" suffix, so the configured suffix is appended
        match &child.fields["owner_ref"] {
            FieldSpec::ForeignKey(fk) => {
                assert_eq!(fk.on_delete, OnDelete::Protect);
                assert_eq!(fk.db_column, "owner");
            }
            other => panic!("expected a foreign key, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GeneratorConfig::load(dir.path()).unwrap();
        assert_eq!(config.generator.fk_suffix, "_fk");
        assert!(config.entities.is_empty());
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = GeneratorConfig::parse(CONFIG).unwrap();
        let reparsed = GeneratorConfig::parse(&config.to_toml().unwrap()).unwrap();
        assert_eq!(reparsed, config);
    }
}
