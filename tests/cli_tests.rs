//! CLI handler tests

#![cfg(feature = "cli")]

use schema_bridge::cli::commands::generate::{
    GenerateArgs, TargetFormat, handle_generate, run_generate,
};
use schema_bridge::cli::commands::validate::{handle_validate, run_validate};
use schema_bridge::cli::commands::{InputArgs, InputFormat, load_schema};
use schema_bridge::cli::error::CliError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SCHEMA: &str = r#"
entities:
  - table: parent
    columns:
      - { name: id, type: Integer, primary_key: true }
  - table: child
    columns:
      - { name: id, type: Integer, primary_key: true }
      - { name: parent_id, type: Integer, foreign_keys: [parent.id] }
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn input(path: &Path) -> InputArgs {
    InputArgs {
        input: path.to_path_buf(),
        format: None,
        dialect: "generic".to_string(),
    }
}

fn generate_args(input_path: &Path, config: PathBuf) -> GenerateArgs {
    GenerateArgs {
        input: input(input_path),
        target: TargetFormat::Django,
        output: None,
        config: Some(config),
        entities: Vec::new(),
        force: false,
    }
}

mod generate_tests {
    use super::*;

    #[test]
    fn test_generate_django_with_entity_mapping() {
        let dir = TempDir::new().unwrap();
        let schema = write(&dir, "schema.yaml", SCHEMA);
        let config = write(&dir, "bridge.toml", "[export]\nmanaged = true\n");

        let mut args = generate_args(&schema, config);
        args.entities.push(("parent".to_string(), "DMParent".to_string()));
        let result = run_generate(&args).unwrap();

        assert!(result.content.contains("class DMParent(models.Model):"));
        assert!(result.content.contains("models.ForeignKey(\"DMParent\""));
        assert!(result.content.contains("managed = True"));
    }

    #[test]
    fn test_generate_from_sql() {
        let dir = TempDir::new().unwrap();
        let ddl = write(
            &dir,
            "schema.sql",
            "CREATE TABLE dog (id INT PRIMARY KEY, name VARCHAR(20) NOT NULL);",
        );
        let config = write(&dir, "bridge.toml", "");
        let mut args = generate_args(&ddl, config);
        args.target = TargetFormat::Json;

        let result = run_generate(&args).unwrap();
        assert_eq!(result.format, "json");
        assert!(result.content.contains("\"name\": \"Dog\""));
    }

    #[test]
    fn test_generate_writes_output_and_respects_force() {
        let dir = TempDir::new().unwrap();
        let schema = write(&dir, "schema.yaml", SCHEMA);
        let config = write(&dir, "bridge.toml", "");
        let output = dir.path().join("models.py");

        let mut args = generate_args(&schema, config);
        args.output = Some(output.clone());
        handle_generate(&args).unwrap();
        assert!(
            std::fs::read_to_string(&output)
                .unwrap()
                .contains("class Child(models.Model):")
        );

        assert!(matches!(
            handle_generate(&args),
            Err(CliError::OutputExists(_))
        ));
        args.force = true;
        assert!(handle_generate(&args).is_ok());
    }

    #[test]
    fn test_conversion_error_is_reported() {
        let dir = TempDir::new().unwrap();
        let schema = write(
            &dir,
            "schema.yaml",
            "- table: child\n  columns:\n    - { name: parent_id, type: Integer, foreign_keys: [parent.id] }\n",
        );
        let config = write(&dir, "bridge.toml", "");
        let err = run_generate(&generate_args(&schema, config)).unwrap_err();
        assert!(matches!(err, CliError::ConversionError(_)));
    }

    #[test]
    fn test_missing_config_file() {
        let dir = TempDir::new().unwrap();
        let schema = write(&dir, "schema.yaml", SCHEMA);
        let err = run_generate(&generate_args(&schema, dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }
}

mod input_tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a.SQL")), Some(InputFormat::Sql));
        assert_eq!(InputFormat::from_path(Path::new("a.json")), Some(InputFormat::Json));
        assert_eq!(InputFormat::from_path(Path::new("a.yml")), Some(InputFormat::Yaml));
    }

    #[test]
    fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        let err = load_schema(&input(&dir.path().join("absent.yaml"))).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_unparseable_sql_fails() {
        let dir = TempDir::new().unwrap();
        let ddl = write(&dir, "broken.sql", "CREATE TABLE (");
        let err = load_schema(&input(&ddl)).unwrap_err();
        assert!(matches!(err, CliError::ImportError(_)));
    }
}

mod validate_tests {
    use super::*;

    #[test]
    fn test_validate_clean_schema() {
        let dir = TempDir::new().unwrap();
        let schema = write(&dir, "schema.yaml", SCHEMA);
        assert!(handle_validate(&input(&schema)).is_ok());
    }

    #[test]
    fn test_validate_reports_unknown_tables() {
        let dir = TempDir::new().unwrap();
        let schema = write(
            &dir,
            "schema.json",
            r#"[{"table": "child", "columns": [
                {"name": "id", "type": "Integer", "primary_key": true},
                {"name": "parent_id", "type": "Integer", "foreign_keys": ["parent.id"]}
            ]}]"#,
        );
        let result = run_validate(&input(&schema)).unwrap();
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(
            handle_validate(&input(&schema)),
            Err(CliError::ValidationError(_))
        ));
    }
}
