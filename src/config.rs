//! Generator configuration file support
//!
//! Handles parsing of `.schema-bridge.toml` configuration files and
//! environment variable overrides.

use crate::models::{FieldOverrides, OnDelete};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default configuration filename
pub const CONFIG_FILENAME: &str = ".schema-bridge.toml";

/// Environment variable for the on-delete policy of generated foreign keys
pub const ENV_ON_DELETE: &str = "SCHEMA_BRIDGE_ON_DELETE";

/// Environment variable for the synthesized foreign key suffix
pub const ENV_FK_SUFFIX: &str = "SCHEMA_BRIDGE_FK_SUFFIX";

/// Environment variable for the `managed` flag of exported entities
pub const ENV_MANAGED: &str = "SCHEMA_BRIDGE_MANAGED";

/// Default suffix for foreign key columns without an `_id` suffix
pub const DEFAULT_FK_SUFFIX: &str = "_fk";

/// Error loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Options that change how fields are generated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Referential action of every generated foreign key
    #[serde(default)]
    pub on_delete: OnDelete,

    /// Appended to foreign key columns that have no `_id` suffix
    #[serde(default = "default_fk_suffix")]
    pub fk_suffix: String,
}

fn default_fk_suffix() -> String {
    DEFAULT_FK_SUFFIX.to_string()
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            on_delete: OnDelete::default(),
            fk_suffix: default_fk_suffix(),
        }
    }
}

/// Export configuration section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSection {
    /// Whether the target system manages (creates/migrates) the exported tables
    #[serde(default)]
    pub managed: bool,
}

/// Main configuration structure
///
/// Represents the `.schema-bridge.toml` configuration file format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub generator: GenerationOptions,

    #[serde(default)]
    pub export: ExportSection,

    /// Table name to entity name, registered before generation
    #[serde(default)]
    pub entities: BTreeMap<String, String>,

    /// User-declared fields per entity name
    #[serde(default)]
    pub overrides: BTreeMap<String, FieldOverrides>,
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a workspace directory
    ///
    /// Looks for `.schema-bridge.toml` in the directory. Falls back to defaults if not
    /// found. Environment overrides are applied in both cases.
    pub fn load(workspace_path: &Path) -> ConfigResult<Self> {
        let config_path = workspace_path.join(CONFIG_FILENAME);
        let mut config = if config_path.exists() {
            Self::read_file(&config_path)?
        } else {
            Self::default()
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from an explicit file, then apply environment overrides
    pub fn load_file(path: &Path) -> ConfigResult<Self> {
        let mut config = Self::read_file(path)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Io(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.generator.fk_suffix.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "generator.fk_suffix".to_string(),
                value: String::new(),
                reason: "suffix must not be empty".to_string(),
            });
        }
        for (table, entity) in &self.entities {
            if entity.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: format!("entities.{}", table),
                    value: entity.clone(),
                    reason: "entity name must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> ConfigResult<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps an environment variable name to its value
    pub fn apply_env_with<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_ON_DELETE) {
            self.generator.on_delete =
                value
                    .parse()
                    .map_err(|reason| ConfigError::InvalidValue {
                        key: ENV_ON_DELETE.to_string(),
                        value: value.clone(),
                        reason,
                    })?;
        }

        if let Some(value) = lookup(ENV_FK_SUFFIX) {
            self.generator.fk_suffix = value;
        }

        if let Some(value) = lookup(ENV_MANAGED) {
            self.export.managed = match value.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_MANAGED.to_string(),
                        value,
                        reason: "expected true or false".to_string(),
                    });
                }
            };
        }

        self.validate()
    }
}

/// Generate a sample configuration file content
pub fn sample_config() -> &'static str {
    r#"# schema-bridge configuration

[generator]
# Referential action of generated foreign keys:
# cascade, protect, restrict, set_null, set_default or do_nothing (default)
on_delete = "do_nothing"

# Appended to foreign key columns that do not end in "_id"
fk_suffix = "_fk"

[export]
# Whether the target system creates and migrates the tables
managed = false

# Target entity names, registered before generation
[entities]
# child = "DMChild"

# User-declared fields win over generated ones
# [overrides.Child.name]
# kind = "plain"
# field_type = { type = "char", max_length = 100 }
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldSpec, FieldType, PlainField};
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::new();
        assert_eq!(config.generator.on_delete, OnDelete::DoNothing);
        assert_eq!(config.generator.fk_suffix, "_fk");
        assert!(!config.export.managed);
        assert!(config.entities.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[generator]
on_delete = "cascade"
fk_suffix = "_ref"

[export]
managed = true

[entities]
child = "DMChild"

[overrides.Child.name]
kind = "plain"
field_type = { type = "char", max_length = 100 }
"#;
        let config = GeneratorConfig::parse(toml).unwrap();
        assert_eq!(config.generator.on_delete, OnDelete::Cascade);
        assert_eq!(config.generator.fk_suffix, "_ref");
        assert!(config.export.managed);
        assert_eq!(config.entities.get("child").map(String::as_str), Some("DMChild"));
        assert_eq!(
            config.overrides["Child"]["name"],
            FieldSpec::Plain(PlainField::new(FieldType::Char {
                max_length: Some(100)
            }))
        );
    }

    #[test]
    fn test_sample_config_parses() {
        let config = GeneratorConfig::parse(sample_config()).unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_empty_suffix_rejected() {
        let err = GeneratorConfig::parse("[generator]\nfk_suffix = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_ON_DELETE, "set-null"),
            (ENV_FK_SUFFIX, "_key"),
            (ENV_MANAGED, "yes"),
        ]
        .into_iter()
        .collect();
        let mut config = GeneratorConfig::new();
        config
            .apply_env_with(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.generator.on_delete, OnDelete::SetNull);
        assert_eq!(config.generator.fk_suffix, "_key");
        assert!(config.export.managed);
    }

    #[test]
    fn test_invalid_env_value() {
        let mut config = GeneratorConfig::new();
        let err = config
            .apply_env_with(|key| (key == ENV_ON_DELETE).then(|| "explode".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_ON_DELETE));
    }

    #[test]
    fn test_load_from_workspace() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILENAME),
            "[entities]\nparent = \"DMParent\"\n",
        )
        .unwrap();
        let config = GeneratorConfig::read_file(&dir.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(config.entities["parent"], "DMParent");
    }

    #[test]
    fn test_to_toml() {
        let mut config = GeneratorConfig::new();
        config.entities.insert("child".to_string(), "DMChild".to_string());
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("DMChild"));
        assert_eq!(GeneratorConfig::parse(&toml).unwrap(), config);
    }
}
