//! Django exporter for generating `models.py` source from entity definitions.
//!
//! # Security
//!
//! Entity and field names are emitted verbatim as Python identifiers, so they are
//! validated first. All string literals are escaped.

use super::order::dependency_order;
use super::{ExportError, ExportResult};
use crate::models::{
    FieldOptions, FieldSpec, FieldType, ForeignKeyField, ManyToManyField, OnDelete, PlainField,
    RelatedName, TargetEntityDefinition,
};
use crate::validation::input::{validate_entity_name, validate_identifier};

/// Exporter for Django model modules.
#[derive(Debug, Clone, Copy, Default)]
pub struct DjangoExporter {
    /// Value of `Meta.managed` on every generated model
    pub managed: bool,
}

impl DjangoExporter {
    pub fn new(managed: bool) -> Self {
        Self { managed }
    }

    /// Export definitions to a `models.py` module.
    ///
    /// Models are emitted in dependency order (referenced models first).
    ///
    /// # Example
    ///
    /// ```rust
    /// use schema_bridge::convert::SchemaGenerator;
    /// use schema_bridge::export::DjangoExporter;
    /// use schema_bridge::models::{ColumnType, SourceColumn, SourceEntity};
    ///
    /// let dog = SourceEntity::new("dog")
    ///     .with_column(SourceColumn::new("id", ColumnType::Integer).primary_key())
    ///     .with_column(SourceColumn::new("name", ColumnType::String { length: Some(50) }));
    /// let definitions = SchemaGenerator::default().generate_all(&[dog]).unwrap();
    ///
    /// let result = DjangoExporter::default().export(&definitions).unwrap();
    /// assert_eq!(result.format, "django");
    /// assert!(result.content.contains("class Dog(models.Model):"));
    /// assert!(result.content.contains("db_table = \"dog\""));
    /// ```
    pub fn export(&self, definitions: &[TargetEntityDefinition]) -> Result<ExportResult, ExportError> {
        for definition in definitions {
            validate_entity_name(&definition.name).map_err(|e| {
                ExportError::ValidationError(format!("entity '{}': {}", definition.name, e))
            })?;
            for name in definition.fields.keys() {
                validate_identifier(name, "field name").map_err(|e| {
                    ExportError::ValidationError(format!("{}.{}: {}", definition.name, name, e))
                })?;
            }
        }

        let mut content = String::new();
        content.push_str("# Generated by schema-bridge. Do not edit by hand.\n");
        content.push_str("from django.db import models\n");
        if definitions.iter().any(uses_citext) {
            content.push_str("from django.contrib.postgres.fields import CITextField\n");
        }

        for index in dependency_order(definitions) {
            content.push_str("\n\n");
            content.push_str(&self.export_model(&definitions[index]));
        }

        Ok(ExportResult {
            content,
            format: "django".to_string(),
        })
    }

    fn export_model(&self, definition: &TargetEntityDefinition) -> String {
        let mut model = format!("class {}(models.Model):\n", definition.name);
        for (name, spec) in &definition.fields {
            model.push_str(&format!("    {} = {}\n", name, render_field(spec)));
        }
        if !definition.fields.is_empty() {
            model.push('\n');
        }
        model.push_str("    class Meta:\n");
        model.push_str(&format!(
            "        managed = {}\n",
            if self.managed { "True" } else { "False" }
        ));
        model.push_str(&format!("        db_table = {}\n", quote(&definition.table)));
        model
    }
}

fn uses_citext(definition: &TargetEntityDefinition) -> bool {
    definition.fields.values().any(|spec| {
        matches!(
            spec,
            FieldSpec::Plain(PlainField {
                field_type: FieldType::CIText,
                ..
            })
        )
    })
}

fn render_field(spec: &FieldSpec) -> String {
    match spec {
        FieldSpec::Plain(field) => render_plain(field),
        FieldSpec::ForeignKey(field) => render_foreign_key(field),
        FieldSpec::ManyToMany(field) => render_many_to_many(field),
    }
}

fn render_plain(field: &PlainField) -> String {
    let (class, mut args) = match &field.field_type {
        FieldType::Integer => ("models.IntegerField", Vec::new()),
        FieldType::BigInteger => ("models.BigIntegerField", Vec::new()),
        FieldType::Float => ("models.FloatField", Vec::new()),
        FieldType::Char { max_length } => (
            "models.CharField",
            max_length
                .map(|n| vec![format!("max_length={}", n)])
                .unwrap_or_default(),
        ),
        FieldType::CIText => ("CITextField", Vec::new()),
        FieldType::Boolean => ("models.BooleanField", Vec::new()),
        FieldType::Binary => ("models.BinaryField", Vec::new()),
        FieldType::Date => ("models.DateField", Vec::new()),
        FieldType::DateTime => ("models.DateTimeField", Vec::new()),
    };
    push_options(&mut args, &field.options);
    format!("{}({})", class, args.join(", "))
}

fn render_foreign_key(field: &ForeignKeyField) -> String {
    let mut args = vec![
        quote(&field.to.to_string()),
        format!("on_delete={}", on_delete_constant(field.on_delete)),
        format!("db_column={}", quote(&field.db_column)),
        format!("to_field={}", quote(&field.to_field)),
        format!("related_name={}", quote(&related_name(&field.related_name))),
    ];
    push_options(&mut args, &field.options);
    format!("models.ForeignKey({})", args.join(", "))
}

fn render_many_to_many(field: &ManyToManyField) -> String {
    let (local, remote) = &field.through_fields;
    let args = [
        quote(&field.to.to_string()),
        format!("through={}", quote(&field.through)),
        format!("through_fields=({}, {})", quote(local), quote(remote)),
        format!("related_name={}", quote(&related_name(&field.related_name))),
    ];
    format!("models.ManyToManyField({})", args.join(", "))
}

/// Keyword arguments that differ from the framework defaults.
fn push_options(args: &mut Vec<String>, options: &FieldOptions) {
    if options.primary_key {
        args.push("primary_key=True".to_string());
    }
    if options.unique {
        args.push("unique=True".to_string());
    }
    if options.null {
        args.push("null=True".to_string());
    }
    if options.blank {
        args.push("blank=True".to_string());
    }
    if let Some(help_text) = &options.help_text {
        args.push(format!("help_text={}", quote(help_text)));
    }
}

fn related_name(name: &RelatedName) -> String {
    match name {
        RelatedName::Name(name) => name.clone(),
        RelatedName::Suppressed => "+".to_string(),
    }
}

fn on_delete_constant(on_delete: OnDelete) -> &'static str {
    match on_delete {
        OnDelete::Cascade => "models.CASCADE",
        OnDelete::Protect => "models.PROTECT",
        OnDelete::Restrict => "models.RESTRICT",
        OnDelete::SetNull => "models.SET_NULL",
        OnDelete::SetDefault => "models.SET_DEFAULT",
        OnDelete::DoNothing => "models.DO_NOTHING",
    }
}

/// Double-quoted Python string literal
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityRef;

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote("a\"b\\c\nd"), "\"a\\\"b\\\\c\\nd\"");
    }

    #[test]
    fn test_render_plain_options() {
        let field = PlainField {
            field_type: FieldType::Char {
                max_length: Some(50),
            },
            options: FieldOptions {
                null: true,
                blank: true,
                help_text: Some("Dog's name".to_string()),
                ..Default::default()
            },
        };
        assert_eq!(
            render_plain(&field),
            "models.CharField(max_length=50, null=True, blank=True, help_text=\"Dog's name\")"
        );
    }

    #[test]
    fn test_render_self_reference_without_accessor() {
        let field = ForeignKeyField {
            to: EntityRef::SelfRef,
            on_delete: OnDelete::Cascade,
            db_column: "parent_id".to_string(),
            to_field: "id".to_string(),
            related_name: RelatedName::Suppressed,
            options: FieldOptions::default(),
        };
        assert_eq!(
            render_foreign_key(&field),
            "models.ForeignKey(\"self\", on_delete=models.CASCADE, db_column=\"parent_id\", to_field=\"id\", related_name=\"+\")"
        );
    }

    #[test]
    fn test_rejects_keyword_field_names() {
        let mut definition = TargetEntityDefinition {
            name: "Dog".to_string(),
            table: "dog".to_string(),
            fields: Default::default(),
            primary_key: None,
            skipped: Vec::new(),
        };
        definition.fields.insert(
            "class".to_string(),
            FieldSpec::Plain(PlainField::new(FieldType::Integer)),
        );
        let err = DjangoExporter::default().export(&[definition]).unwrap_err();
        assert!(matches!(err, ExportError::ValidationError(_)));
    }
}
