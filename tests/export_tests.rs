//! Export module tests

use pretty_assertions::assert_eq;
use schema_bridge::convert::SchemaGenerator;
use schema_bridge::export::{DjangoExporter, JsonExporter, YamlExporter};
use schema_bridge::models::{
    ColumnType, SourceColumn, SourceEntity, SourceRelationship, TargetEntityDefinition,
};

fn parent_child() -> Vec<TargetEntityDefinition> {
    let parent = SourceEntity::new("parent")
        .with_column(SourceColumn::new("id", ColumnType::Integer).primary_key())
        .with_column(SourceColumn::new("name", ColumnType::String { length: Some(50) }).nullable(false));
    let child = SourceEntity::new("child")
        .with_column(SourceColumn::new("key", ColumnType::Integer).primary_key())
        .with_column(SourceColumn::new("name", ColumnType::String { length: Some(50) }))
        .with_column(SourceColumn::new("parent_id", ColumnType::Integer).references("parent", "id"))
        .with_relationship(
            SourceRelationship::many_to_one("parent", "parent")
                .pair("parent_id", "id")
                .back_populates("children"),
        );
    // Child first: the exporter reorders by dependency
    SchemaGenerator::default()
        .generate_all(&[child, parent])
        .unwrap()
}

mod django_export_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_parent_child_module() {
        let result = DjangoExporter::default().export(&parent_child()).unwrap();
        assert_eq!(result.format, "django");
        assert_eq!(
            result.content,
            r#"# Generated by schema-bridge. Do not edit by hand.
from django.db import models


class Parent(models.Model):
    id = models.IntegerField(primary_key=True)
    name = models.CharField(max_length=50)

    class Meta:
        managed = False
        db_table = "parent"


class Child(models.Model):
    parent = models.ForeignKey("Parent", on_delete=models.DO_NOTHING, db_column="parent_id", to_field="id", related_name="children", null=True, blank=True)
    key = models.IntegerField(primary_key=True)
    name = models.CharField(max_length=50, null=True, blank=True)

    class Meta:
        managed = False
        db_table = "child"
"#
        );
    }

    #[test]
    fn test_render_many_to_many_and_citext() {
        let car = SourceEntity::new("car")
            .with_column(SourceColumn::new("id", ColumnType::Integer).primary_key())
            .with_column(SourceColumn::new("plate", ColumnType::CIText));
        let parent = SourceEntity::new("parent")
            .with_column(SourceColumn::new("id", ColumnType::Integer).primary_key())
            .with_relationship(
                SourceRelationship::many_to_many("cars", "car", "cartoparent")
                    .sync("id", "parent_id")
                    .secondary_sync("id", "car_id"),
            );
        let junction = SourceEntity::new("cartoparent")
            .named("CarParentAssoc")
            .with_column(SourceColumn::new("car_id", ColumnType::Integer).references("car", "id"))
            .with_column(SourceColumn::new("parent_id", ColumnType::Integer).references("parent", "id"));
        let definitions = SchemaGenerator::default()
            .generate_all(&[parent, car, junction])
            .unwrap();

        let content = DjangoExporter::new(true).export(&definitions).unwrap().content;
        assert!(content.contains("from django.contrib.postgres.fields import CITextField\n"));
        assert!(content.contains("    plate = CITextField(null=True, blank=True)\n"));
        assert!(content.contains(
            "    cars = models.ManyToManyField(\"Car\", through=\"CarParentAssoc\", through_fields=(\"parent\", \"car\"), related_name=\"+\")\n"
        ));
        assert!(content.contains("        managed = True\n"));

        // Car is referenced by both other models
        let car_at = content.find("class Car(").unwrap();
        let parent_at = content.find("class Parent(").unwrap();
        let junction_at = content.find("class CarParentAssoc(").unwrap();
        assert!(car_at < parent_at);
        assert!(parent_at < junction_at);
    }
}

mod document_export_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_json_round_trips_definitions() {
        let definitions = parent_child();
        let result = JsonExporter.export(&definitions).unwrap();
        let value: serde_json::Value = serde_json::from_str(&result.content).unwrap();
        let parsed: Vec<TargetEntityDefinition> =
            serde_json::from_value(value["entities"].clone()).unwrap();
        assert_eq!(parsed, definitions);
        assert_eq!(value["entities"][0]["fields"]["parent"]["to"], "Parent");
        assert_eq!(value["entities"][0]["fields"]["parent"]["related_name"], "children");
    }

    #[test]
    fn test_yaml_lists_entities_in_generation_order() {
        let result = YamlExporter.export(&parent_child()).unwrap();
        assert_eq!(result.format, "yaml");
        let child_at = result.content.find("table: child").unwrap();
        let parent_at = result.content.find("table: parent").unwrap();
        assert!(child_at < parent_at);
    }
}
