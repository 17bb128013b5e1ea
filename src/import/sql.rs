//! SQL Import functionality
//!
//! Provides parsing of CREATE TABLE statements from various SQL dialects.
//!
//! Uses `sqlparser` to parse CREATE TABLE statements into source entities. DDL carries
//! no relationship objects, so every foreign key found here is named by convention
//! during generation.
//!
//! Recovered metadata:
//! - column types, NOT NULL / NULL, UNIQUE, PRIMARY KEY (column and table level)
//! - column comments (inline `COMMENT '...'` and `COMMENT ON COLUMN`)
//! - foreign keys (inline `REFERENCES` and table-level `FOREIGN KEY`)

use super::{ImportError, ImportResult};
use crate::models::{ColumnType, ForeignKeyTarget, SourceColumn, SourceEntity, SourceSchema};
use crate::validation::input::validate_table_name;
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use sqlparser::ast::{ColumnDef, ColumnOption, ObjectName, Statement, TableConstraint};
use sqlparser::dialect::{
    AnsiDialect, Dialect, GenericDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect,
    SQLiteDialect,
};
use sqlparser::parser::Parser;
use std::collections::{HashMap, HashSet};

// Static regex patterns compiled once for performance
static RE_INLINE_REFERENCES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^REFERENCES\s+([^\s(]+)\s*(?:\(([^)]*)\))?").expect("Invalid regex")
});
static RE_FOREIGN_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)FOREIGN\s+KEY\s*(?:\S+\s*)?\(([^)]*)\)\s*REFERENCES\s+([^\s(]+)\s*(?:\(([^)]*)\))?")
        .expect("Invalid regex")
});
static RE_UNIQUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:CONSTRAINT\s+\S+\s+)?UNIQUE\b[^(]*\(([^)]*)\)").expect("Invalid regex")
});
static RE_COMMENT_ON_COLUMN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^COMMENT\s+ON\s+COLUMN\s+(\S+)\s+IS\s+'(.*)'$").expect("Invalid regex")
});

/// Foreign key whose referenced column is resolved once every table is known
#[derive(Debug)]
struct PendingReference {
    table: String,
    column: String,
    referenced_table: String,
    referenced_column: Option<String>,
}

/// SQL Importer - parses CREATE TABLE statements
pub struct SQLImporter {
    /// SQL dialect to use for parsing
    pub dialect: String,
}

impl Default for SQLImporter {
    fn default() -> Self {
        Self {
            dialect: "generic".to_string(),
        }
    }
}

impl SQLImporter {
    /// Create a new SQL importer with the specified dialect
    ///
    /// # Supported Dialects
    ///
    /// - **ansi**: ANSI SQL dialect
    /// - **mssql** / **sqlserver**: Microsoft SQL Server dialect
    /// - **mysql**: MySQL dialect
    /// - **postgres** / **postgresql**: PostgreSQL dialect
    /// - **sqlite**: SQLite dialect
    /// - **generic**: Generic SQL dialect (default)
    ///
    /// # Example
    ///
    /// ```rust
    /// use schema_bridge::import::sql::SQLImporter;
    ///
    /// let importer = SQLImporter::new("postgres");
    /// let result = importer
    ///     .parse("CREATE TABLE dog (id INT PRIMARY KEY, name VARCHAR(50));")
    ///     .unwrap();
    /// assert_eq!(result.schema.entities[0].table, "dog");
    /// ```
    pub fn new(dialect: &str) -> Self {
        Self {
            dialect: dialect.to_string(),
        }
    }

    /// Parse SQL DDL into source entities
    ///
    /// Statements other than CREATE TABLE and COMMENT ON COLUMN are ignored. A syntax
    /// error yields an empty schema with the error recorded.
    pub fn parse(&self, sql: &str) -> Result<ImportResult> {
        let dialect = self.dialect_impl();
        let statements = match Parser::parse_sql(dialect.as_ref(), sql) {
            Ok(stmts) => stmts,
            Err(e) => {
                return Ok(ImportResult {
                    schema: SourceSchema::default(),
                    errors: vec![ImportError::ParseError(e.to_string())],
                });
            }
        };

        let mut entities: Vec<SourceEntity> = Vec::new();
        let mut pending: Vec<PendingReference> = Vec::new();
        let mut comments: Vec<(String, String)> = Vec::new();
        let mut errors = Vec::new();

        for stmt in statements {
            match stmt {
                Statement::CreateTable(create) => {
                    match self.parse_create_table(
                        &create.name,
                        &create.columns,
                        &create.constraints,
                        &mut pending,
                        &mut errors,
                    ) {
                        Ok(entity) => entities.push(entity),
                        Err(e) => errors.push(ImportError::ParseError(e)),
                    }
                }
                other => {
                    let text = other.to_string();
                    if let Some(caps) = RE_COMMENT_ON_COLUMN.captures(&text) {
                        comments.push((caps[1].to_string(), caps[2].replace("''", "'")));
                    }
                    // Other statements (INSERT, CREATE INDEX, etc.) are ignored.
                }
            }
        }

        Self::apply_column_comments(&mut entities, comments, &mut errors);
        Self::resolve_references(&mut entities, pending);

        tracing::info!("Imported {} tables from SQL", entities.len());
        Ok(ImportResult {
            schema: SourceSchema::new(entities),
            errors,
        })
    }

    fn dialect_impl(&self) -> Box<dyn Dialect + Send + Sync> {
        match self.dialect.to_lowercase().as_str() {
            "ansi" => Box::new(AnsiDialect {}),
            "mssql" | "sqlserver" => Box::new(MsSqlDialect {}),
            "mysql" => Box::new(MySqlDialect {}),
            "postgres" | "postgresql" => Box::new(PostgreSqlDialect {}),
            "sqlite" => Box::new(SQLiteDialect {}),
            _ => Box::new(GenericDialect {}),
        }
    }

    /// Strip quote characters from an identifier
    ///
    /// Handles various SQL quoting styles:
    /// - Double quotes: `"identifier"` -> `identifier`
    /// - Backticks: `` `identifier` `` -> `identifier`
    /// - Brackets: `[identifier]` -> `identifier`
    ///
    /// Also handles escaped quotes within identifiers:
    /// - `""` -> `"` (PostgreSQL style)
    /// - ``` `` ``` -> `` ` `` (MySQL style)
    /// - `]]` -> `]` (SQL Server style)
    fn unquote_identifier(identifier: &str) -> String {
        let trimmed = identifier.trim();

        if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
            let inner = &trimmed[1..trimmed.len() - 1];
            return inner.replace("\"\"", "\"");
        }

        if trimmed.starts_with('`') && trimmed.ends_with('`') && trimmed.len() >= 2 {
            let inner = &trimmed[1..trimmed.len() - 1];
            return inner.replace("``", "`");
        }

        if trimmed.starts_with('[') && trimmed.ends_with(']') && trimmed.len() >= 2 {
            let inner = &trimmed[1..trimmed.len() - 1];
            return inner.replace("]]", "]");
        }

        trimmed.to_string()
    }

    /// Last part of a possibly schema-qualified name, unquoted
    fn last_name_part(name: &str) -> String {
        let unquoted_parts: Vec<String> = split_qualified(name)
            .iter()
            .map(|part| Self::unquote_identifier(part))
            .collect();
        unquoted_parts
            .last()
            .cloned()
            .unwrap_or_else(|| Self::unquote_identifier(name))
    }

    fn object_name_to_string(name: &ObjectName) -> String {
        // Use final identifier (supports schema-qualified names).
        let raw_name = name
            .0
            .last()
            .map(|ident| ident.to_string())
            .unwrap_or_else(|| name.to_string());
        Self::unquote_identifier(&raw_name)
    }

    fn column_list(list: &str) -> Vec<String> {
        list.split(',')
            .map(Self::unquote_identifier)
            .filter(|c| !c.is_empty())
            .collect()
    }

    fn parse_create_table(
        &self,
        name: &ObjectName,
        columns: &[ColumnDef],
        constraints: &[TableConstraint],
        pending: &mut Vec<PendingReference>,
        errors: &mut Vec<ImportError>,
    ) -> std::result::Result<SourceEntity, String> {
        let table_name = Self::object_name_to_string(name);
        if table_name.is_empty() {
            return Err("CREATE TABLE without a table name".to_string());
        }

        // Validate table name (warnings are logged but don't fail import)
        if let Err(e) = validate_table_name(&table_name) {
            tracing::warn!("Table name validation warning: {}", e);
        }

        // Collect PK and single-column UNIQUE columns from table-level constraints.
        let mut pk_cols = HashSet::<String>::new();
        let mut unique_cols = HashSet::<String>::new();
        let mut table_references: Vec<PendingReference> = Vec::new();
        for c in constraints {
            if let TableConstraint::PrimaryKey(pk_constraint) = c {
                for col in &pk_constraint.columns {
                    pk_cols.insert(Self::unquote_identifier(&col.to_string()));
                }
                continue;
            }

            let text = c.to_string();
            if let Some(caps) = RE_FOREIGN_KEY.captures(&text) {
                let local = Self::column_list(&caps[1]);
                let remote = caps
                    .get(3)
                    .map(|m| Self::column_list(m.as_str()))
                    .unwrap_or_default();
                if local.len() != 1 || remote.len() > 1 {
                    tracing::warn!(
                        "Skipping multi-column foreign key on table '{}': {}",
                        table_name,
                        text
                    );
                    errors.push(ImportError::ValidationError(format!(
                        "multi-column foreign key on table '{}' ignored: {}",
                        table_name, text
                    )));
                    continue;
                }
                table_references.push(PendingReference {
                    table: table_name.clone(),
                    column: local[0].clone(),
                    referenced_table: Self::last_name_part(&caps[2]),
                    referenced_column: remote.into_iter().next(),
                });
            } else if let Some(caps) = RE_UNIQUE.captures(&text) {
                let cols = Self::column_list(&caps[1]);
                if let [single] = cols.as_slice() {
                    unique_cols.insert(single.clone());
                }
            }
        }

        let mut entity = SourceEntity::new(table_name.clone());
        for col in columns {
            let col_name = Self::unquote_identifier(&col.name.value);
            let mut nullable = None;
            let mut is_pk = pk_cols.contains(&col_name);
            let mut is_unique = unique_cols.contains(&col_name);
            let mut description = None;

            for opt_def in &col.options {
                match &opt_def.option {
                    ColumnOption::NotNull => nullable = Some(false),
                    ColumnOption::Null => nullable = Some(true),
                    ColumnOption::Unique(_) => is_unique = true,
                    ColumnOption::PrimaryKey(_) => is_pk = true,
                    ColumnOption::Comment(comment) => description = Some(comment.clone()),
                    other => {
                        let text = other.to_string();
                        if let Some(caps) = RE_INLINE_REFERENCES.captures(&text) {
                            pending.push(PendingReference {
                                table: table_name.clone(),
                                column: col_name.clone(),
                                referenced_table: Self::last_name_part(&caps[1]),
                                referenced_column: caps
                                    .get(2)
                                    .and_then(|m| Self::column_list(m.as_str()).into_iter().next()),
                            });
                        }
                    }
                }
            }

            let data_type = col.data_type.to_string();
            let mut column = SourceColumn::new(col_name, ColumnType::from(data_type.as_str()));
            column.nullable = nullable;
            column.primary_key = is_pk;
            column.unique = is_unique;
            column.description = description;
            entity.columns.push(column);
        }

        for reference in &table_references {
            if entity.column(&reference.column).is_none() {
                errors.push(ImportError::ValidationError(format!(
                    "foreign key on unknown column '{}.{}' ignored",
                    table_name, reference.column
                )));
            }
        }
        pending.extend(
            table_references
                .into_iter()
                .filter(|r| entity.column(&r.column).is_some()),
        );

        Ok(entity)
    }

    /// Attach `COMMENT ON COLUMN table.column IS '...'` statements
    fn apply_column_comments(
        entities: &mut [SourceEntity],
        comments: Vec<(String, String)>,
        errors: &mut Vec<ImportError>,
    ) {
        for (target, comment) in comments {
            let parts = split_qualified(&target);
            let [.., table, column] = parts.as_slice() else {
                continue;
            };
            let table = Self::unquote_identifier(table);
            let column = Self::unquote_identifier(column);
            let found = entities
                .iter_mut()
                .find(|e| e.table == table)
                .and_then(|e| e.columns.iter_mut().find(|c| c.name == column));
            match found {
                Some(col) => col.description = Some(comment),
                None => errors.push(ImportError::ValidationError(format!(
                    "comment on unknown column '{}.{}' ignored",
                    table, column
                ))),
            }
        }
    }

    /// Attach foreign keys. A reference without a column targets the referenced
    /// table's single primary key column, or `id` when that is unknown.
    fn resolve_references(entities: &mut [SourceEntity], pending: Vec<PendingReference>) {
        let primary_keys: HashMap<String, String> = entities
            .iter()
            .filter_map(|e| match e.primary_key_columns().as_slice() {
                [pk] => Some((e.table.clone(), pk.name.clone())),
                _ => None,
            })
            .collect();

        for reference in pending {
            let referenced_column = reference.referenced_column.unwrap_or_else(|| {
                primary_keys
                    .get(&reference.referenced_table)
                    .cloned()
                    .unwrap_or_else(|| "id".to_string())
            });
            if let Some(column) = entities
                .iter_mut()
                .find(|e| e.table == reference.table)
                .and_then(|e| e.columns.iter_mut().find(|c| c.name == reference.column))
            {
                column.foreign_keys.push(ForeignKeyTarget::new(
                    reference.referenced_table,
                    referenced_column,
                ));
            }
        }
    }
}

/// Split a dotted name, keeping dots inside quotes
fn split_qualified(name: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    for ch in name.trim().chars() {
        match (quote, ch) {
            (None, '.') => parts.push(std::mem::take(&mut current)),
            (None, '"' | '`') => {
                quote = Some(ch);
                current.push(ch);
            }
            (None, '[') => {
                quote = Some(']');
                current.push(ch);
            }
            (Some(q), c) if c == q => {
                quote = None;
                current.push(ch);
            }
            _ => current.push(ch),
        }
    }
    parts.push(current);
    parts
}
