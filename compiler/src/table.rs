use proto_mysql_schema::{FileDef, MessageDef, SchemaIndex};
use serde::Serialize;
use tracing::debug;

use crate::{
    column::{map_field, ColumnType, MySqlType, ValueEncoding},
    diagnostics::{Diagnostic, DiagnosticKind, Generated},
    utils::escape_identifier,
};

/// Trailing column holding the serialized record, so a row can always be
/// turned back into the original message.
pub const RAW_COLUMN: &str = "PROTO_BINARY";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDef {
    pub name:        String,
    pub column_type: ColumnType,
    pub encoding:    ValueEncoding,
}

impl ColumnDef {
    fn raw_record() -> Self {
        ColumnDef {
            name:        RAW_COLUMN.to_string(),
            column_type: ColumnType::not_null(MySqlType::Blob),
            encoding:    ValueEncoding::SerializedRecord,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableDef {
    pub name:    String,
    /// Field columns in declaration order, then [`RAW_COLUMN`].
    pub columns: Vec<ColumnDef>,
}

impl TableDef {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn to_sql(&self, if_not_exists: bool) -> String {
        let definitions: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("\t{} {}", escape_identifier(&c.name), c.column_type))
            .collect();

        format!(
            "CREATE TABLE {}{} (\n{}\n);",
            if if_not_exists { "IF NOT EXISTS " } else { "" },
            escape_identifier(&self.name),
            definitions.join(",\n"),
        )
    }
}

/// Builds the table for one record type. Fields that cannot be mapped are
/// left out and reported.
pub fn generate_table(index: &SchemaIndex, file_name: &str, message: &MessageDef) -> Generated<TableDef> {
    let mut result = Generated::new(TableDef {
        name:    message.name.clone(),
        columns: Vec::with_capacity(message.fields.len() + 1),
    });

    for field in &message.fields {
        let problem = |kind| Diagnostic::field(file_name, &message.name, &field.name, kind);

        if field.name.is_empty() {
            result.report(problem(DiagnosticKind::EmptyFieldName));
            continue;
        }
        if field.name == RAW_COLUMN {
            result.report(problem(DiagnosticKind::ReservedColumnName));
            continue;
        }

        match map_field(index, field) {
            Ok(column_type) => {
                let encoding = ValueEncoding::of(index, field, &column_type);
                result.output.columns.push(ColumnDef {
                    name: field.name.clone(),
                    column_type,
                    encoding,
                });
            }
            Err(err) => result.report(problem(err.into())),
        }
    }

    result.output.columns.push(ColumnDef::raw_record());
    result
}

/// One table per top-level record type of `file`, in declaration order.
/// Nested types only serve as reference targets.
pub fn generate_tables(index: &SchemaIndex, file: &FileDef) -> Generated<Vec<TableDef>> {
    let mut result = Generated::new(Vec::with_capacity(file.messages.len()));
    for message in &file.messages {
        debug!("generating table {} from {}", message.name, file.name);
        let table = result.absorb(generate_table(index, &file.name, message));
        result.output.push(table);
    }
    result
}

/// Concatenates the CREATE TABLE statements, separated by blank lines.
pub fn render_sql(tables: &[TableDef], if_not_exists: bool) -> String {
    if tables.is_empty() {
        return String::new();
    }
    let statements: Vec<String> = tables.iter().map(|t| t.to_sql(if_not_exists)).collect();
    format!("{}\n", statements.join("\n\n"))
}
