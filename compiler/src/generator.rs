use proto_mysql_schema::FileDef;
use serde::Serialize;
use tracing::info;

use crate::{
    diagnostics::Generated,
    error::GenError,
    helper::emitter_for,
    index::{build_index, FileSet},
    options::GeneratorOptions,
    table::{generate_tables, render_sql, TableDef},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputFile {
    pub name:    String,
    pub content: String,
}

/// Everything produced for one requested file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileOutput {
    pub file:   String,
    pub tables: Vec<TableDef>,
    /// The `.sql` artifact first, then helper files.
    pub files:  Vec<OutputFile>,
}

pub fn sql_file_name(proto_name: &str) -> String {
    format!("{}.sql", proto_name)
}

/// Runs the whole pipeline for `target` with a symbol table of its own.
pub fn generate_file(
    files: &FileSet,
    target: &FileDef,
    options: &GeneratorOptions,
) -> Result<Generated<FileOutput>, GenError> {
    let mut result = Generated::new(FileOutput {
        file:   target.name.clone(),
        tables: Vec::new(),
        files:  Vec::new(),
    });

    let index = result.absorb(build_index(files, target));
    let tables = result.absorb(generate_tables(&index, target));

    result.output.files.push(OutputFile {
        name:    sql_file_name(&target.name),
        content: render_sql(&tables, options.if_not_exists),
    });

    for helper in &options.helpers {
        let emitter = emitter_for(helper).ok_or_else(|| GenError::UnknownHelper(helper.clone()))?;
        let generated = emitter.emit(&index, target, &tables);
        result.output.files.extend(generated);
    }

    result.output.tables = tables;
    info!(
        "generated {} table(s) for {} with {} diagnostic(s)",
        result.output.tables.len(),
        target.name,
        result.diagnostics.len()
    );
    Ok(result)
}

/// Generates every requested file, in request order.
pub fn generate(
    files: &FileSet,
    requested: &[String],
    options: &GeneratorOptions,
) -> Result<Generated<Vec<FileOutput>>, GenError> {
    let mut result = Generated::new(Vec::with_capacity(requested.len()));
    for name in requested {
        let target = files.get(name).ok_or_else(|| GenError::FileNotFound(name.clone()))?;
        let output = result.absorb(generate_file(files, target, options)?);
        result.output.push(output);
    }
    Ok(result)
}
