//! Row helpers: generated code that turns a message value into a tuple
//! lined up with the columns of its table.

pub mod python;

use proto_mysql_schema::{FileDef, SchemaIndex};

use crate::{generator::OutputFile, table::TableDef};

pub const HELPER_NAMES: [&str; 1] = ["python"];

pub trait AccessorEmitter {
    fn name(&self) -> &'static str;

    /// `tables` are the tables generated for `file`, in order.
    fn emit(&self, index: &SchemaIndex, file: &FileDef, tables: &[TableDef]) -> Vec<OutputFile>;
}

pub fn emitter_for(name: &str) -> Option<Box<dyn AccessorEmitter>> {
    match name {
        "python" => Some(Box::new(python::PythonEmitter)),
        _ => None,
    }
}

/// Splits `path` into the scopes leading to a declaration and its name.
pub(crate) fn split_declaration(path: &str) -> (Vec<&str>, &str) {
    let mut segments = proto_mysql_schema::split_path(path);
    let name = segments.pop().unwrap_or_default();
    (segments, name)
}
