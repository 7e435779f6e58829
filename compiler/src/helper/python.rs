use proto_mysql_schema::{FileDef, Namespace, SchemaIndex};

use super::{split_declaration, AccessorEmitter};
use crate::{
    column::ValueEncoding,
    generator::OutputFile,
    table::{ColumnDef, TableDef},
    utils::quote,
};

const PREAMBLE: &str = "from typing import Any, List, Mapping, Tuple
from google.protobuf import json_format
import json
";

const PYTHON_KEYWORDS: [&str; 35] = [
    "False", "None", "True", "and", "as", "assert", "async", "await", "break",
    "class", "continue", "def", "del", "elif", "else", "except", "finally", "for",
    "from", "global", "if", "import", "in", "is", "lambda", "nonlocal", "not",
    "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

pub struct PythonEmitter;

impl AccessorEmitter for PythonEmitter {
    fn name(&self) -> &'static str {
        "python"
    }

    fn emit(&self, index: &SchemaIndex, file: &FileDef, tables: &[TableDef]) -> Vec<OutputFile> {
        let mut sections = vec![PREAMBLE.to_string()];

        let mut dicts = Vec::new();
        collect_enum_dicts(index.root(), &[], &mut dicts);
        sections.extend(dicts);

        for table in tables {
            sections.push(generate_methods(table));
        }

        vec![OutputFile {
            name:    helper_file_name(&file.name),
            content: sections.join("\n"),
        }]
    }
}

/// `foo/bar.proto` → `foo/bar_sqlhelper.py`
pub fn helper_file_name(proto_name: &str) -> String {
    let stem = proto_name.strip_suffix(".proto").unwrap_or(proto_name);
    format!("{}_sqlhelper.py", stem)
}

/// Name of the number → name dict for an enum declared under `scopes`.
/// The root scope contributes an empty segment: `.foo.Color` becomes
/// `ENUMDICT__foo_Color`.
pub fn enum_dict_name(scopes: &[&str], name: &str) -> String {
    let prefix: String = scopes.iter().map(|s| format!("_{}", s)).collect();
    format!("ENUMDICT_{}_{}", prefix, name)
}

fn collect_enum_dicts(namespace: &Namespace, scopes: &[&str], out: &mut Vec<String>) {
    for enum_ in namespace.enums() {
        let entries: Vec<String> = enum_
            .values
            .iter()
            .map(|v| format!("\t{}: {},", v.number, quote(&v.name)))
            .collect();
        out.push(format!(
            "{} = {{\n{}\n}}\n",
            enum_dict_name(scopes, &enum_.name),
            entries.join("\n")
        ));
    }
    for (name, child) in namespace.children() {
        let mut nested = scopes.to_vec();
        nested.push(name);
        collect_enum_dicts(child, &nested, out);
    }
}

fn attribute(field: &str) -> String {
    if PYTHON_KEYWORDS.contains(&field) {
        format!("getattr(value, {})", quote(field))
    } else {
        format!("value.{}", field)
    }
}

fn column_expression(column: &ColumnDef) -> String {
    let value = attribute(&column.name);
    let expr = match &column.encoding {
        ValueEncoding::Raw => value,
        ValueEncoding::EnumName { path } => {
            let (scopes, name) = split_declaration(path);
            format!("{}[{}]", enum_dict_name(&scopes, name), value)
        }
        ValueEncoding::JsonList => format!("json.dumps(list({}))", value),
        ValueEncoding::JsonMessageList => {
            format!("json.dumps([json_format.MessageToDict(v) for v in {}])", value)
        }
        ValueEncoding::JsonMap { message_values: false } => format!("json.dumps(dict({}))", value),
        ValueEncoding::JsonMap { message_values: true } => format!(
            "json.dumps({{k: json_format.MessageToDict(v) for k, v in {}.items()}})",
            value
        ),
        ValueEncoding::JsonMessage => format!("json_format.MessageToJson({})", value),
        ValueEncoding::SerializedRecord => return "value.SerializeToString()".to_string(),
    };

    if column.column_type.nullable {
        format!("{} if value.HasField({}) else None", expr, quote(&column.name))
    } else {
        expr
    }
}

fn generate_methods(table: &TableDef) -> String {
    let names: Vec<String> = table.columns.iter().map(|c| quote(&c.name)).collect();
    let elems: Vec<String> = table.columns.iter().map(column_expression).collect();

    format!(
        "def get{name}ColumnNames() -> List[str]:\n\
         \treturn [{names}]\n\
         \n\
         # convert proto message class variable to INSERT-ready tuple\n\
         def conv{name}ProtoClassToData(value) -> Tuple:\n\
         \treturn ({elems},)\n",
        name = table.name,
        names = names.join(", "),
        elems = elems.join(", "),
    )
}
