//! proto-mysql-compiler
//!
//! This crate implements:
//!  1) Building a per-file symbol table from the file and its direct imports,
//!  2) Resolving field types and mapping them to MySQL column types,
//!  3) `CREATE TABLE` generation, one table per top-level message,
//!  4) Row helper generation (`helper::python`),
//!  5) The protoc plugin envelope (`run_plugin`), error types (`GenError`)
//!     and per-field diagnostics.

pub mod error;
pub mod diagnostics;
pub mod utils;
pub mod options;
pub mod resolver;
pub mod column;
pub mod table;
pub mod index;
pub mod helper;
pub mod generator;
pub mod plugin;

pub use column::{map_field, ColumnType, MySqlType};
pub use diagnostics::{Diagnostic, DiagnosticKind, Generated};
pub use error::{GenError, MappingError};
pub use generator::{generate, generate_file, FileOutput, OutputFile};
pub use index::{build_index, FileSet};
pub use options::GeneratorOptions;
pub use plugin::{process_request, run_plugin};
pub use table::{generate_table, generate_tables, TableDef, RAW_COLUMN};
