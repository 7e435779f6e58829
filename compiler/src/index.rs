use std::collections::BTreeMap;

use prost_types::FileDescriptorProto;
use proto_mysql_schema::{FileDef, SchemaIndex};
use tracing::debug;

use crate::diagnostics::{Diagnostic, Generated};

/// Every file of a request, by name.
#[derive(Debug, Clone, Default)]
pub struct FileSet {
    files: BTreeMap<String, FileDef>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_descriptors(descriptors: &[FileDescriptorProto]) -> Self {
        let mut set = FileSet::new();
        for desc in descriptors {
            set.add(FileDef::from(desc));
        }
        set
    }

    pub fn add(&mut self, file: FileDef) {
        self.files.insert(file.name.clone(), file);
    }

    pub fn get(&self, name: &str) -> Option<&FileDef> {
        self.files.get(name)
    }
}

impl FromIterator<FileDef> for FileSet {
    fn from_iter<I: IntoIterator<Item = FileDef>>(iter: I) -> Self {
        let mut set = FileSet::new();
        for file in iter {
            set.add(file);
        }
        set
    }
}

/// Builds the symbol table for generating `target`: its own declarations
/// plus the top-level declarations of its direct imports. Imports of those
/// imports are not followed.
pub fn build_index(files: &FileSet, target: &FileDef) -> Generated<SchemaIndex> {
    debug!("{} depends on {:?}", target.name, target.dependencies);

    let mut result = Generated::new(SchemaIndex::new());
    for dependency in &target.dependencies {
        match files.get(dependency) {
            Some(file) => result.output.insert_file(file),
            None => result.report(Diagnostic::missing_dependency(&target.name, dependency)),
        }
    }
    result.output.insert_file(target);

    debug!("symbol table for {}:\n{}", target.name, result.output.dump_tree());
    result
}
