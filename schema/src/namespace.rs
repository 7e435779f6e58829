use std::collections::BTreeMap;
use std::fmt::Write;

use crate::types::{EnumDef, FileDef, MessageDef};

pub const PATH_SEPARATOR: char = '.';

/// A scope in the symbol table: a package segment or the nested-type scope
/// of a message.
///
/// All maps are ordered by key, so anything walking the tree sees the same
/// order on every run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Namespace {
    /// Name of the message this scope belongs to. The definition itself is
    /// registered in the parent scope under the same name.
    owner:    Option<String>,
    children: BTreeMap<String, Namespace>,
    messages: BTreeMap<String, MessageDef>,
    enums:    BTreeMap<String, EnumDef>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn child(&self, name: &str) -> Option<&Namespace> {
        self.children.get(name)
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, &Namespace)> {
        self.children.iter().map(|(name, ns)| (name.as_str(), ns))
    }

    pub fn messages(&self) -> impl Iterator<Item = &MessageDef> {
        self.messages.values()
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumDef> {
        self.enums.values()
    }

    /// Walks down `segments`, creating missing scopes on the way.
    pub fn namespace_mut(&mut self, segments: &[&str]) -> &mut Namespace {
        match segments {
            [] => self,
            [head, rest @ ..] => self
                .children
                .entry(head.to_string())
                .or_default()
                .namespace_mut(rest),
        }
    }

    /// Registers `message` here and its nested declarations, recursively,
    /// in the message's own scope.
    pub fn add_message(&mut self, message: &MessageDef) {
        let scope = self.children.entry(message.name.clone()).or_default();
        scope.owner = Some(message.name.clone());
        for enum_ in &message.nested_enums {
            scope.add_enum(enum_);
        }
        for nested in &message.nested_messages {
            scope.add_message(nested);
        }
        self.messages.insert(message.name.clone(), message.clone());
    }

    pub fn add_enum(&mut self, enum_: &EnumDef) {
        self.enums.insert(enum_.name.clone(), enum_.clone());
    }

    /// Finds the scope holding the last segment of `segments`.
    fn scope_of<'a, 'p>(&'a self, segments: &[&'p str]) -> Option<(&'a Namespace, &'p str)> {
        match segments {
            []                => None,
            [name]            => Some((self, *name)),
            [head, rest @ ..] => self.children.get(*head)?.scope_of(rest),
        }
    }

    pub fn get_message(&self, segments: &[&str]) -> Option<&MessageDef> {
        let (scope, name) = self.scope_of(segments)?;
        scope.messages.get(name)
    }

    pub fn get_enum(&self, segments: &[&str]) -> Option<&EnumDef> {
        let (scope, name) = self.scope_of(segments)?;
        scope.enums.get(name)
    }

    pub fn get_namespace(&self, segments: &[&str]) -> Option<&Namespace> {
        match segments {
            []                => Some(self),
            [head, rest @ ..] => self.children.get(*head)?.get_namespace(rest),
        }
    }

    fn write_tree(&self, out: &mut String, depth: usize) {
        let messages: Vec<&str> = self.messages.keys().map(String::as_str).collect();
        let enums: Vec<&str> = self.enums.keys().map(String::as_str).collect();
        let _ = writeln!(
            out,
            "messages:({}) enums:({})",
            messages.join(","),
            enums.join(",")
        );
        for (name, child) in &self.children {
            out.push_str(&"\t".repeat(depth + 1));
            out.push_str(name);
            out.push_str(": ");
            child.write_tree(out, depth + 1);
        }
    }
}

/// Splits a dotted path into segments. A leading separator marks a fully
/// qualified path and is dropped.
pub fn split_path(path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    if segments.first() == Some(&"") {
        segments.remove(0);
    }
    segments
}

/// Symbol table for one generation request.
///
/// Built once from the file being generated and its direct dependencies,
/// then only read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaIndex {
    root: Namespace,
}

impl SchemaIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &Namespace {
        &self.root
    }

    /// Registers top-level declarations under the scope named by `package`.
    pub fn insert(&mut self, package: &str, messages: &[MessageDef], enums: &[EnumDef]) {
        let scope = self.root.namespace_mut(&split_path(package));
        for message in messages {
            scope.add_message(message);
        }
        for enum_ in enums {
            scope.add_enum(enum_);
        }
    }

    pub fn insert_file(&mut self, file: &FileDef) {
        self.insert(&file.package, &file.messages, &file.enums);
    }

    pub fn resolve_enum(&self, path: &str) -> Option<&EnumDef> {
        self.root.get_enum(&split_path(path))
    }

    pub fn resolve_message(&self, path: &str) -> Option<&MessageDef> {
        self.root.get_message(&split_path(path))
    }

    /// Looks up a scope; the empty path is the root.
    pub fn namespace(&self, path: &str) -> Option<&Namespace> {
        let segments: Vec<&str> = split_path(path).into_iter().filter(|s| !s.is_empty()).collect();
        self.root.get_namespace(&segments)
    }

    /// Renders the whole tree, one scope per line, tab-indented by depth.
    pub fn dump_tree(&self) -> String {
        let mut out = String::new();
        self.root.write_tree(&mut out, 0);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Field, ScalarType};

    fn sample_index() -> SchemaIndex {
        let gender = EnumDef::new("Gender", &[(0, "MALE"), (1, "FEMALE")]);
        let user = MessageDef::new("User", vec![Field::enum_ref("gender", ".foo.User.Gender")])
            .with_nested_enum(gender)
            .with_nested_message(MessageDef::new("Stamp", vec![Field::scalar("at", ScalarType::Int64)]));
        let color = EnumDef::new("Color", &[(0, "RED"), (1, "GREEN")]);

        let mut index = SchemaIndex::new();
        index.insert("foo", &[user], &[color]);
        index
    }

    #[test]
    fn resolves_fully_qualified_paths() {
        let index = sample_index();
        assert_eq!(index.resolve_enum(".foo.Color").map(|e| e.name.as_str()), Some("Color"));
        assert_eq!(index.resolve_message(".foo.User").map(|m| m.name.as_str()), Some("User"));
        assert_eq!(index.resolve_enum("foo.Color").map(|e| e.name.as_str()), Some("Color"));
    }

    #[test]
    fn resolves_nested_declarations() {
        let index = sample_index();
        let gender = index.resolve_enum(".foo.User.Gender").expect("nested enum");
        assert_eq!(gender.symbols(), vec!["MALE", "FEMALE"]);
        assert!(index.resolve_message(".foo.User.Stamp").is_some());
        assert_eq!(index.namespace(".foo.User").and_then(Namespace::owner), Some("User"));
    }

    #[test]
    fn kinds_do_not_cross() {
        let index = sample_index();
        assert!(index.resolve_message(".foo.Color").is_none());
        assert!(index.resolve_enum(".foo.User").is_none());
    }

    #[test]
    fn missing_scope_fails() {
        let index = sample_index();
        assert!(index.resolve_enum(".bar.Color").is_none());
        assert!(index.resolve_enum(".foo.Nope.Color").is_none());
        assert!(index.resolve_enum("").is_none());
        assert!(index.resolve_enum(".").is_none());
    }

    #[test]
    fn empty_package_registers_at_root() {
        let mut index = SchemaIndex::new();
        index.insert("", &[], &[EnumDef::new("Color", &[(0, "RED")])]);
        assert!(index.resolve_enum(".Color").is_some());
        assert!(index.resolve_enum("Color").is_some());
    }

    #[test]
    fn packages_sharing_a_prefix_merge() {
        let mut index = SchemaIndex::new();
        index.insert("a.b", &[], &[EnumDef::new("One", &[(0, "X")])]);
        index.insert("a.c", &[], &[EnumDef::new("Two", &[(0, "Y")])]);
        index.insert("a", &[MessageDef::new("b", vec![])], &[]);
        assert!(index.resolve_enum(".a.b.One").is_some());
        assert!(index.resolve_enum(".a.c.Two").is_some());
        assert!(index.resolve_message(".a.b").is_some());
    }

    #[test]
    fn dump_is_sorted() {
        let mut index = SchemaIndex::new();
        index.insert("z", &[], &[EnumDef::new("Last", &[])]);
        index.insert("a", &[MessageDef::new("M", vec![])], &[EnumDef::new("B", &[]), EnumDef::new("A", &[])]);
        let dump = index.dump_tree();
        assert_eq!(
            dump,
            "messages:() enums:()\n\
             \ta: messages:(M) enums:(A,B)\n\
             \t\tM: messages:() enums:()\n\
             \tz: messages:() enums:(Last)\n"
        );
    }
}
