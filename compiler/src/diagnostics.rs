use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::error::MappingError;

/// What went wrong with one dependency or field. None of these stop
/// generation; the affected piece is left out of the output instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// An import of the generated file is not in the request.
    MissingDependency { dependency: String },
    /// An enum-typed field names an enum the index does not know.
    UnresolvedEnum { path: String },
    /// The field has neither a scalar type nor a type reference.
    MissingType,
    EmptyFieldName,
    /// The field would collide with the raw-bytes column.
    ReservedColumnName,
}

impl From<MappingError> for DiagnosticKind {
    fn from(err: MappingError) -> Self {
        match err {
            MappingError::UnresolvedEnum { path } => DiagnosticKind::UnresolvedEnum { path },
            MappingError::MissingType => DiagnosticKind::MissingType,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file:    String,
    /// Record type the field belongs to.
    pub message: Option<String>,
    pub field:   Option<String>,
    #[serde(flatten)]
    pub kind:    DiagnosticKind,
}

impl Diagnostic {
    pub fn missing_dependency(file: &str, dependency: &str) -> Self {
        Diagnostic {
            file:    file.to_string(),
            message: None,
            field:   None,
            kind:    DiagnosticKind::MissingDependency { dependency: dependency.to_string() },
        }
    }

    pub fn field(file: &str, message: &str, field: &str, kind: DiagnosticKind) -> Self {
        Diagnostic {
            file:    file.to_string(),
            message: Some(message.to_string()),
            field:   Some(field.to_string()),
            kind,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.file)?;
        if let (Some(message), Some(field)) = (&self.message, &self.field) {
            write!(f, "field {:?} in message {}: ", field, message)?;
        }
        match &self.kind {
            DiagnosticKind::MissingDependency { dependency } => {
                write!(f, "dependency {} not found", dependency)
            }
            DiagnosticKind::UnresolvedEnum { path } => write!(f, "failed to find ENUM {}", path),
            DiagnosticKind::MissingType => write!(f, "failed to find type"),
            DiagnosticKind::EmptyFieldName => write!(f, "field name is empty"),
            DiagnosticKind::ReservedColumnName => {
                write!(f, "name is reserved for the raw message column")
            }
        }
    }
}

/// Best-effort output plus everything that had to be left out of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Generated<T> {
    pub output:      T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Generated<T> {
    pub fn new(output: T) -> Self {
        Generated { output, diagnostics: Vec::new() }
    }

    /// Records a diagnostic and logs it.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// Moves `other`'s diagnostics over and hands back its output.
    pub fn absorb<U>(&mut self, other: Generated<U>) -> U {
        self.diagnostics.extend(other.diagnostics);
        other.output
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Generated<U> {
        Generated { output: f(self.output), diagnostics: self.diagnostics }
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
