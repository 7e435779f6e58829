use proto_mysql_schema::{EnumDef, Field, FieldType, MessageDef, ScalarType, SchemaIndex};
use tracing::debug;

use crate::error::MappingError;

/// What a field's element type turned out to be. Repetition is not
/// considered here.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedType<'a> {
    Scalar(ScalarType),
    Enum {
        path: &'a str,
        def:  &'a EnumDef,
    },
    /// Message-typed fields never need their definition, so a reference the
    /// index cannot find is still a message.
    Message {
        path: &'a str,
        def:  Option<&'a MessageDef>,
    },
}

pub fn resolve_field<'a>(index: &'a SchemaIndex, field: &'a Field) -> Result<ResolvedType<'a>, MappingError> {
    match (field.type_, field.type_name.as_deref()) {
        (Some(FieldType::Enum), path) => {
            let path = path.unwrap_or_default();
            index
                .resolve_enum(path)
                .map(|def| ResolvedType::Enum { path, def })
                .ok_or_else(|| MappingError::UnresolvedEnum { path: path.to_string() })
        }
        (Some(FieldType::Scalar(scalar)), _) => Ok(ResolvedType::Scalar(scalar)),
        (_, Some(path)) => {
            let def = index.resolve_message(path);
            if def.is_none() {
                debug!("message {} is not in the index, storing field {} as JSON anyway", path, field.name);
            }
            Ok(ResolvedType::Message { path, def })
        }
        (Some(FieldType::Message | FieldType::Group) | None, None) => Err(MappingError::MissingType),
    }
}
