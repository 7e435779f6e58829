use std::fmt;

use proto_mysql_schema::{Field, FieldType, ScalarType, SchemaIndex};
use serde::Serialize;

use crate::{
    error::MappingError,
    resolver::{resolve_field, ResolvedType},
    utils::quote,
};

/// MySQL column storage types produced by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "symbols", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MySqlType {
    Double,
    Float,
    Int,
    BigInt,
    IntUnsigned,
    BigIntUnsigned,
    Boolean,
    Text,
    Blob,
    Json,
    /// Symbolic names in declaration order.
    Enum(Vec<String>),
}

impl MySqlType {
    pub fn keyword(&self) -> &'static str {
        match self {
            MySqlType::Double         => "DOUBLE",
            MySqlType::Float          => "FLOAT",
            MySqlType::Int            => "INT",
            MySqlType::BigInt         => "BIGINT",
            MySqlType::IntUnsigned    => "INT UNSIGNED",
            MySqlType::BigIntUnsigned => "BIGINT UNSIGNED",
            MySqlType::Boolean        => "BOOLEAN",
            MySqlType::Text           => "TEXT",
            MySqlType::Blob           => "BLOB",
            MySqlType::Json           => "JSON",
            MySqlType::Enum(_)        => "ENUM",
        }
    }
}

impl fmt::Display for MySqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MySqlType::Enum(symbols) => {
                let quoted: Vec<String> = symbols.iter().map(|s| quote(s)).collect();
                write!(f, "ENUM({})", quoted.join(","))
            }
            other => f.write_str(other.keyword()),
        }
    }
}

/// Storage type for each scalar kind. Existing databases depend on these
/// exact choices.
pub fn scalar_column_type(scalar: ScalarType) -> MySqlType {
    match scalar {
        ScalarType::Double   => MySqlType::Double,
        ScalarType::Float    => MySqlType::Float,
        ScalarType::Int64    => MySqlType::BigInt,
        ScalarType::Uint64   => MySqlType::BigIntUnsigned,
        ScalarType::Int32    => MySqlType::Int,
        ScalarType::Fixed64  => MySqlType::BigIntUnsigned,
        ScalarType::Fixed32  => MySqlType::IntUnsigned,
        ScalarType::Bool     => MySqlType::Boolean,
        ScalarType::String   => MySqlType::Text,
        ScalarType::Bytes    => MySqlType::Blob,
        ScalarType::Uint32   => MySqlType::IntUnsigned,
        ScalarType::Sfixed32 => MySqlType::Int,
        ScalarType::Sfixed64 => MySqlType::BigInt,
        ScalarType::Sint32   => MySqlType::Int,
        ScalarType::Sint64   => MySqlType::BigInt,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnType {
    pub data_type: MySqlType,
    pub nullable:  bool,
    /// Copied verbatim from the field's declared default.
    pub default:   Option<String>,
}

impl ColumnType {
    pub fn not_null(data_type: MySqlType) -> Self {
        ColumnType { data_type, nullable: false, default: None }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nullable = if self.nullable { "NULL" } else { "NOT NULL" };
        write!(f, "{} {}", self.data_type, nullable)?;
        if let Some(default) = &self.default {
            write!(f, " DEFAULT {}", default)?;
        }
        Ok(())
    }
}

/// Maps one field to its column type.
///
/// Repeated fields are stored as JSON whatever their element type, so an
/// unknown enum behind a repeated field is not an error.
pub fn map_field(index: &SchemaIndex, field: &Field) -> Result<ColumnType, MappingError> {
    let data_type = if field.is_repeated {
        MySqlType::Json
    } else {
        match resolve_field(index, field)? {
            ResolvedType::Scalar(scalar) => scalar_column_type(scalar),
            ResolvedType::Enum { def, .. } => MySqlType::Enum(def.symbols()),
            ResolvedType::Message { .. } => MySqlType::Json,
        }
    };

    Ok(ColumnType {
        data_type,
        nullable: field.is_optional,
        default:  field.default_value.clone(),
    })
}

/// How a row helper turns the field's value into the column's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "encoding", rename_all = "snake_case")]
pub enum ValueEncoding {
    /// The value is stored as-is.
    Raw,
    /// Enum number looked up to its symbolic name.
    EnumName { path: String },
    /// Repeated scalars or enums as a JSON array.
    JsonList,
    /// Repeated messages as a JSON array of objects.
    JsonMessageList,
    /// A `map<K, V>` field as a JSON object; message values become objects.
    JsonMap { message_values: bool },
    /// A single message as a JSON object.
    JsonMessage,
    /// The whole record, serialized to protobuf bytes.
    SerializedRecord,
}

impl ValueEncoding {
    pub fn of(index: &SchemaIndex, field: &Field, column_type: &ColumnType) -> Self {
        let element_is_message = !matches!(field.type_, Some(FieldType::Scalar(_) | FieldType::Enum))
            && field.type_name.is_some();

        // Map fields arrive as repeated `<Field>Entry` messages, but the
        // runtime container iterates over keys.
        let map_value = field
            .type_name
            .as_deref()
            .filter(|_| field.is_repeated && element_is_message)
            .and_then(|path| index.resolve_message(path))
            .filter(|entry| entry.is_map_entry)
            .map(|entry| entry.map_value());
        if let Some(value) = map_value {
            let message_values = matches!(
                value.and_then(|v| v.type_),
                Some(FieldType::Message | FieldType::Group)
            );
            return ValueEncoding::JsonMap { message_values };
        }

        match &column_type.data_type {
            MySqlType::Json if field.is_repeated && element_is_message => ValueEncoding::JsonMessageList,
            MySqlType::Json if field.is_repeated => ValueEncoding::JsonList,
            MySqlType::Json => ValueEncoding::JsonMessage,
            MySqlType::Enum(_) => ValueEncoding::EnumName {
                path: field.type_name.clone().unwrap_or_default(),
            },
            _ => ValueEncoding::Raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto_mysql_schema::MessageDef;

    #[test]
    fn column_type_renders_without_trailing_space() {
        let column = ColumnType::not_null(MySqlType::Int);
        assert_eq!(column.to_string(), "INT NOT NULL");

        let column = ColumnType {
            data_type: MySqlType::BigIntUnsigned,
            nullable:  true,
            default:   Some("7".to_string()),
        };
        assert_eq!(column.to_string(), "BIGINT UNSIGNED NULL DEFAULT 7");
    }

    #[test]
    fn enum_renders_symbols_in_order() {
        let ty = MySqlType::Enum(vec!["RED".to_string(), "GREEN".to_string()]);
        assert_eq!(ty.to_string(), "ENUM(\"RED\",\"GREEN\")");
    }

    #[test]
    fn encodings_follow_the_column_type() {
        let index = SchemaIndex::new();
        let json = ColumnType::not_null(MySqlType::Json);
        assert_eq!(
            ValueEncoding::of(&index, &Field::message_ref("m", ".M").repeated(), &json),
            ValueEncoding::JsonMessageList
        );
        assert_eq!(
            ValueEncoding::of(&index, &Field::enum_ref("e", ".E").repeated(), &json),
            ValueEncoding::JsonList
        );
        assert_eq!(
            ValueEncoding::of(&index, &Field::message_ref("m", ".M"), &json),
            ValueEncoding::JsonMessage
        );
        assert_eq!(
            ValueEncoding::of(
                &index,
                &Field::scalar("n", ScalarType::Int32),
                &ColumnType::not_null(MySqlType::Int)
            ),
            ValueEncoding::Raw
        );
    }

    #[test]
    fn map_fields_are_encoded_as_objects() {
        let attrs = MessageDef::new(
            "AttrsEntry",
            vec![
                Field::scalar("key", ScalarType::String),
                Field::scalar("value", ScalarType::String),
            ],
        )
        .map_entry();
        let parts = MessageDef::new(
            "PartsEntry",
            vec![
                Field::scalar("key", ScalarType::Int32),
                Field::message_ref("value", ".shop.Part"),
            ],
        )
        .map_entry();
        let item = MessageDef::new("Item", vec![])
            .with_nested_message(attrs)
            .with_nested_message(parts);

        let mut index = SchemaIndex::new();
        index.insert("shop", &[item, MessageDef::new("Part", vec![])], &[]);

        let json = ColumnType::not_null(MySqlType::Json);
        assert_eq!(
            ValueEncoding::of(&index, &Field::message_ref("attrs", ".shop.Item.AttrsEntry").repeated(), &json),
            ValueEncoding::JsonMap { message_values: false }
        );
        assert_eq!(
            ValueEncoding::of(&index, &Field::message_ref("parts", ".shop.Item.PartsEntry").repeated(), &json),
            ValueEncoding::JsonMap { message_values: true }
        );
        assert_eq!(
            ValueEncoding::of(&index, &Field::message_ref("parts", ".shop.Part").repeated(), &json),
            ValueEncoding::JsonMessageList
        );
    }
}
