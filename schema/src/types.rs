use prost_types::{
    field_descriptor_proto::{Label, Type},
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
};
use serde::Serialize;

/// Wire-level field kinds that carry a value directly (everything except
/// enums, messages and groups).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ScalarType {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Bytes,
    Uint32,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
}

pub const SCALAR_TYPES: [ScalarType; 15] = [
    ScalarType::Double,
    ScalarType::Float,
    ScalarType::Int64,
    ScalarType::Uint64,
    ScalarType::Int32,
    ScalarType::Fixed64,
    ScalarType::Fixed32,
    ScalarType::Bool,
    ScalarType::String,
    ScalarType::Bytes,
    ScalarType::Uint32,
    ScalarType::Sfixed32,
    ScalarType::Sfixed64,
    ScalarType::Sint32,
    ScalarType::Sint64,
];

impl ScalarType {
    /// The keyword used for this kind in `.proto` source.
    pub fn proto_name(&self) -> &'static str {
        match self {
            ScalarType::Double   => "double",
            ScalarType::Float    => "float",
            ScalarType::Int64    => "int64",
            ScalarType::Uint64   => "uint64",
            ScalarType::Int32    => "int32",
            ScalarType::Fixed64  => "fixed64",
            ScalarType::Fixed32  => "fixed32",
            ScalarType::Bool     => "bool",
            ScalarType::String   => "string",
            ScalarType::Bytes    => "bytes",
            ScalarType::Uint32   => "uint32",
            ScalarType::Sfixed32 => "sfixed32",
            ScalarType::Sfixed64 => "sfixed64",
            ScalarType::Sint32   => "sint32",
            ScalarType::Sint64   => "sint64",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldType {
    Scalar(ScalarType),
    Enum,
    Message,
    Group,
}

impl From<Type> for FieldType {
    fn from(ty: Type) -> Self {
        match ty {
            Type::Double   => FieldType::Scalar(ScalarType::Double),
            Type::Float    => FieldType::Scalar(ScalarType::Float),
            Type::Int64    => FieldType::Scalar(ScalarType::Int64),
            Type::Uint64   => FieldType::Scalar(ScalarType::Uint64),
            Type::Int32    => FieldType::Scalar(ScalarType::Int32),
            Type::Fixed64  => FieldType::Scalar(ScalarType::Fixed64),
            Type::Fixed32  => FieldType::Scalar(ScalarType::Fixed32),
            Type::Bool     => FieldType::Scalar(ScalarType::Bool),
            Type::String   => FieldType::Scalar(ScalarType::String),
            Type::Bytes    => FieldType::Scalar(ScalarType::Bytes),
            Type::Uint32   => FieldType::Scalar(ScalarType::Uint32),
            Type::Sfixed32 => FieldType::Scalar(ScalarType::Sfixed32),
            Type::Sfixed64 => FieldType::Scalar(ScalarType::Sfixed64),
            Type::Sint32   => FieldType::Scalar(ScalarType::Sint32),
            Type::Sint64   => FieldType::Scalar(ScalarType::Sint64),
            Type::Enum     => FieldType::Enum,
            Type::Message  => FieldType::Message,
            Type::Group    => FieldType::Group,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name:          String,
    pub number:        i32,
    /// `None` when the descriptor left the type unset.
    pub type_:         Option<FieldType>,
    /// Dotted path of the referenced enum or message, e.g. `.pkg.Outer.Kind`.
    pub type_name:     Option<String>,
    pub is_repeated:   bool,
    /// Explicit presence (`optional` in proto3).
    pub is_optional:   bool,
    pub default_value: Option<String>,
}

impl Field {
    fn bare(name: &str, type_: Option<FieldType>, type_name: Option<&str>) -> Self {
        Field {
            name:          name.to_string(),
            number:        0,
            type_,
            type_name:     type_name.map(str::to_string),
            is_repeated:   false,
            is_optional:   false,
            default_value: None,
        }
    }

    pub fn scalar(name: &str, scalar: ScalarType) -> Self {
        Self::bare(name, Some(FieldType::Scalar(scalar)), None)
    }

    pub fn enum_ref(name: &str, path: &str) -> Self {
        Self::bare(name, Some(FieldType::Enum), Some(path))
    }

    pub fn message_ref(name: &str, path: &str) -> Self {
        Self::bare(name, Some(FieldType::Message), Some(path))
    }

    /// A field with neither a declared type nor a type reference.
    pub fn untyped(name: &str) -> Self {
        Self::bare(name, None, None)
    }

    pub fn repeated(mut self) -> Self {
        self.is_repeated = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    pub fn with_default(mut self, literal: &str) -> Self {
        self.default_value = Some(literal.to_string());
        self
    }
}

impl From<&FieldDescriptorProto> for Field {
    fn from(desc: &FieldDescriptorProto) -> Self {
        // Read the raw option so an unset or unknown type stays `None`
        // instead of falling back to the getter's default.
        let type_ = desc
            .r#type
            .and_then(|raw| Type::try_from(raw).ok())
            .map(FieldType::from);

        Field {
            name:          desc.name().to_string(),
            number:        desc.number(),
            type_,
            type_name:     desc.type_name.clone(),
            is_repeated:   desc.label() == Label::Repeated,
            is_optional:   desc.proto3_optional(),
            default_value: desc.default_value.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValue {
    pub name:   String,
    pub number: i32,
}

/// Values are kept in declaration order, aliases and duplicates included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnumDef {
    pub name:   String,
    pub values: Vec<EnumValue>,
}

impl EnumDef {
    pub fn new(name: &str, values: &[(i32, &str)]) -> Self {
        EnumDef {
            name:   name.to_string(),
            values: values
                .iter()
                .map(|(number, name)| EnumValue { name: name.to_string(), number: *number })
                .collect(),
        }
    }

    /// Symbolic names in declaration order.
    pub fn symbols(&self) -> Vec<String> {
        self.values.iter().map(|v| v.name.clone()).collect()
    }
}

impl From<&EnumDescriptorProto> for EnumDef {
    fn from(desc: &EnumDescriptorProto) -> Self {
        EnumDef {
            name:   desc.name().to_string(),
            values: desc
                .value
                .iter()
                .map(|v| EnumValue { name: v.name().to_string(), number: v.number() })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageDef {
    pub name:            String,
    /// Declaration order; fixes the column order of the generated table.
    pub fields:          Vec<Field>,
    pub nested_messages: Vec<MessageDef>,
    pub nested_enums:    Vec<EnumDef>,
    /// Synthesized `<Field>Entry` type behind a `map<K, V>` field.
    pub is_map_entry:    bool,
}

impl MessageDef {
    pub fn new(name: &str, fields: Vec<Field>) -> Self {
        MessageDef {
            name: name.to_string(),
            fields,
            nested_messages: Vec::new(),
            nested_enums:    Vec::new(),
            is_map_entry:    false,
        }
    }

    pub fn map_entry(mut self) -> Self {
        self.is_map_entry = true;
        self
    }

    /// The `value` field of a map entry.
    pub fn map_value(&self) -> Option<&Field> {
        if !self.is_map_entry {
            return None;
        }
        self.fields.iter().find(|f| f.name == "value")
    }

    pub fn with_nested_message(mut self, message: MessageDef) -> Self {
        self.nested_messages.push(message);
        self
    }

    pub fn with_nested_enum(mut self, enum_: EnumDef) -> Self {
        self.nested_enums.push(enum_);
        self
    }
}

impl From<&DescriptorProto> for MessageDef {
    fn from(desc: &DescriptorProto) -> Self {
        MessageDef {
            name:            desc.name().to_string(),
            fields:          desc.field.iter().map(Field::from).collect(),
            nested_messages: desc.nested_type.iter().map(MessageDef::from).collect(),
            nested_enums:    desc.enum_type.iter().map(EnumDef::from).collect(),
            is_map_entry:    desc.options.as_ref().map_or(false, |o| o.map_entry()),
        }
    }
}

/// One `.proto` file as far as table generation is concerned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileDef {
    pub name:         String,
    pub package:      String,
    /// Direct imports only, as listed in the file.
    pub dependencies: Vec<String>,
    pub messages:     Vec<MessageDef>,
    pub enums:        Vec<EnumDef>,
}

impl FileDef {
    pub fn new(name: &str, package: &str) -> Self {
        FileDef {
            name:         name.to_string(),
            package:      package.to_string(),
            dependencies: Vec::new(),
            messages:     Vec::new(),
            enums:        Vec::new(),
        }
    }

    pub fn with_dependency(mut self, name: &str) -> Self {
        self.dependencies.push(name.to_string());
        self
    }

    pub fn with_message(mut self, message: MessageDef) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_enum(mut self, enum_: EnumDef) -> Self {
        self.enums.push(enum_);
        self
    }
}

impl From<&FileDescriptorProto> for FileDef {
    fn from(desc: &FileDescriptorProto) -> Self {
        FileDef {
            name:         desc.name().to_string(),
            package:      desc.package().to_string(),
            dependencies: desc.dependency.clone(),
            messages:     desc.message_type.iter().map(MessageDef::from).collect(),
            enums:        desc.enum_type.iter().map(EnumDef::from).collect(),
        }
    }
}
