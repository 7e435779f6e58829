use prost::Message;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto,
};

use proto_mysql_compiler::{process_request, run_plugin, DiagnosticKind, GenError};

fn field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name:   Some(name.to_string()),
        number: Some(number),
        r#type: Some(ty as i32),
        label:  Some(Label::Optional as i32),
        ..Default::default()
    }
}

fn reference(name: &str, number: i32, ty: Type, path: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(path.to_string()),
        ..field(name, number, ty)
    }
}

fn enum_value(name: &str, number: i32) -> EnumValueDescriptorProto {
    EnumValueDescriptorProto {
        name:   Some(name.to_string()),
        number: Some(number),
        ..Default::default()
    }
}

fn common_proto() -> FileDescriptorProto {
    FileDescriptorProto {
        name:      Some("common.proto".to_string()),
        package:   Some("common".to_string()),
        enum_type: vec![EnumDescriptorProto {
            name:  Some("Status".to_string()),
            value: vec![enum_value("ACTIVE", 0), enum_value("BANNED", 1)],
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn user_proto() -> FileDescriptorProto {
    let mut age = field("Age", 3, Type::Int32);
    age.proto3_optional = Some(true);
    let mut tags = field("tags", 5, Type::String);
    tags.label = Some(Label::Repeated as i32);

    FileDescriptorProto {
        name:         Some("foo/user.proto".to_string()),
        package:      Some("foo".to_string()),
        dependency:   vec!["common.proto".to_string()],
        message_type: vec![DescriptorProto {
            name:      Some("User".to_string()),
            field:     vec![
                field("id", 1, Type::Int64),
                field("username", 2, Type::String),
                age,
                reference("status", 4, Type::Enum, ".common.Status"),
                tags,
                reference("gender", 6, Type::Enum, ".foo.User.Gender"),
            ],
            enum_type: vec![EnumDescriptorProto {
                name:  Some("Gender".to_string()),
                value: vec![enum_value("MALE", 0), enum_value("FEMALE", 1)],
                ..Default::default()
            }],
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn request(parameter: Option<&str>) -> CodeGeneratorRequest {
    CodeGeneratorRequest {
        file_to_generate: vec!["foo/user.proto".to_string()],
        parameter:        parameter.map(str::to_string),
        proto_file:       vec![common_proto(), user_proto()],
        ..Default::default()
    }
}

#[test]
fn test_plugin_round_trip() {
    let input = request(None).encode_to_vec();
    let output = run_plugin(&input).expect("plugin should run");
    let response = CodeGeneratorResponse::decode(output.as_slice()).expect("valid response");

    assert_eq!(response.error, None);
    assert_eq!(response.supported_features, Some(1));

    let names: Vec<&str> = response.file.iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["foo/user.proto.sql", "foo/user_sqlhelper.py"]);

    assert_eq!(
        response.file[0].content(),
        "CREATE TABLE User (\n\
         \tid BIGINT NOT NULL,\n\
         \tusername TEXT NOT NULL,\n\
         \tAge INT NULL,\n\
         \tstatus ENUM(\"ACTIVE\",\"BANNED\") NOT NULL,\n\
         \ttags JSON NOT NULL,\n\
         \tgender ENUM(\"MALE\",\"FEMALE\") NOT NULL,\n\
         \tPROTO_BINARY BLOB NOT NULL\n\
         );\n"
    );
}

#[test]
fn test_output_is_deterministic() {
    let input = request(Some("helper=python")).encode_to_vec();
    let first = run_plugin(&input).unwrap();
    let second = run_plugin(&input).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_undecodable_request_is_fatal() {
    // Field 1, length 5, but only one byte follows.
    let err = run_plugin(&[0x0a, 0x05, b'a']).unwrap_err();
    assert!(matches!(err, GenError::DecodeError(_)));
}

#[test]
fn test_bad_parameter_goes_into_response_error() {
    let generated = process_request(&request(Some("helper=cobol")));
    assert_eq!(generated.output.error.as_deref(), Some("Unknown helper \"cobol\""));
    assert!(generated.output.file.is_empty());
}

#[test]
fn test_helper_none_emits_only_sql() {
    let generated = process_request(&request(Some("helper=none")));
    let names: Vec<&str> = generated.output.file.iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["foo/user.proto.sql"]);
}

#[test]
fn test_missing_import_still_generates() {
    let mut req = request(None);
    req.proto_file.remove(0);

    let generated = process_request(&req);
    assert_eq!(generated.output.error, None);

    let kinds: Vec<&DiagnosticKind> = generated.diagnostics.iter().map(|d| &d.kind).collect();
    assert_eq!(
        kinds,
        vec![
            &DiagnosticKind::MissingDependency { dependency: "common.proto".to_string() },
            &DiagnosticKind::UnresolvedEnum { path: ".common.Status".to_string() },
        ]
    );
    assert!(!generated.output.file[0].content().contains("status"));
}
