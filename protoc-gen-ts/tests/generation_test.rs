//! End-to-end tests driving the plugin through `CodeGeneratorRequest`

use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FieldOptions, FileDescriptorProto, MethodDescriptorProto, OneofDescriptorProto,
    ServiceDescriptorProto,
};

fn field(name: &str, number: i32, ty: Type, label: Label) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        r#type: Some(ty as i32),
        label: Some(label as i32),
        ..Default::default()
    }
}

fn typed(name: &str, number: i32, ty: Type, type_name: &str, label: Label) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..field(name, number, ty, label)
    }
}

fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

fn request(files: Vec<FileDescriptorProto>, generate: &[&str], parameter: &str) -> CodeGeneratorRequest {
    CodeGeneratorRequest {
        file_to_generate: generate.iter().map(|s| s.to_string()).collect(),
        parameter: Some(parameter.to_string()),
        proto_file: files,
        ..Default::default()
    }
}

fn single_output(response: &CodeGeneratorResponse) -> &str {
    assert_eq!(response.error, None);
    assert_eq!(response.file.len(), 1);
    response.file[0].content()
}

/// Whether some line of `text` equals `line` once indentation is stripped
fn has_line(text: &str, line: &str) -> bool {
    text.lines().any(|l| l.trim() == line)
}

fn position(text: &str, needle: &str) -> usize {
    text.find(needle)
        .unwrap_or_else(|| panic!("`{}` not found in output:\n{}", needle, text))
}

fn money_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("common/money.proto".to_string()),
        package: Some("common".to_string()),
        syntax: Some("proto3".to_string()),
        message_type: vec![message(
            "Money",
            vec![field("units", 1, Type::Int64, Label::Optional)],
        )],
        ..Default::default()
    }
}

fn order_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some("shop/order.proto".to_string()),
        package: Some("shop".to_string()),
        syntax: Some("proto3".to_string()),
        dependency: vec!["common/money.proto".to_string()],
        message_type: vec![message(
            "Order",
            vec![
                typed("total", 1, Type::Message, ".common.Money", Label::Optional),
                typed("lines", 2, Type::Message, ".common.Money", Label::Repeated),
            ],
        )],
        ..Default::default()
    }
}

#[test]
fn test_cross_file_references_use_dependency_imports() {
    let response = protoc_gen_ts::generate(request(
        vec![money_file(), order_file()],
        &["shop/order.proto"],
        "",
    ));
    let text = single_output(&response);
    assert_eq!(response.file[0].name(), "shop/order.ts");

    let dependency = position(text, "import * as dependency_1 from \"./../common/money\";\n");
    let runtime = position(text, "import * as pb_1 from \"google-protobuf\";\n");
    assert!(dependency < runtime);
    assert!(!text.contains("grpc_1"));

    assert!(text.contains("export namespace shop {\n    export class Order extends pb_1.Message {\n"));
    assert!(has_line(
        text,
        "return pb_1.Message.getWrapperField(this, dependency_1.common.Money, 1) as dependency_1.common.Money;"
    ));
    assert!(has_line(
        text,
        "message.total = dependency_1.common.Money.fromObject(data.total);"
    ));
    assert!(has_line(
        text,
        "reader.readMessage(message.lines, () => pb_1.Message.addToRepeatedWrapperField(message, 2, dependency_1.common.Money.deserialize(reader), dependency_1.common.Money));"
    ));
}

#[test]
fn test_header_and_output_name() {
    let mut req = request(vec![money_file()], &["common/money.proto"], "");
    req.compiler_version = Some(prost_types::compiler::Version {
        major: Some(3),
        minor: Some(21),
        patch: Some(12),
        suffix: Some(String::new()),
    });
    let response = protoc_gen_ts::generate(req);
    let text = single_output(&response);

    assert_eq!(response.file[0].name(), "common/money.ts");
    assert!(text.starts_with(
        "/**\n * Generated by protoc-gen-ts. DO NOT EDIT!\n * compiler version: 3.21.12\n * source: common/money.proto\n */\n"
    ));
}

#[test]
fn test_only_requested_files_are_emitted() {
    let response = protoc_gen_ts::generate(request(
        vec![money_file(), order_file()],
        &["common/money.proto"],
        "",
    ));
    let text = single_output(&response);
    assert!(text.contains("export class Money extends pb_1.Message {"));
    assert!(!text.contains("Order"));
    assert!(!text.contains("dependency_1"));
}

#[test]
fn test_packed_and_unpacked_repeated_fields() {
    let dense = FieldDescriptorProto {
        options: Some(FieldOptions {
            packed: Some(true),
            ..Default::default()
        }),
        ..field("dense", 2, Type::Int32, Label::Repeated)
    };
    let file = FileDescriptorProto {
        name: Some("wire.proto".to_string()),
        syntax: Some("proto2".to_string()),
        message_type: vec![message(
            "Samples",
            vec![
                field("plain", 1, Type::Int32, Label::Repeated),
                dense,
                field("label", 3, Type::String, Label::Optional),
            ],
        )],
        ..Default::default()
    };
    let response = protoc_gen_ts::generate(request(vec![file], &["wire.proto"], ""));
    let text = single_output(&response);

    // no package means no namespace wrapper
    assert!(text.contains("\nexport class Samples extends pb_1.Message {\n"));

    assert!(has_line(text, "writer.writeRepeatedInt32(1, this.plain);"));
    assert!(has_line(text, "writer.writePackedInt32(2, this.dense);"));
    assert!(has_line(
        text,
        "pb_1.Message.addToRepeatedField(message, 1, reader.readInt32());"
    ));
    assert!(has_line(text, "message.dense = reader.readPackedInt32();"));
    assert!(has_line(
        text,
        "pb_1.Message.initialize(this, Array.isArray(data) ? data : [], 0, -1, [1, 2], []);"
    ));
}

#[test]
fn test_empty_strings_are_not_serialized() {
    let response = protoc_gen_ts::generate(request(vec![money_file(), order_file()], &["common/money.proto"], ""));
    let text = single_output(&response);
    assert!(!text.contains("typeof this.units === \"string\""));

    let file = FileDescriptorProto {
        name: Some("note.proto".to_string()),
        syntax: Some("proto3".to_string()),
        message_type: vec![message(
            "Note",
            vec![field("body", 1, Type::String, Label::Optional)],
        )],
        ..Default::default()
    };
    let response = protoc_gen_ts::generate(request(vec![file], &["note.proto"], ""));
    let text = single_output(&response);
    assert!(has_line(
        text,
        "if (typeof this.body === \"string\" && this.body.length) {"
    ));
}

#[test]
fn test_oneof_groups() {
    let mut id = field("id", 1, Type::Int32, Label::Optional);
    id.oneof_index = Some(0);
    let mut email = field("email", 2, Type::String, Label::Optional);
    email.oneof_index = Some(0);

    let file = FileDescriptorProto {
        name: Some("lookup.proto".to_string()),
        syntax: Some("proto3".to_string()),
        message_type: vec![DescriptorProto {
            oneof_decl: vec![OneofDescriptorProto {
                name: Some("by".to_string()),
                ..Default::default()
            }],
            ..message("Lookup", vec![id, email])
        }],
        ..Default::default()
    };
    let response = protoc_gen_ts::generate(request(vec![file], &["lookup.proto"], ""));
    let text = single_output(&response);

    assert!(has_line(text, "pb_1.Message.setOneofField(this, 1, [1, 2], value);"));
    assert!(has_line(text, "pb_1.Message.setOneofField(this, 2, [1, 2], value);"));
    assert!(has_line(text, "get by() {"));
    assert!(has_line(text, "return cases[pb_1.Message.computeOneofCase(this, [1, 2])];"));
    assert!(has_line(
        text,
        "pb_1.Message.initialize(this, Array.isArray(data) ? data : [], 0, -1, [], [[1, 2]]);"
    ));
    // each alternative of the constructor union excludes the other member
    assert!(has_line(text, "email?: never;"));
    assert!(has_line(text, "id?: never;"));
}

#[test]
fn test_map_fields() {
    let entry = DescriptorProto {
        options: Some(prost_types::MessageOptions {
            map_entry: Some(true),
            ..Default::default()
        }),
        ..message(
            "CountsEntry",
            vec![
                field("key", 1, Type::String, Label::Optional),
                field("value", 2, Type::Int32, Label::Optional),
            ],
        )
    };
    let file = FileDescriptorProto {
        name: Some("stats.proto".to_string()),
        package: Some("stats".to_string()),
        syntax: Some("proto3".to_string()),
        message_type: vec![DescriptorProto {
            nested_type: vec![entry],
            ..message(
                "Stats",
                vec![typed("counts", 1, Type::Message, ".stats.Stats.CountsEntry", Label::Repeated)],
            )
        }],
        ..Default::default()
    };
    let response = protoc_gen_ts::generate(request(vec![file], &["stats.proto"], ""));
    let text = single_output(&response);

    assert!(!text.contains("CountsEntry"));
    assert!(has_line(
        text,
        "return pb_1.Message.getField(this, 1) as any as Map<string, number>;"
    ));
    assert!(has_line(text, "for (const [key, value] of this.counts) {"));
    assert!(has_line(
        text,
        "reader.readMessage(message, () => pb_1.Map.deserializeBinary(message.counts as any, reader, reader.readString, reader.readInt32));"
    ));
    assert!(has_line(text, "data.counts = Object.fromEntries(this.counts);"));
}

fn echo_file() -> FileDescriptorProto {
    let method = |name: &str, client_streaming: bool, server_streaming: bool| MethodDescriptorProto {
        name: Some(name.to_string()),
        input_type: Some(".echo.Ping".to_string()),
        output_type: Some(".echo.Pong".to_string()),
        client_streaming: Some(client_streaming),
        server_streaming: Some(server_streaming),
        ..Default::default()
    };

    FileDescriptorProto {
        name: Some("echo/echo.proto".to_string()),
        package: Some("echo".to_string()),
        syntax: Some("proto3".to_string()),
        enum_type: vec![EnumDescriptorProto {
            name: Some("Tone".to_string()),
            value: vec![EnumValueDescriptorProto {
                name: Some("FLAT".to_string()),
                number: Some(0),
                ..Default::default()
            }],
            ..Default::default()
        }],
        message_type: vec![
            message("Ping", vec![field("text", 1, Type::String, Label::Optional)]),
            message("Pong", vec![field("text", 1, Type::String, Label::Optional)]),
        ],
        service: vec![ServiceDescriptorProto {
            name: Some("Echo".to_string()),
            method: vec![method("Say", false, false), method("Follow", false, true)],
            ..Default::default()
        }],
        ..Default::default()
    }
}

#[test]
fn test_services_are_emitted_after_messages() {
    let response = protoc_gen_ts::generate(request(vec![echo_file()], &["echo/echo.proto"], ""));
    let text = single_output(&response);

    let pb = position(text, "import * as pb_1 from \"google-protobuf\";\n");
    let grpc = position(text, "import * as grpc_1 from \"@grpc/grpc-js\";\n");
    assert!(pb < grpc);

    let order = [
        "export enum Tone {",
        "export class Ping extends pb_1.Message {",
        "export class Pong extends pb_1.Message {",
        "export interface GrpcUnaryServiceInterface<P, R> {",
        "export interface GrpcPromiseServiceInterface<P, R> {",
        "export abstract class UnimplementedEchoService {",
        "export class EchoClient extends grpc_1.makeGenericClientConstructor(UnimplementedEchoService.definition, \"Echo\", {}) {",
    ];
    let positions: Vec<usize> = order.iter().map(|needle| position(text, needle)).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    assert!(has_line(text, "path: \"/echo.Echo/Say\","));
    assert!(has_line(
        text,
        "abstract Follow(call: grpc_1.ServerWritableStream<Ping, Pong>): void;"
    ));
    assert!(has_line(text, "return super.Say(message, metadata, options, callback);"));
    assert!(has_line(
        text,
        "Follow: GrpcStreamServiceInterface<Ping, Pong> = (message: Ping, metadata?: grpc_1.Metadata | grpc_1.CallOptions, options?: grpc_1.CallOptions): grpc_1.ClientReadableStream<Pong> => {"
    ));
}

#[test]
fn test_promise_style_and_grpc_package_option() {
    let response = protoc_gen_ts::generate(request(
        vec![echo_file()],
        &["echo/echo.proto"],
        "unary_rpc_promise=true,grpc_package=@acme/grpc,unknown=1",
    ));
    let text = single_output(&response);

    assert!(text.contains("import * as grpc_1 from \"@acme/grpc\";\n"));
    assert!(has_line(
        text,
        "Say: GrpcPromiseServiceInterface<Ping, Pong> = (message: Ping, metadata?: grpc_1.Metadata | grpc_1.CallOptions, options?: grpc_1.CallOptions): Promise<Pong> => {"
    ));
    assert!(has_line(text, "metadata = new grpc_1.Metadata();"));
    assert!(has_line(text, "reject(error);"));

    let response = protoc_gen_ts::generate(request(vec![echo_file()], &["echo/echo.proto"], "style=async"));
    assert!(single_output(&response).contains("Say: GrpcPromiseServiceInterface<Ping, Pong> = "));
}

#[test]
fn test_group_fields_are_reported_as_errors() {
    let file = FileDescriptorProto {
        name: Some("legacy.proto".to_string()),
        syntax: Some("proto2".to_string()),
        message_type: vec![message(
            "Legacy",
            vec![typed("blob", 1, Type::Group, ".Legacy.Blob", Label::Optional)],
        )],
        ..Default::default()
    };
    let response = protoc_gen_ts::generate(request(vec![file], &["legacy.proto"], ""));

    assert!(response.file.is_empty());
    let error = response.error.unwrap_or_default();
    assert!(error.contains("TYPE_GROUP"), "{}", error);
    assert!(error.contains("blob"), "{}", error);
    assert_eq!(response.supported_features, Some(1));
}

#[test]
fn test_supported_features_advertise_proto3_optional() {
    let response = protoc_gen_ts::generate(request(vec![money_file()], &["common/money.proto"], ""));
    assert_eq!(response.supported_features, Some(1));
}

#[test]
fn test_proto3_optional_field_is_a_single_member_oneof() {
    let mut nickname = field("nickname", 1, Type::String, Label::Optional);
    nickname.oneof_index = Some(0);
    nickname.proto3_optional = Some(true);

    let file = FileDescriptorProto {
        name: Some("profile.proto".to_string()),
        syntax: Some("proto3".to_string()),
        message_type: vec![DescriptorProto {
            oneof_decl: vec![OneofDescriptorProto {
                name: Some("_nickname".to_string()),
                ..Default::default()
            }],
            ..message("Profile", vec![nickname])
        }],
        ..Default::default()
    };
    let response = protoc_gen_ts::generate(request(vec![file], &["profile.proto"], ""));
    let text = single_output(&response);

    assert!(has_line(text, "pb_1.Message.setOneofField(this, 1, [1], value);"));
    assert!(has_line(text, "get _nickname() {"));
    assert!(has_line(text, "return cases[pb_1.Message.computeOneofCase(this, [1])];"));
    assert!(has_line(
        text,
        "pb_1.Message.initialize(this, Array.isArray(data) ? data : [], 0, -1, [], [[1]]);"
    ));
}
