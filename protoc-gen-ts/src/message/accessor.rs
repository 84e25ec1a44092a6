//! Field getters, setters and oneof discriminants

use prost_types::field_descriptor_proto::Type;

use crate::ast::{
    Binding, ClassMember, Expr, IndexSignature, Param, PropertyKey, Stmt, TypeLiteral, TypeNode,
    ident, num, string,
};
use crate::error::GeneratorError;
use crate::field::{ClassifiedField, FieldKind, property_type};

use super::MessageContext;

/// Literal for a field's declared `[default = ...]`, if one can be rendered
fn default_value(ctx: &MessageContext<'_, '_>, field: &ClassifiedField<'_>) -> Option<Expr> {
    let raw = field.descriptor.default_value.as_deref()?;
    if raw.is_empty() {
        return None;
    }
    match field.descriptor.r#type() {
        Type::Enum => Some(ctx.scope.resolve_expr(field.descriptor.type_name()).prop(raw)),
        Type::String => Some(string(raw)),
        Type::Bool => Some(Expr::Bool(raw == "true")),
        Type::Bytes | Type::Message | Type::Group => None,
        _ => Some(Expr::Number(
            match raw {
                "inf" => "Infinity",
                "-inf" => "-Infinity",
                "nan" => "NaN",
                other => other,
            }
            .to_string(),
        )),
    }
}

/// `get name() { return ... as T; }`
pub(super) fn getter(ctx: &MessageContext<'_, '_>, field: &ClassifiedField<'_>) -> Result<ClassMember, GeneratorError> {
    let ty = property_type(ctx.scope, field.descriptor)?;
    let number = num(field.number());

    let read = match &field.kind {
        FieldKind::Message {
            type_name,
            repeated,
        } => {
            let method = if *repeated {
                "getRepeatedWrapperField"
            } else {
                "getWrapperField"
            };
            ctx.pb_message().method(
                method,
                vec![Expr::This, ctx.scope.resolve_expr(type_name), number],
            )
        }
        // maps come back as the runtime's own map type
        FieldKind::Map(_) => ctx
            .pb_message()
            .method("getField", vec![Expr::This, number])
            .cast(TypeNode::named("any")),
        FieldKind::Scalar { .. } => match default_value(ctx, field) {
            Some(default) => ctx
                .pb_message()
                .method("getFieldWithDefault", vec![Expr::This, number, default]),
            None => ctx.pb_message().method("getField", vec![Expr::This, number]),
        },
    };

    Ok(ClassMember::Getter {
        name: field.name().to_string(),
        body: vec![Stmt::ret(read.cast(ty))],
    })
}

/// `set name(value: T) { ... }`
///
/// Members of a oneof group pass the whole group so that setting one
/// clears the others.
pub(super) fn setter(ctx: &MessageContext<'_, '_>, field: &ClassifiedField<'_>) -> Result<ClassMember, GeneratorError> {
    let ty = property_type(ctx.scope, field.descriptor)?;
    let number = num(field.number());
    let value = ident("value");

    let write = match (ctx.group_of(field), &field.kind) {
        (Some(group), kind) => {
            let method = match kind {
                FieldKind::Message { .. } => "setOneofWrapperField",
                _ => "setOneofField",
            };
            let group = Expr::Array(group.iter().map(|n| num(n)).collect());
            ctx.pb_message()
                .method(method, vec![Expr::This, number, group, value])
        }
        (None, FieldKind::Map(_)) => ctx.pb_message().method(
            "setField",
            vec![Expr::This, number, value.cast(TypeNode::named("any"))],
        ),
        (None, FieldKind::Message { repeated, .. }) => {
            let method = if *repeated {
                "setRepeatedWrapperField"
            } else {
                "setWrapperField"
            };
            ctx.pb_message().method(method, vec![Expr::This, number, value])
        }
        (None, FieldKind::Scalar { .. }) => ctx
            .pb_message()
            .method("setField", vec![Expr::This, number, value]),
    };

    Ok(ClassMember::Setter {
        name: field.name().to_string(),
        param: Param::typed("value", ty),
        body: vec![write.stmt()],
    })
}

/// `get group() { ... }` returning the populated member's name or `"none"`
pub(super) fn oneof_getter(ctx: &MessageContext<'_, '_>, index: usize) -> ClassMember {
    let members: Vec<&ClassifiedField<'_>> = ctx
        .fields
        .iter()
        .filter(|f| f.oneof_index == Some(index))
        .collect();

    let mut names = vec![TypeNode::StringLiteral("none".to_string())];
    let mut cases = vec![(PropertyKey::Number(0), string("none"))];
    for member in &members {
        names.push(TypeNode::StringLiteral(member.name().to_string()));
        cases.push((PropertyKey::Number(i64::from(member.number())), string(member.name())));
    }

    let cases_type = TypeNode::Literal(TypeLiteral {
        properties: Vec::new(),
        index: Some(Box::new(IndexSignature {
            param: "index".to_string(),
            key: TypeNode::named("number"),
            value: TypeNode::Union(names),
        })),
    });
    let numbers = Expr::Array(members.iter().map(|m| num(m.number())).collect());

    ClassMember::Getter {
        name: ctx.message.oneof_decl[index].name().to_string(),
        body: vec![
            Stmt::Const {
                binding: Binding::Name("cases".to_string()),
                ty: Some(cases_type),
                init: Expr::Object {
                    properties: cases,
                    multiline: true,
                },
            },
            Stmt::ret(ident("cases").index(
                ctx.pb_message()
                    .method("computeOneofCase", vec![Expr::This, numbers]),
            )),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{render, sample_file};
    use crate::field::tests::scalar;
    use prost_types::field_descriptor_proto::{Label, Type};
    use prost_types::{
        DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
        FileDescriptorProto,
    };

    #[test]
    fn test_scalar_and_repeated_accessors() {
        let text = render(&sample_file());
        assert!(text.contains(
            "    get name() {\n        return pb_1.Message.getField(this, 1) as string;\n    }\n"
        ));
        assert!(text.contains(
            "    set name(value: string) {\n        pb_1.Message.setField(this, 1, value);\n    }\n"
        ));
        assert!(text.contains("        return pb_1.Message.getField(this, 4) as string[];\n"));
    }

    #[test]
    fn test_message_accessors() {
        let text = render(&sample_file());
        assert!(text.contains(
            "        return pb_1.Message.getWrapperField(this, User.Address, 6) as User.Address;\n"
        ));
        assert!(text.contains("        pb_1.Message.setWrapperField(this, 6, value);\n"));
        assert!(text.contains(
            "        return pb_1.Message.getRepeatedWrapperField(this, User, 7) as User[];\n"
        ));
        assert!(text.contains("        pb_1.Message.setRepeatedWrapperField(this, 7, value);\n"));
    }

    #[test]
    fn test_map_accessors() {
        let text = render(&sample_file());
        assert!(text.contains(
            "        return pb_1.Message.getField(this, 8) as any as Map<string, string>;\n"
        ));
        assert!(text.contains("    set labels(value: Map<string, string>) {\n"));
        assert!(text.contains("        pb_1.Message.setField(this, 8, value as any);\n"));
        assert!(text.contains("as any as Map<number, User.Address>;\n"));
    }

    #[test]
    fn test_oneof_members_clear_their_group() {
        let text = render(&sample_file());
        assert!(text.contains("        pb_1.Message.setOneofField(this, 2, [2, 3], value);\n"));
        assert!(text.contains("        pb_1.Message.setOneofField(this, 3, [2, 3], value);\n"));
    }

    #[test]
    fn test_oneof_discriminant() {
        let text = render(&sample_file());
        assert!(text.contains(
            "    get key() {\n        const cases: {\n            [index: number]: \"none\" | \"id\" | \"alias\";\n        } = {\n            0: \"none\",\n            2: \"id\",\n            3: \"alias\"\n        };\n        return cases[pb_1.Message.computeOneofCase(this, [2, 3])];\n    }\n"
        ));
    }

    #[test]
    fn test_each_group_uses_its_own_members() {
        let mut a = scalar("a", 1, Type::Int32, Label::Optional);
        a.oneof_index = Some(0);
        let mut b = scalar("b", 2, Type::Int32, Label::Optional);
        b.oneof_index = Some(1);
        let mut c = scalar("c", 3, Type::Int32, Label::Optional);
        c.oneof_index = Some(0);

        let file = FileDescriptorProto {
            name: Some("groups.proto".to_string()),
            syntax: Some("proto3".to_string()),
            message_type: vec![DescriptorProto {
                name: Some("Groups".to_string()),
                field: vec![a, b, c],
                oneof_decl: vec![Default::default(), Default::default()],
                ..Default::default()
            }],
            ..Default::default()
        };
        let text = render(&file);
        assert!(text.contains("pb_1.Message.setOneofField(this, 1, [1, 3], value);"));
        assert!(text.contains("pb_1.Message.setOneofField(this, 2, [2], value);"));
        assert!(text.contains("pb_1.Message.setOneofField(this, 3, [1, 3], value);"));
        assert!(text.contains("[[1, 3], [2]]"));
    }

    #[test]
    fn test_default_values() {
        let with_default = |field: FieldDescriptorProto, value: &str| FieldDescriptorProto {
            default_value: Some(value.to_string()),
            ..field
        };

        let file = FileDescriptorProto {
            name: Some("defaults.proto".to_string()),
            package: Some("d".to_string()),
            syntax: Some("proto2".to_string()),
            enum_type: vec![EnumDescriptorProto {
                name: Some("Mode".to_string()),
                value: vec![EnumValueDescriptorProto {
                    name: Some("FAST".to_string()),
                    number: Some(0),
                    ..Default::default()
                }],
                ..Default::default()
            }],
            message_type: vec![DescriptorProto {
                name: Some("Defaults".to_string()),
                field: vec![
                    with_default(scalar("label", 1, Type::String, Label::Optional), "hi"),
                    with_default(scalar("on", 2, Type::Bool, Label::Optional), "true"),
                    with_default(scalar("ratio", 3, Type::Double, Label::Optional), "-inf"),
                    with_default(scalar("count", 4, Type::Int32, Label::Optional), "7"),
                    with_default(
                        FieldDescriptorProto {
                            type_name: Some(".d.Mode".to_string()),
                            ..scalar("mode", 5, Type::Enum, Label::Optional)
                        },
                        "FAST",
                    ),
                    with_default(scalar("raw", 6, Type::Bytes, Label::Optional), "abc"),
                ],
                ..Default::default()
            }],
            ..Default::default()
        };

        let text = render(&file);
        assert!(text.contains("pb_1.Message.getFieldWithDefault(this, 1, \"hi\") as string;"));
        assert!(text.contains("pb_1.Message.getFieldWithDefault(this, 2, true) as boolean;"));
        assert!(text.contains("pb_1.Message.getFieldWithDefault(this, 3, -Infinity) as number;"));
        assert!(text.contains("pb_1.Message.getFieldWithDefault(this, 4, 7) as number;"));
        assert!(text.contains("pb_1.Message.getFieldWithDefault(this, 5, Mode.FAST) as Mode;"));
        assert!(text.contains("pb_1.Message.getField(this, 6) as Uint8Array;"));
    }
}
