//! Binary codec: `serialize` and `deserialize`
//!
//! Read and write routine names come from [`wire_method_name`], so both
//! directions agree on the encoding of every field.

use crate::ast::{
    Binding, ClassMember, Expr, Param, Stmt, TypeNode, arrow, arrow_block, ident, num, string,
};
use crate::error::GeneratorError;
use crate::field::{ClassifiedField, FieldKind, is_message, is_string, wire_method_name};

use super::MessageContext;

fn writer() -> Expr {
    ident("writer")
}

fn reader() -> Expr {
    ident("reader")
}

/// Write statement(s) for one field of `serialize`
fn write_field(ctx: &MessageContext<'_, '_>, field: &ClassifiedField<'_>) -> Result<Stmt, GeneratorError> {
    let this_field = || Expr::This.prop(field.name());
    let number = num(field.number());

    if let FieldKind::Map(entry) = &field.kind {
        let mut value_args = vec![num(2), ident("value")];
        if is_message(&entry.value) {
            value_args.push(arrow(
                vec![],
                ident("value").method("serialize", vec![writer()]),
            ));
        }
        let entry_body = vec![
            writer()
                .method(
                    &format!("write{}", wire_method_name(&entry.key, true)?),
                    vec![num(1), ident("key")],
                )
                .stmt(),
            writer()
                .method(
                    &format!("write{}", wire_method_name(&entry.value, true)?),
                    value_args,
                )
                .stmt(),
        ];
        return Ok(Stmt::ForOf {
            binding: Binding::Array(vec!["key".to_string(), "value".to_string()]),
            iter: this_field(),
            body: vec![writer()
                .method(
                    "writeMessage",
                    vec![number, this_field(), arrow_block(vec![], None, entry_body)],
                )
                .stmt()],
        });
    }

    let mut args = vec![number, this_field()];
    match &field.kind {
        FieldKind::Message {
            type_name,
            repeated: true,
        } => args.push(arrow(
            vec![Param::typed("item", ctx.scope.resolve_type(type_name))],
            ident("item").method("serialize", vec![writer()]),
        )),
        FieldKind::Message {
            repeated: false, ..
        } => args.push(arrow(
            vec![],
            this_field().method("serialize", vec![writer()]),
        )),
        _ => {}
    }

    let write = writer()
        .method(
            &format!("write{}", wire_method_name(field.descriptor, true)?),
            args,
        )
        .stmt();

    // an empty singular string is not written
    let cond = if is_string(field.descriptor) && !field.is_repeated_storage() {
        this_field()
            .type_of()
            .binary("===", string("string"))
            .binary("&&", this_field().prop("length"))
    } else {
        this_field().binary("!==", ident("undefined"))
    };

    Ok(Stmt::when(cond, vec![write]))
}

/// The three `serialize` overloads
///
/// Without a writer the encoded bytes are returned; with one, the message
/// is appended to it and nothing is returned.
pub(super) fn serialize(ctx: &MessageContext<'_, '_>) -> Result<[ClassMember; 3], GeneratorError> {
    let binary_writer = || TypeNode::named(format!("{}.BinaryWriter", ctx.scope.pb));

    let mut body = vec![Stmt::constant(
        "writer",
        ident("w").binary(
            "||",
            ident(&ctx.scope.pb).prop("BinaryWriter").construct(vec![]),
        ),
    )];
    for field in &ctx.fields {
        body.push(write_field(ctx, field)?);
    }
    body.push(Stmt::when(
        ident("w").not(),
        vec![Stmt::ret(writer().method("getResultBuffer", vec![]))],
    ));

    let overload = |params: Vec<Param>, ret: TypeNode, body: Option<Vec<Stmt>>| ClassMember::Method {
        name: "serialize".to_string(),
        is_static: false,
        is_abstract: false,
        params,
        ret: Some(ret),
        body,
    };

    Ok([
        overload(vec![], TypeNode::named("Uint8Array"), None),
        overload(
            vec![Param::typed("w", binary_writer())],
            TypeNode::named("void"),
            None,
        ),
        overload(
            vec![Param::optional("w", binary_writer())],
            TypeNode::Union(vec![TypeNode::named("Uint8Array"), TypeNode::named("void")]),
            Some(body),
        ),
    ])
}

/// `case` body reading one field in `deserialize`
fn read_field(ctx: &MessageContext<'_, '_>, field: &ClassifiedField<'_>) -> Result<Vec<Stmt>, GeneratorError> {
    let message_field = || ident("message").prop(field.name());
    let read = |name: String| reader().method(&format!("read{}", name), vec![]);

    let stmt = match &field.kind {
        FieldKind::Scalar {
            repeated: true,
            packed: false,
        } => ctx
            .pb_message()
            .method(
                "addToRepeatedField",
                vec![
                    ident("message"),
                    num(field.number()),
                    read(wire_method_name(field.descriptor, false)?),
                ],
            )
            .stmt(),
        FieldKind::Map(entry) => {
            let key_reader = reader().prop(&format!("read{}", wire_method_name(&entry.key, true)?));
            let value_reader = if is_message(&entry.value) {
                arrow_block(
                    vec![],
                    None,
                    vec![
                        Stmt::Let("value".to_string()),
                        reader()
                            .method(
                                "readMessage",
                                vec![
                                    ident("message"),
                                    arrow(
                                        vec![],
                                        ident("value").assign(
                                            ctx.scope
                                                .resolve_expr(entry.value.type_name())
                                                .method("deserialize", vec![reader()]),
                                        ),
                                    ),
                                ],
                            )
                            .stmt(),
                        Stmt::ret(ident("value")),
                    ],
                )
            } else {
                reader().prop(&format!("read{}", wire_method_name(&entry.value, true)?))
            };
            reader()
                .method(
                    "readMessage",
                    vec![
                        ident("message"),
                        arrow(
                            vec![],
                            ident(&ctx.scope.pb).prop("Map").method(
                                "deserializeBinary",
                                vec![
                                    message_field().cast(TypeNode::named("any")),
                                    reader(),
                                    key_reader,
                                    value_reader,
                                ],
                            ),
                        ),
                    ],
                )
                .stmt()
        }
        FieldKind::Message {
            type_name,
            repeated,
        } => {
            let nested = ctx
                .scope
                .resolve_expr(type_name)
                .method("deserialize", vec![reader()]);
            let store = if *repeated {
                ctx.pb_message().method(
                    "addToRepeatedWrapperField",
                    vec![
                        ident("message"),
                        num(field.number()),
                        nested,
                        ctx.scope.resolve_expr(type_name),
                    ],
                )
            } else {
                message_field().assign(nested)
            };
            reader()
                .method("readMessage", vec![message_field(), arrow(vec![], store)])
                .stmt()
        }
        FieldKind::Scalar { .. } => message_field()
            .assign(read(wire_method_name(field.descriptor, false)?))
            .stmt(),
    };

    Ok(vec![stmt, Stmt::Break])
}

/// `static deserialize(bytes: Uint8Array | pb_1.BinaryReader)`
///
/// Unknown field numbers are skipped.
pub(super) fn deserialize(ctx: &MessageContext<'_, '_>) -> Result<ClassMember, GeneratorError> {
    let binary_reader = || ident(&ctx.scope.pb).prop("BinaryReader");

    let mut cases = Vec::with_capacity(ctx.fields.len());
    for field in &ctx.fields {
        cases.push((num(field.number()), read_field(ctx, field)?));
    }

    let body = vec![
        Stmt::constant(
            "reader",
            Expr::Conditional(
                Box::new(ident("bytes").binary("instanceof", binary_reader())),
                Box::new(ident("bytes")),
                Box::new(binary_reader().construct(vec![ident("bytes")])),
            ),
        ),
        Stmt::constant("message", ident(ctx.name()).construct(vec![])),
        Stmt::While {
            cond: reader().method("nextField", vec![]),
            body: vec![
                Stmt::when(reader().method("isEndGroup", vec![]), vec![Stmt::Break]),
                Stmt::Switch {
                    discriminant: reader().method("getFieldNumber", vec![]),
                    cases,
                    default: Some(vec![reader().method("skipField", vec![]).stmt()]),
                },
            ],
        },
        Stmt::ret(ident("message")),
    ];

    Ok(ClassMember::Method {
        name: "deserialize".to_string(),
        is_static: true,
        is_abstract: false,
        params: vec![Param::typed(
            "bytes",
            TypeNode::Union(vec![
                TypeNode::named("Uint8Array"),
                TypeNode::named(format!("{}.BinaryReader", ctx.scope.pb)),
            ]),
        )],
        ret: Some(TypeNode::named(ctx.name())),
        body: Some(body),
    })
}
