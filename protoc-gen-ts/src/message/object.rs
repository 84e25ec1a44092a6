//! Plain-object conversion: `fromObject` and `toObject`

use crate::ast::{
    Binding, ClassMember, Expr, Param, PropertyKey, Stmt, arrow, ident, num, string,
};
use crate::error::GeneratorError;
use crate::field::{ClassifiedField, FieldKind, is_boolean, is_message, is_numeric, is_string};
use crate::symbol::MapEntry;

use super::MessageContext;
use super::signature::object_signature;

/// `data.field` converted into the live value stored on the message
fn live_value(ctx: &MessageContext<'_, '_>, field: &ClassifiedField<'_>) -> Expr {
    let source = ident("data").prop(field.name());

    match &field.kind {
        FieldKind::Map(entry) => ident("Map").construct(vec![map_entries_from_object(ctx, entry, source)]),
        FieldKind::Message {
            type_name,
            repeated: true,
        } => source.method(
            "map",
            vec![arrow(
                vec![Param::untyped("item")],
                ctx.scope
                    .resolve_expr(type_name)
                    .method("fromObject", vec![ident("item")]),
            )],
        ),
        FieldKind::Message {
            type_name,
            repeated: false,
        } => ctx
            .scope
            .resolve_expr(type_name)
            .method("fromObject", vec![source]),
        FieldKind::Scalar { .. } => source,
    }
}

/// `Object.entries(source)`, with keys coerced and message values rebuilt when needed
fn map_entries_from_object(ctx: &MessageContext<'_, '_>, entry: &MapEntry, source: Expr) -> Expr {
    let entries = ident("Object").method("entries", vec![source]);

    let value_is_message = is_message(&entry.value);
    if !value_is_message && is_string(&entry.key) {
        return entries;
    }

    // object keys are always strings
    let mut key = ident("key");
    if is_numeric(&entry.key) {
        key = ident("Number").call(vec![key]);
    } else if is_boolean(&entry.key) {
        key = key.binary("===", string("true"));
    }

    let mut value = ident("value");
    if value_is_message {
        value = ctx
            .scope
            .resolve_expr(entry.value.type_name())
            .method("fromObject", vec![value]);
    }

    entries.method(
        "map",
        vec![arrow(vec![Param::pair("key", "value")], Expr::Array(vec![key, value]))],
    )
}

/// `this.field` converted into its plain-object form
fn plain_value(ctx: &MessageContext<'_, '_>, field: &ClassifiedField<'_>) -> Expr {
    let source = Expr::This.prop(field.name());

    match &field.kind {
        FieldKind::Map(entry) => {
            let entries = if is_message(&entry.value) {
                ident("Array").method("from", vec![source]).method(
                    "map",
                    vec![arrow(
                        vec![Param::pair("key", "value")],
                        Expr::Array(vec![ident("key"), ident("value").method("toObject", vec![])]),
                    )],
                )
            } else {
                source
            };
            ident("Object").method("fromEntries", vec![entries])
        }
        FieldKind::Message {
            type_name,
            repeated: true,
        } => source.method(
            "map",
            vec![arrow(
                vec![Param::typed("item", ctx.scope.resolve_type(type_name))],
                ident("item").method("toObject", vec![]),
            )],
        ),
        FieldKind::Message {
            repeated: false, ..
        } => source.method("toObject", vec![]),
        FieldKind::Scalar { .. } => source,
    }
}

/// `static fromObject(data: {...})`
///
/// Required fields go straight into the constructor record; optional ones
/// are assigned afterwards when present.
pub(super) fn from_object(ctx: &MessageContext<'_, '_>) -> Result<ClassMember, GeneratorError> {
    let data = || ident("data");
    let mut record = Vec::new();
    let mut assignments = Vec::new();

    for field in &ctx.fields {
        let value = live_value(ctx, field);
        if !field.optional {
            record.push((PropertyKey::Name(field.name().to_string()), value));
            continue;
        }

        let present = match field.kind {
            FieldKind::Map(_) => data()
                .prop(field.name())
                .type_of()
                .binary("==", string("object")),
            _ => data().prop(field.name()).binary("!=", Expr::Null),
        };
        assignments.push(Stmt::when(
            present,
            vec![ident("message").prop(field.name()).assign(value).stmt()],
        ));
    }

    let mut body = vec![Stmt::constant(
        "message",
        ident(ctx.name()).construct(vec![Expr::Object {
            properties: record,
            multiline: true,
        }]),
    )];
    body.extend(assignments);
    body.push(Stmt::ret(ident("message")));

    Ok(ClassMember::Method {
        name: "fromObject".to_string(),
        is_static: true,
        is_abstract: false,
        params: vec![Param::typed("data", object_signature(ctx)?)],
        ret: None,
        body: Some(body),
    })
}

/// `toObject()`
///
/// Optional fields only appear when set; empty maps count as unset.
pub(super) fn to_object(ctx: &MessageContext<'_, '_>) -> Result<ClassMember, GeneratorError> {
    let mut record = Vec::new();
    let mut assignments = Vec::new();

    for field in &ctx.fields {
        let value = plain_value(ctx, field);
        if !field.optional {
            record.push((PropertyKey::Name(field.name().to_string()), value));
            continue;
        }

        let this_field = Expr::This.prop(field.name());
        let present = match field.kind {
            FieldKind::Map(_) => this_field.prop("size").binary(">", num(0)),
            _ => this_field.binary("!=", Expr::Null),
        };
        assignments.push(Stmt::when(
            present,
            vec![ident("data").prop(field.name()).assign(value).stmt()],
        ));
    }

    let mut body = vec![Stmt::Const {
        binding: Binding::Name("data".to_string()),
        ty: Some(object_signature(ctx)?),
        init: Expr::Object {
            properties: record,
            multiline: true,
        },
    }];
    body.extend(assignments);
    body.push(Stmt::ret(ident("data")));

    Ok(ClassMember::Method {
        name: "toObject".to_string(),
        is_static: false,
        is_abstract: false,
        params: vec![],
        ret: None,
        body: Some(body),
    })
}
