//! Type literals describing a message's fields
//!
//! Two shapes exist: the constructor shape, which carries live values
//! (nested message instances, `Map`s), and the plain-object shape used by
//! `fromObject`/`toObject`, where nested messages are their own plain
//! objects and maps are index signatures.

use crate::ast::{IndexSignature, PropertySignature, TypeLiteral, TypeNode};
use crate::error::GeneratorError;
use crate::field::{ClassifiedField, FieldKind, property_type, value_type};

use super::MessageContext;

/// Constructor record shape: all non-oneof fields, intersected with one union per oneof group
///
/// Each union alternative types exactly one member of the group and marks
/// its siblings `never`, so a record can populate at most one of them.
pub(super) fn message_signature(ctx: &MessageContext<'_, '_>) -> Result<TypeNode, GeneratorError> {
    let mut properties = Vec::new();
    for field in ctx.fields.iter().filter(|f| f.oneof_index.is_none()) {
        properties.push(PropertySignature {
            name: field.name().to_string(),
            optional: field.optional,
            ty: property_type(ctx.scope, field.descriptor)?,
        });
    }
    let base = TypeNode::Literal(TypeLiteral {
        properties,
        index: None,
    });

    if ctx.groups.is_empty() {
        return Ok(base);
    }

    let mut members = vec![base];
    for index in 0..ctx.groups.len() {
        let group: Vec<&ClassifiedField<'_>> = ctx
            .fields
            .iter()
            .filter(|f| f.oneof_index == Some(index))
            .collect();

        let mut alternatives = Vec::with_capacity(group.len());
        for selected in &group {
            let mut properties = Vec::with_capacity(group.len());
            for member in &group {
                let ty = if member.number() == selected.number() {
                    property_type(ctx.scope, member.descriptor)?
                } else {
                    TypeNode::named("never")
                };
                properties.push(PropertySignature {
                    name: member.name().to_string(),
                    optional: true,
                    ty,
                });
            }
            alternatives.push(TypeNode::Literal(TypeLiteral {
                properties,
                index: None,
            }));
        }
        if !alternatives.is_empty() {
            members.push(TypeNode::Union(alternatives));
        }
    }

    Ok(TypeNode::Intersection(members))
}

/// `ReturnType<typeof T.prototype.toObject>`
fn plain_message_type(ctx: &MessageContext<'_, '_>, type_name: &str) -> TypeNode {
    TypeNode::generic(
        "ReturnType",
        vec![TypeNode::Query(format!(
            "{}.prototype.toObject",
            ctx.scope.resolve_path(type_name)
        ))],
    )
}

/// Plain-object shape accepted by `fromObject` and produced by `toObject`
pub(super) fn object_signature(ctx: &MessageContext<'_, '_>) -> Result<TypeNode, GeneratorError> {
    let mut properties = Vec::with_capacity(ctx.fields.len());

    for field in &ctx.fields {
        let ty = match &field.kind {
            FieldKind::Map(entry) => {
                let value = match entry.value.type_name.as_deref() {
                    Some(type_name) if crate::field::is_message(&entry.value) => {
                        plain_message_type(ctx, type_name)
                    }
                    _ => value_type(ctx.scope, &entry.value)?,
                };
                TypeNode::Literal(TypeLiteral {
                    properties: Vec::new(),
                    index: Some(Box::new(IndexSignature {
                        param: "key".to_string(),
                        key: value_type(ctx.scope, &entry.key)?,
                        value,
                    })),
                })
            }
            FieldKind::Message {
                type_name,
                repeated,
            } => {
                let ty = plain_message_type(ctx, type_name);
                if *repeated { ty.array() } else { ty }
            }
            FieldKind::Scalar { .. } => property_type(ctx.scope, field.descriptor)?,
        };

        properties.push(PropertySignature {
            name: field.name().to_string(),
            optional: field.optional,
            ty,
        });
    }

    Ok(TypeNode::Literal(TypeLiteral {
        properties,
        index: None,
    }))
}
