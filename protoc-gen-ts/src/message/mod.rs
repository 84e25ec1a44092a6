//! Message synthesis
//!
//! Each message becomes a class extending `pb_1.Message`: a constructor,
//! a getter/setter pair per field, a discriminant getter per oneof group,
//! plain-object conversion and the binary codec. Nested enums and messages
//! go into a namespace named after the message.

mod accessor;
mod binary;
mod constructor;
mod object;
mod signature;

use prost_types::DescriptorProto;

use crate::ast::{ClassDecl, ClassMember, Decl, Expr, Param, Stmt, TypeNode, ident};
use crate::enum_gen;
use crate::error::GeneratorError;
use crate::field::{ClassifiedField, oneof_groups};
use crate::symbol::{FileScope, ordinary_nested_types};

/// Everything the member builders need to know about one message
pub(crate) struct MessageContext<'s, 'a> {
    pub scope: &'s FileScope<'a>,
    pub message: &'a DescriptorProto,
    pub fields: Vec<ClassifiedField<'a>>,
    /// Field numbers per oneof group, indexed like `oneof_decl`
    pub groups: Vec<Vec<i32>>,
}

impl<'s, 'a> MessageContext<'s, 'a> {
    pub fn new(scope: &'s FileScope<'a>, message: &'a DescriptorProto) -> Result<Self, GeneratorError> {
        let fields = ClassifiedField::all(scope, message)?;
        let groups = oneof_groups(message, &fields);
        Ok(MessageContext {
            scope,
            message,
            fields,
            groups,
        })
    }

    /// Class name of the message
    pub fn name(&self) -> &'a str {
        self.message.name()
    }

    /// `pb_1.Message`
    pub fn pb_message(&self) -> Expr {
        ident(&self.scope.pb).prop("Message")
    }

    /// Field numbers of the group `field` belongs to
    pub fn group_of(&self, field: &ClassifiedField<'_>) -> Option<&[i32]> {
        field
            .oneof_index
            .and_then(|index| self.groups.get(index))
            .map(Vec::as_slice)
    }
}

/// Synthesize a message class, followed by its namespace when it has nested types
pub fn generate(scope: &FileScope<'_>, message: &DescriptorProto) -> Result<Vec<Decl>, GeneratorError> {
    if message.name.is_none() {
        return Err(GeneratorError::MissingDescriptorData(
            "name on message".to_string(),
        ));
    }

    tracing::debug!(message = message.name(), "synthesizing message");

    let ctx = MessageContext::new(scope, message)?;

    let mut members = vec![constructor::constructor(&ctx)?];
    for field in &ctx.fields {
        members.push(accessor::getter(&ctx, field)?);
        members.push(accessor::setter(&ctx, field)?);
    }
    for index in 0..message.oneof_decl.len() {
        members.push(accessor::oneof_getter(&ctx, index));
    }
    members.push(object::from_object(&ctx)?);
    members.push(object::to_object(&ctx)?);
    members.extend(binary::serialize(&ctx)?);
    members.push(binary::deserialize(&ctx)?);
    members.extend(binary_aliases(&ctx));

    let mut decls = vec![Decl::Class(ClassDecl {
        name: ctx.name().to_string(),
        is_abstract: false,
        extends: Some(ctx.pb_message()),
        members,
    })];

    let nested: Vec<&DescriptorProto> = ordinary_nested_types(message).collect();
    if !message.enum_type.is_empty() || !nested.is_empty() {
        let mut body: Vec<Decl> = message.enum_type.iter().map(enum_gen::generate).collect();
        for child in nested {
            body.extend(generate(scope, child)?);
        }
        decls.push(Decl::Namespace {
            name: ctx.name().to_string(),
            body,
        });
    }

    Ok(decls)
}

/// `serializeBinary()` / `deserializeBinary(bytes)`
fn binary_aliases(ctx: &MessageContext<'_, '_>) -> [ClassMember; 2] {
    [
        ClassMember::Method {
            name: "serializeBinary".to_string(),
            is_static: false,
            is_abstract: false,
            params: vec![],
            ret: Some(TypeNode::named("Uint8Array")),
            body: Some(vec![Stmt::ret(Expr::This.method("serialize", vec![]))]),
        },
        ClassMember::Method {
            name: "deserializeBinary".to_string(),
            is_static: true,
            is_abstract: false,
            params: vec![Param::typed("bytes", TypeNode::named("Uint8Array"))],
            ret: Some(TypeNode::named(ctx.name())),
            body: Some(vec![Stmt::ret(
                ident(ctx.name()).method("deserialize", vec![ident("bytes")]),
            )]),
        },
    ]
}
