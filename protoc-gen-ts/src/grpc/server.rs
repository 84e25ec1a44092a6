//! Abstract server class

use prost_types::ServiceDescriptorProto;

use crate::ast::{ClassDecl, ClassMember, IndexSignature, Param, TypeNode};
use crate::error::GeneratorError;
use crate::symbol::FileScope;

use super::definition::definition;
use super::{CallShape, grpc_type, message_types, server_name};

/// `export abstract class Unimplemented<Name>Service`
///
/// Holds the wire definition as a static member, an untyped catch-all
/// handler signature, and one abstract handler per method.
pub fn server(scope: &FileScope<'_>, service: &ServiceDescriptorProto) -> Result<ClassDecl, GeneratorError> {
    let mut members = vec![
        ClassMember::Property {
            name: "definition".to_string(),
            is_static: true,
            ty: None,
            init: Some(definition(scope, service)?),
        },
        ClassMember::Index(IndexSignature {
            param: "method".to_string(),
            key: TypeNode::named("string"),
            value: grpc_type(scope, "UntypedHandleCall", vec![]),
        }),
    ];

    for method in &service.method {
        let shape = CallShape::of(method);
        let (request, response) = message_types(scope, method)?;

        let mut params = vec![Param::typed(
            "call",
            grpc_type(scope, shape.server_call(), vec![request, response.clone()]),
        )];
        if shape.has_unary_response() {
            params.push(Param::typed(
                "callback",
                grpc_type(scope, "sendUnaryData", vec![response]),
            ));
        }

        members.push(ClassMember::Method {
            name: method.name().to_string(),
            is_static: false,
            is_abstract: true,
            params,
            ret: Some(TypeNode::named("void")),
            body: None,
        });
    }

    Ok(ClassDecl {
        name: server_name(service),
        is_abstract: true,
        extends: None,
        members,
    })
}
