//! Service wire definition
//!
//! The object `@grpc/grpc-js` needs to route and (de)serialize calls:
//! one entry per method keyed by the method name.

use prost_types::{MethodDescriptorProto, ServiceDescriptorProto};

use crate::ast::{Expr, Param, PropertyKey, TypeNode, arrow, ident, string};
use crate::error::GeneratorError;
use crate::symbol::FileScope;

/// `/package.Service/Method`
pub fn rpc_path(scope: &FileScope<'_>, service: &ServiceDescriptorProto, method: &MethodDescriptorProto) -> String {
    match scope.file.package() {
        "" => format!("/{}/{}", service.name(), method.name()),
        package => format!("/{}.{}/{}", package, service.name(), method.name()),
    }
}

/// `(message: T) => Buffer.from(message.serialize())`
fn serializer(ty: TypeNode) -> Expr {
    arrow(
        vec![Param::typed("message", ty)],
        ident("Buffer").method("from", vec![ident("message").method("serialize", vec![])]),
    )
}

/// `(bytes: Buffer) => T.deserialize(new Uint8Array(bytes))`
fn deserializer(target: Expr) -> Expr {
    arrow(
        vec![Param::typed("bytes", TypeNode::named("Buffer"))],
        target.method(
            "deserialize",
            vec![ident("Uint8Array").construct(vec![ident("bytes")])],
        ),
    )
}

/// Object literal of method definitions for `service`
pub fn definition(scope: &FileScope<'_>, service: &ServiceDescriptorProto) -> Result<Expr, GeneratorError> {
    let mut methods = Vec::with_capacity(service.method.len());

    for method in &service.method {
        let (request, response) = super::message_types(scope, method)?;
        let key = |name: &str| PropertyKey::Name(name.to_string());

        methods.push((
            key(method.name()),
            Expr::Object {
                properties: vec![
                    (key("path"), string(&rpc_path(scope, service, method))),
                    (key("requestStream"), Expr::Bool(method.client_streaming())),
                    (key("responseStream"), Expr::Bool(method.server_streaming())),
                    (key("requestSerialize"), serializer(request)),
                    (
                        key("requestDeserialize"),
                        deserializer(scope.resolve_expr(method.input_type())),
                    ),
                    (key("responseSerialize"), serializer(response)),
                    (
                        key("responseDeserialize"),
                        deserializer(scope.resolve_expr(method.output_type())),
                    ),
                ],
                multiline: true,
            },
        ));
    }

    Ok(Expr::Object {
        properties: methods,
        multiline: true,
    })
}
