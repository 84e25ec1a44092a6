//! Typed client class

use prost_types::{MethodDescriptorProto, ServiceDescriptorProto};

use crate::ast::{
    ClassDecl, ClassMember, Expr, Param, Stmt, TypeNode, arrow, arrow_block, ident, string,
};
use crate::error::GeneratorError;
use crate::options::Options;
use crate::symbol::FileScope;

use super::{CallShape, grpc_type, message_types, server_name};

/// `export class <Name>Client extends grpc_1.makeGenericClientConstructor(...)`
pub fn client(
    scope: &FileScope<'_>,
    service: &ServiceDescriptorProto,
    options: &Options,
) -> Result<ClassDecl, GeneratorError> {
    let base = ident(&scope.grpc).method(
        "makeGenericClientConstructor",
        vec![
            ident(&server_name(service)).prop("definition"),
            string(service.name()),
            Expr::Object {
                properties: vec![],
                multiline: false,
            },
        ],
    );

    let mut members = vec![ClassMember::Constructor {
        params: vec![
            Param::typed("address", TypeNode::named("string")),
            Param::typed("credentials", grpc_type(scope, "ChannelCredentials", vec![])),
            Param::optional(
                "options",
                TypeNode::generic("Partial", vec![grpc_type(scope, "ChannelOptions", vec![])]),
            ),
        ],
        body: vec![
            Expr::Super
                .call(vec![ident("address"), ident("credentials"), ident("options")])
                .stmt(),
        ],
    }];

    for method in &service.method {
        members.push(client_method(scope, method, options)?);
    }

    Ok(ClassDecl {
        name: format!("{}Client", service.name()),
        is_abstract: false,
        extends: Some(base),
        members,
    })
}

/// One client call as an arrow-valued property forwarding to the generic client
fn client_method(
    scope: &FileScope<'_>,
    method: &MethodDescriptorProto,
    options: &Options,
) -> Result<ClassMember, GeneratorError> {
    let (request, response) = message_types(scope, method)?;
    let shape = CallShape::of(method);
    let name = method.name();

    let metadata = || grpc_type(scope, "Metadata", vec![]);
    let call_options = || grpc_type(scope, "CallOptions", vec![]);
    let callback = || grpc_type(scope, "requestCallback", vec![response.clone()]);
    let forward = |args: &[&str]| {
        Stmt::ret(
            Expr::Super
                .prop(name)
                .call(args.iter().map(|a| ident(a)).collect()),
        )
    };

    let (interface, params, ret, body) = match shape {
        CallShape::Unary if options.promise_unary_calls() => (
            "GrpcPromiseServiceInterface",
            vec![
                Param::typed("message", request.clone()),
                Param::optional("metadata", TypeNode::Union(vec![metadata(), call_options()])),
                Param::optional("options", call_options()),
            ],
            TypeNode::generic("Promise", vec![response.clone()]),
            promise_body(scope, name, response.clone()),
        ),
        CallShape::Unary => (
            "GrpcUnaryServiceInterface",
            vec![
                Param::typed("message", request.clone()),
                Param::typed(
                    "metadata",
                    TypeNode::Union(vec![metadata(), call_options(), callback()]),
                ),
                Param::optional("options", TypeNode::Union(vec![call_options(), callback()])),
                Param::optional("callback", callback()),
            ],
            grpc_type(scope, "ClientUnaryCall", vec![]),
            vec![forward(&["message", "metadata", "options", "callback"])],
        ),
        CallShape::ClientStreaming => (
            "GrpcWritableServiceInterface",
            vec![
                Param::typed(
                    "metadata",
                    TypeNode::Union(vec![metadata(), call_options(), callback()]),
                ),
                Param::optional("options", TypeNode::Union(vec![call_options(), callback()])),
                Param::optional("callback", callback()),
            ],
            grpc_type(scope, "ClientWritableStream", vec![request.clone()]),
            vec![forward(&["metadata", "options", "callback"])],
        ),
        CallShape::ServerStreaming => (
            "GrpcStreamServiceInterface",
            vec![
                Param::typed("message", request.clone()),
                Param::optional("metadata", TypeNode::Union(vec![metadata(), call_options()])),
                Param::optional("options", call_options()),
            ],
            grpc_type(scope, "ClientReadableStream", vec![response.clone()]),
            vec![forward(&["message", "metadata", "options"])],
        ),
        CallShape::Bidi => (
            "GrpcChunkServiceInterface",
            vec![
                Param::optional("metadata", TypeNode::Union(vec![metadata(), call_options()])),
                Param::optional("options", call_options()),
            ],
            grpc_type(
                scope,
                "ClientDuplexStream",
                vec![request.clone(), response.clone()],
            ),
            vec![forward(&["metadata", "options"])],
        ),
    };

    Ok(ClassMember::Property {
        name: name.to_string(),
        is_static: false,
        ty: Some(TypeNode::generic(interface, vec![request, response])),
        init: Some(arrow_block(params, Some(ret), body)),
    })
}

/// Default the optional arguments, then adapt the callback call to a promise
fn promise_body(scope: &FileScope<'_>, name: &str, response: TypeNode) -> Vec<Stmt> {
    let settle = arrow_block(
        vec![
            Param::typed("error", grpc_type(scope, "ServiceError", vec![])),
            Param::typed("response", response),
        ],
        None,
        vec![Stmt::If {
            cond: ident("error"),
            then: vec![ident("reject").call(vec![ident("error")]).stmt()],
            otherwise: Some(vec![ident("resolve").call(vec![ident("response")]).stmt()]),
        }],
    );
    let call = Expr::Super.prop(name).call(vec![
        ident("message"),
        ident("metadata"),
        ident("options"),
        settle,
    ]);

    vec![
        Stmt::when(
            ident("metadata").not(),
            vec![
                ident("metadata")
                    .assign(ident(&scope.grpc).prop("Metadata").construct(vec![]))
                    .stmt(),
            ],
        ),
        Stmt::when(
            ident("options").not(),
            vec![
                ident("options")
                    .assign(Expr::Object {
                        properties: vec![],
                        multiline: false,
                    })
                    .stmt(),
            ],
        ),
        Stmt::ret(ident("Promise").construct(vec![arrow(
            vec![Param::untyped("resolve"), Param::untyped("reject")],
            call,
        )])),
    ]
}
