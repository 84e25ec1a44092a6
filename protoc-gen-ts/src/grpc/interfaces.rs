//! Call-shape interfaces shared by every generated client
//!
//! Each interface lists the argument arities `@grpc/grpc-js` accepts for a
//! call of that shape, generic over the request `P` and response `R`.

use crate::ast::{CallSignature, Decl, InterfaceDecl, Param, TypeNode};
use crate::symbol::FileScope;

use super::grpc_type;

fn interface(name: &str, signatures: Vec<CallSignature>) -> Decl {
    Decl::Interface(InterfaceDecl {
        name: name.to_string(),
        type_params: vec!["P".to_string(), "R".to_string()],
        signatures,
    })
}

fn signature(params: Vec<Param>, ret: &TypeNode) -> CallSignature {
    CallSignature {
        params,
        ret: ret.clone(),
    }
}

/// The five interfaces, in the order they are emitted
pub fn call_shape_interfaces(scope: &FileScope<'_>) -> Vec<Decl> {
    let p = || TypeNode::named("P");
    let r = || TypeNode::named("R");

    let message = || Param::typed("message", p());
    let metadata = || Param::typed("metadata", grpc_type(scope, "Metadata", vec![]));
    let options = || Param::typed("options", grpc_type(scope, "CallOptions", vec![]));
    let options_opt = || Param::optional("options", grpc_type(scope, "CallOptions", vec![]));
    let callback = || Param::typed("callback", grpc_type(scope, "requestCallback", vec![r()]));

    let unary = grpc_type(scope, "ClientUnaryCall", vec![]);
    let readable = grpc_type(scope, "ClientReadableStream", vec![r()]);
    let writable = grpc_type(scope, "ClientWritableStream", vec![p()]);
    let duplex = grpc_type(scope, "ClientDuplexStream", vec![p(), r()]);
    let promise = TypeNode::generic("Promise", vec![r()]);

    vec![
        interface(
            "GrpcUnaryServiceInterface",
            vec![
                signature(vec![message(), metadata(), options(), callback()], &unary),
                signature(vec![message(), metadata(), callback()], &unary),
                signature(vec![message(), options(), callback()], &unary),
                signature(vec![message(), callback()], &unary),
            ],
        ),
        interface(
            "GrpcStreamServiceInterface",
            vec![
                signature(vec![message(), metadata(), options_opt()], &readable),
                signature(vec![message(), options_opt()], &readable),
            ],
        ),
        interface(
            "GrpcWritableServiceInterface",
            vec![
                signature(vec![metadata(), options(), callback()], &writable),
                signature(vec![metadata(), callback()], &writable),
                signature(vec![options(), callback()], &writable),
                signature(vec![callback()], &writable),
            ],
        ),
        interface(
            "GrpcChunkServiceInterface",
            vec![
                signature(vec![metadata(), options_opt()], &duplex),
                signature(vec![options_opt()], &duplex),
            ],
        ),
        interface(
            "GrpcPromiseServiceInterface",
            vec![
                signature(vec![message(), metadata(), options_opt()], &promise),
                signature(vec![message(), options_opt()], &promise),
            ],
        ),
    ]
}
