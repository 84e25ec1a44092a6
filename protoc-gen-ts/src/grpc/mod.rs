//! gRPC service generation
//!
//! Each service becomes an abstract `Unimplemented<Name>Service` server
//! class carrying the wire definition, and a `<Name>Client` built from that
//! definition with `@grpc/grpc-js`'s generic client constructor. The call
//! shape interfaces shared by every client are emitted once per file.

mod client;
mod definition;
mod interfaces;
mod server;
mod shape;

use prost_types::{MethodDescriptorProto, ServiceDescriptorProto};

use crate::ast::{Decl, TypeNode};
use crate::error::GeneratorError;
use crate::options::Options;
use crate::symbol::FileScope;

pub use interfaces::call_shape_interfaces;
pub use shape::CallShape;

/// Generate the server and client declarations of one service
pub fn generate(
    scope: &FileScope<'_>,
    service: &ServiceDescriptorProto,
    options: &Options,
) -> Result<Vec<Decl>, GeneratorError> {
    if service.name.is_none() {
        return Err(GeneratorError::MissingDescriptorData(
            "name on service".to_string(),
        ));
    }

    tracing::debug!(
        service = service.name(),
        methods = service.method.len(),
        "synthesizing service"
    );

    Ok(vec![
        Decl::Class(server::server(scope, service)?),
        Decl::Class(client::client(scope, service, options)?),
    ])
}

/// Name of the abstract server class
fn server_name(service: &ServiceDescriptorProto) -> String {
    format!("Unimplemented{}Service", service.name())
}

/// Resolved request and response types of a method
fn message_types(
    scope: &FileScope<'_>,
    method: &MethodDescriptorProto,
) -> Result<(TypeNode, TypeNode), GeneratorError> {
    let input = method.input_type.as_deref().ok_or_else(|| {
        GeneratorError::MissingDescriptorData(format!("input type on method `{}`", method.name()))
    })?;
    let output = method.output_type.as_deref().ok_or_else(|| {
        GeneratorError::MissingDescriptorData(format!("output type on method `{}`", method.name()))
    })?;
    Ok((scope.resolve_type(input), scope.resolve_type(output)))
}

/// `grpc_1.<name>` with optional type arguments
fn grpc_type(scope: &FileScope<'_>, name: &str, args: Vec<TypeNode>) -> TypeNode {
    TypeNode::generic(format!("{}.{}", scope.grpc, name), args)
}
