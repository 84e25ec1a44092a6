//! RPC call shapes

use prost_types::MethodDescriptorProto;

/// Streaming shape of an RPC method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallShape {
    /// Single request, single response
    Unary,
    /// Request stream, single response
    ClientStreaming,
    /// Single request, response stream
    ServerStreaming,
    /// Streams in both directions
    Bidi,
}

impl CallShape {
    /// Classify a method by its streaming flags
    pub fn of(method: &MethodDescriptorProto) -> Self {
        match (method.client_streaming(), method.server_streaming()) {
            (false, false) => CallShape::Unary,
            (true, false) => CallShape::ClientStreaming,
            (false, true) => CallShape::ServerStreaming,
            (true, true) => CallShape::Bidi,
        }
    }

    /// Server-side call object type (without the `grpc_1.` prefix)
    pub fn server_call(self) -> &'static str {
        match self {
            CallShape::Unary => "ServerUnaryCall",
            CallShape::ClientStreaming => "ServerReadableStream",
            CallShape::ServerStreaming => "ServerWritableStream",
            CallShape::Bidi => "ServerDuplexStream",
        }
    }

    /// Whether the handler completes through a `sendUnaryData` callback
    pub fn has_unary_response(self) -> bool {
        matches!(self, CallShape::Unary | CallShape::ClientStreaming)
    }

    /// Whether the client sends a single request message
    pub fn has_unary_request(self) -> bool {
        matches!(self, CallShape::Unary | CallShape::ServerStreaming)
    }
}
