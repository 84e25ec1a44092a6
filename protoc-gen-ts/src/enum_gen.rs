//! Enum generation
//!
//! Protobuf enums map one-to-one onto exported TypeScript numeric enums,
//! keeping the proto value names and numbers as written.

use prost_types::EnumDescriptorProto;

use crate::ast::{Decl, EnumDecl};

/// Generate a TypeScript enum from a protobuf enum definition
pub fn generate(enum_desc: &EnumDescriptorProto) -> Decl {
    tracing::debug!(name = enum_desc.name(), "synthesizing enum");

    Decl::Enum(EnumDecl {
        name: enum_desc.name().to_string(),
        members: enum_desc
            .value
            .iter()
            .map(|value| (value.name().to_string(), value.number()))
            .collect(),
    })
}
