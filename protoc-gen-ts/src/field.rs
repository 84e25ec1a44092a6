//! Field classification
//!
//! Predicates over a single field descriptor and the derived [`FieldKind`]
//! that every synthesizer matches on. Computing the kind once per field
//! keeps accessors, object conversion and the binary codec in agreement.

use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::field_options::JsType;
use prost_types::{DescriptorProto, FieldDescriptorProto, FileDescriptorProto};

use crate::ast::TypeNode;
use crate::error::GeneratorError;
use crate::symbol::{FileScope, MapEntry, SymbolTable};

/// Whether the field is `repeated`
pub fn is_repeated(field: &FieldDescriptorProto) -> bool {
    field.label() == Label::Repeated
}

/// Whether the field holds a message
pub fn is_message(field: &FieldDescriptorProto) -> bool {
    field.r#type() == Type::Message
}

/// Whether the field holds an enum
pub fn is_enum(field: &FieldDescriptorProto) -> bool {
    field.r#type() == Type::Enum
}

/// Whether the field holds one of the twelve numeric scalar types
pub fn is_numeric(field: &FieldDescriptorProto) -> bool {
    matches!(
        field.r#type(),
        Type::Double
            | Type::Float
            | Type::Int32
            | Type::Int64
            | Type::Uint32
            | Type::Uint64
            | Type::Sint32
            | Type::Sint64
            | Type::Fixed32
            | Type::Fixed64
            | Type::Sfixed32
            | Type::Sfixed64
    )
}

/// Whether the field holds a string
pub fn is_string(field: &FieldDescriptorProto) -> bool {
    field.r#type() == Type::String
}

/// Whether the field holds a bool
pub fn is_boolean(field: &FieldDescriptorProto) -> bool {
    field.r#type() == Type::Bool
}

/// Whether the field's type is a registered map entry
pub fn is_map(table: &SymbolTable, field: &FieldDescriptorProto) -> bool {
    field
        .type_name
        .as_deref()
        .is_some_and(|name| table.map_entry_of(name).is_some())
}

/// Whether the field belongs to a oneof group (including proto3 optional's synthetic one)
pub fn is_oneof(field: &FieldDescriptorProto) -> bool {
    field.oneof_index.is_some()
}

/// Whether the generated property is optional
///
/// proto2: exactly the `optional` label. proto3: every field that is not
/// `required`, plus anything carrying the explicit proto3 `optional`
/// marker. This is broader than proto3's explicit-presence rules, which
/// only give presence to `optional`, message and oneof fields.
pub fn is_optional(file: &FileDescriptorProto, field: &FieldDescriptorProto) -> bool {
    if file.syntax() == "proto3" {
        field.label() != Label::Required || field.proto3_optional()
    } else {
        field.label() == Label::Optional
    }
}

/// Whether values of this type may use packed encoding
pub fn is_type_packable(ty: Type) -> bool {
    !matches!(ty, Type::String | Type::Group | Type::Message | Type::Bytes)
}

/// Repeated and of a packable type
pub fn is_packable(field: &FieldDescriptorProto) -> bool {
    is_repeated(field) && is_type_packable(field.r#type())
}

/// Packable and explicitly marked `[packed = true]`
pub fn is_packed(field: &FieldDescriptorProto) -> bool {
    is_packable(field) && field.options.as_ref().and_then(|o| o.packed).unwrap_or(false)
}

/// Whether 64-bit values are exposed as strings (`[jstype = JS_STRING]`)
pub fn has_js_type_string(field: &FieldDescriptorProto) -> bool {
    field
        .options
        .as_ref()
        .is_some_and(|o| o.jstype() == JsType::JsString)
}

fn unsupported(field: &FieldDescriptorProto) -> GeneratorError {
    GeneratorError::UnsupportedFieldType {
        field: field.name().to_string(),
        kind: field.r#type().as_str_name().to_string(),
    }
}

/// Runtime name of the scalar type (`Int32`, `Sfixed64`, `Message`, ...)
fn wire_type_name(field: &FieldDescriptorProto) -> Result<&'static str, GeneratorError> {
    Ok(match field.r#type() {
        Type::Double => "Double",
        Type::Float => "Float",
        Type::Int64 => "Int64",
        Type::Uint64 => "Uint64",
        Type::Int32 => "Int32",
        Type::Fixed64 => "Fixed64",
        Type::Fixed32 => "Fixed32",
        Type::Bool => "Bool",
        Type::String => "String",
        Type::Message => "Message",
        Type::Bytes => "Bytes",
        Type::Uint32 => "Uint32",
        Type::Enum => "Enum",
        Type::Sfixed32 => "Sfixed32",
        Type::Sfixed64 => "Sfixed64",
        Type::Sint32 => "Sint32",
        Type::Sint64 => "Sint64",
        Type::Group => return Err(unsupported(field)),
    })
}

/// Name of the reader/writer routine for a field, without the `read`/`write` verb
///
/// `Packed` prefix for packed fields, `Repeated` for other repeated fields
/// on the writer side, `String` suffix for JS_STRING 64-bit values.
pub fn wire_method_name(
    field: &FieldDescriptorProto,
    as_writer: bool,
) -> Result<String, GeneratorError> {
    let type_name = wire_type_name(field)?;
    let prefix = if is_packed(field) {
        "Packed"
    } else if is_repeated(field) && as_writer {
        "Repeated"
    } else {
        ""
    };
    let suffix = if has_js_type_string(field) { "String" } else { "" };
    Ok(format!("{}{}{}", prefix, type_name, suffix))
}

/// Generated TypeScript type of a single value of the field
pub fn value_type(scope: &FileScope<'_>, field: &FieldDescriptorProto) -> Result<TypeNode, GeneratorError> {
    if let Some(entry) = field.type_name.as_deref().and_then(|n| scope.map_entry_of(n)) {
        return Ok(TypeNode::generic(
            "Map",
            vec![
                value_type(scope, &entry.key)?,
                value_type(scope, &entry.value)?,
            ],
        ));
    }
    if has_js_type_string(field) {
        return Ok(TypeNode::named("string"));
    }
    Ok(match field.r#type() {
        Type::String => TypeNode::named("string"),
        Type::Bool => TypeNode::named("boolean"),
        Type::Bytes => TypeNode::named("Uint8Array"),
        Type::Message | Type::Enum => scope.resolve_type(field.type_name()),
        Type::Group => return Err(unsupported(field)),
        _ => TypeNode::named("number"),
    })
}

/// Property type of the field: [`value_type`] wrapped in an array for repeated non-map fields
pub fn property_type(scope: &FileScope<'_>, field: &FieldDescriptorProto) -> Result<TypeNode, GeneratorError> {
    let ty = value_type(scope, field)?;
    Ok(if is_repeated(field) && !is_map(scope.table, field) {
        ty.array()
    } else {
        ty
    })
}

/// Closed classification of how a field is stored and encoded
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind<'a> {
    /// `map<K, V>`; the descriptor itself is a repeated map-entry message
    Map(&'a MapEntry),
    /// Singular or repeated nested message
    Message {
        /// Fully qualified message type name
        type_name: &'a str,
        /// Stored as an array of messages
        repeated: bool,
    },
    /// Singular or repeated scalar (including enums)
    Scalar {
        /// Stored as an array
        repeated: bool,
        /// Encoded with packed wire format
        packed: bool,
    },
}

/// A field with its classification computed once
#[derive(Debug, Clone)]
pub struct ClassifiedField<'a> {
    /// Underlying descriptor
    pub descriptor: &'a FieldDescriptorProto,
    /// Storage and encoding classification
    pub kind: FieldKind<'a>,
    /// Generated property may be absent
    pub optional: bool,
    /// Index into the message's `oneof_decl`
    pub oneof_index: Option<usize>,
}

impl<'a> ClassifiedField<'a> {
    /// Classify one field of a message in `scope`
    pub fn new(scope: &FileScope<'a>, field: &'a FieldDescriptorProto) -> Result<Self, GeneratorError> {
        if field.r#type() == Type::Group {
            return Err(unsupported(field));
        }

        let map_entry = field.type_name.as_deref().and_then(|n| scope.map_entry_of(n));
        let kind = match map_entry {
            Some(entry) => FieldKind::Map(entry),
            None if is_message(field) => FieldKind::Message {
                type_name: field.type_name(),
                repeated: is_repeated(field),
            },
            None => FieldKind::Scalar {
                repeated: is_repeated(field),
                packed: is_packed(field),
            },
        };

        Ok(ClassifiedField {
            descriptor: field,
            kind,
            optional: is_optional(scope.file, field),
            oneof_index: field.oneof_index.map(|i| i as usize),
        })
    }

    /// Classify every field of `message`, in declaration order
    pub fn all(scope: &FileScope<'a>, message: &'a DescriptorProto) -> Result<Vec<Self>, GeneratorError> {
        message
            .field
            .iter()
            .map(|field| ClassifiedField::new(scope, field))
            .collect()
    }

    /// Property name
    pub fn name(&self) -> &'a str {
        self.descriptor.name()
    }

    /// Wire tag
    pub fn number(&self) -> i32 {
        self.descriptor.number()
    }

    /// Whether the field is `repeated` at the storage level (maps excluded)
    pub fn is_repeated_storage(&self) -> bool {
        match self.kind {
            FieldKind::Map(_) => false,
            FieldKind::Message { repeated, .. } | FieldKind::Scalar { repeated, .. } => repeated,
        }
    }
}

/// Field numbers of each oneof group of `fields`, in group order
pub fn oneof_groups(message: &DescriptorProto, fields: &[ClassifiedField<'_>]) -> Vec<Vec<i32>> {
    (0..message.oneof_decl.len())
        .map(|index| {
            fields
                .iter()
                .filter(|f| f.oneof_index == Some(index))
                .map(ClassifiedField::number)
                .collect()
        })
        .collect()
}
