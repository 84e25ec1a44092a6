//! Error types for code generation
//!
//! Every synthesis step returns these errors; the plugin entry point turns
//! them into a `CodeGeneratorResponse.error` so protoc can report them.

/// Error type for code generation
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// A field uses a wire type this generator does not support (e.g. groups)
    #[error("unsupported type {kind} on field `{field}`")]
    UnsupportedFieldType {
        /// Field name as written in the proto file
        field: String,
        /// Protobuf type name of the field
        kind: String,
    },

    /// A descriptor is missing data the generator relies on
    #[error("descriptor is missing {0}")]
    MissingDescriptorData(String),

    /// Code generation failed
    #[error("code generation error: {0}")]
    CodeGenError(String),

    /// Failed to decode protobuf message
    #[error("decode error: {0}")]
    DecodeError(String),
}

impl From<prost::DecodeError> for GeneratorError {
    fn from(e: prost::DecodeError) -> Self {
        GeneratorError::DecodeError(e.to_string())
    }
}
