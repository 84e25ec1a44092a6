//! protoc-gen-ts
//!
//! A protoc plugin generating TypeScript for `google-protobuf` messages and
//! `@grpc/grpc-js` services.
//!
//! Usage:
//!   protoc --plugin=protoc-gen-ts --ts_out=./gen proto/*.proto
//!   protoc --plugin=protoc-gen-ts --ts_out=./gen --ts_opt=unary_rpc_promise=true proto/*.proto

#![deny(warnings)]
#![deny(missing_docs)]

pub mod ast;
pub mod enum_gen;
mod error;
pub mod field;
pub mod generator;
pub mod grpc;
pub mod message;
pub mod options;
pub mod printer;
pub mod symbol;

pub use error::GeneratorError;
pub use generator::generate;
pub use options::{Options, Style};
