//! protoc-gen-ts
//!
//! Reads a `CodeGeneratorRequest` from stdin and writes the
//! `CodeGeneratorResponse` to stdout. Logs go to stderr.

use std::io::{self, Read, Write};

use prost::Message;
use prost_types::compiler::CodeGeneratorRequest;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the plugin protocol, so logs must stay on stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input)?;
    let request = CodeGeneratorRequest::decode(&input[..])
        .map_err(protoc_gen_ts::GeneratorError::from)?;

    let response = protoc_gen_ts::generate(request);

    let mut output = Vec::new();
    response.encode(&mut output)?;
    io::stdout().write_all(&output)?;

    Ok(())
}
