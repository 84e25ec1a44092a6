//! Code generation orchestration
//!
//! Builds the run-wide symbol table from every file in the request, then
//! composes one TypeScript module per file protoc asked us to generate.

use prost_types::FileDescriptorProto;
use prost_types::compiler::code_generator_response::File;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};

use crate::ast::{Decl, Import, SourceFile};
use crate::error::GeneratorError;
use crate::options::Options;
use crate::printer::print_file;
use crate::symbol::{FileScope, SymbolTable};
use crate::{enum_gen, grpc, message};

/// `CodeGeneratorResponse.Feature.FEATURE_PROTO3_OPTIONAL`
const FEATURE_PROTO3_OPTIONAL: u64 = 1;

/// Run the plugin over a decoded request
///
/// Generation failures are reported through `CodeGeneratorResponse.error`
/// rather than returned, so protoc can print them.
pub fn generate(request: CodeGeneratorRequest) -> CodeGeneratorResponse {
    match generate_files(&request) {
        Ok(file) => CodeGeneratorResponse {
            file,
            error: None,
            supported_features: Some(FEATURE_PROTO3_OPTIONAL),
        },
        Err(e) => {
            tracing::error!(error = %e, "generation failed");
            CodeGeneratorResponse {
                file: Vec::new(),
                error: Some(e.to_string()),
                supported_features: Some(FEATURE_PROTO3_OPTIONAL),
            }
        }
    }
}

/// Generate every requested file
pub fn generate_files(request: &CodeGeneratorRequest) -> Result<Vec<File>, GeneratorError> {
    let options = Options::parse(request.parameter());
    let table = SymbolTable::from_files(&request.proto_file)?;

    tracing::info!(
        files = request.file_to_generate.len(),
        symbols = table.len(),
        "generating TypeScript"
    );

    let mut files = Vec::with_capacity(request.file_to_generate.len());
    for file_name in &request.file_to_generate {
        let file = request
            .proto_file
            .iter()
            .find(|f| f.name() == file_name.as_str())
            .ok_or_else(|| {
                GeneratorError::CodeGenError(format!("file descriptor not found: {}", file_name))
            })?;

        let source = compose(&table, file, &options, request.compiler_version.as_ref())?;
        files.push(File {
            name: Some(output_name(file.name())),
            content: Some(print_file(&source)),
            ..Default::default()
        });
    }

    Ok(files)
}

/// Build the declaration tree of one output file
pub fn compose(
    table: &SymbolTable,
    file: &FileDescriptorProto,
    options: &Options,
    compiler_version: Option<&prost_types::compiler::Version>,
) -> Result<SourceFile, GeneratorError> {
    tracing::debug!(
        file = file.name(),
        messages = file.message_type.len(),
        services = file.service.len(),
        "composing file"
    );

    let mut scope = FileScope::new(table, file);
    let mut imports = Vec::new();
    for (index, dependency) in file.dependency.iter().enumerate() {
        let identifier = format!("dependency_{}", index + 1);
        scope.set_dependency_identifier(dependency, &identifier);
        imports.push(Import {
            ident: identifier,
            module: relative_import(file.name(), dependency),
        });
    }

    let mut body: Vec<Decl> = file.enum_type.iter().map(enum_gen::generate).collect();
    for message_type in &file.message_type {
        body.extend(message::generate(&scope, message_type)?);
    }
    if !file.service.is_empty() {
        body.extend(grpc::call_shape_interfaces(&scope));
        for service in &file.service {
            body.extend(grpc::generate(&scope, service, options)?);
        }
    }

    if !body.is_empty() {
        imports.push(Import {
            ident: scope.pb.clone(),
            module: "google-protobuf".to_string(),
        });
    }
    if !file.service.is_empty() {
        imports.push(Import {
            ident: scope.grpc.clone(),
            module: options.grpc_package.clone(),
        });
    }

    let body = match file.package() {
        package if !package.is_empty() && !body.is_empty() => vec![Decl::namespace(package, body)],
        _ => body,
    };

    Ok(SourceFile {
        header: header(file, compiler_version),
        imports,
        body,
    })
}

fn header(file: &FileDescriptorProto, compiler_version: Option<&prost_types::compiler::Version>) -> Vec<String> {
    let mut lines = vec!["Generated by protoc-gen-ts. DO NOT EDIT!".to_string()];
    if let Some(version) = compiler_version {
        lines.push(format!(
            "compiler version: {}.{}.{}{}",
            version.major(),
            version.minor(),
            version.patch(),
            match version.suffix() {
                "" => String::new(),
                suffix => format!("-{}", suffix),
            }
        ));
    }
    lines.push(format!("source: {}", file.name()));
    lines
}

/// `foo/bar.proto` -> `foo/bar.ts`
pub fn output_name(proto_name: &str) -> String {
    let stem = proto_name.strip_suffix(".proto").unwrap_or(proto_name);
    format!("{}.ts", stem)
}

/// Module specifier importing `dependency` from the directory of `from`
pub fn relative_import(from: &str, dependency: &str) -> String {
    let target = dependency.strip_suffix(".proto").unwrap_or(dependency);

    let mut from_dir: Vec<&str> = from.split('/').collect();
    from_dir.pop();
    let target: Vec<&str> = target.split('/').collect();
    let (target_dir, target_file) = target.split_at(target.len() - 1);

    let common = from_dir
        .iter()
        .zip(target_dir)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = vec![".."; from_dir.len() - common];
    parts.extend(&target_dir[common..]);
    parts.extend(target_file);

    format!("./{}", parts.join("/"))
}
