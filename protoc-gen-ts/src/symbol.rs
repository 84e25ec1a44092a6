//! Symbol table and cross-file type resolution
//!
//! The table is built once per run from every file in the request and is
//! only borrowed immutably afterwards, so synthesis never observes a
//! half-populated registry. Import identifiers differ per output file and
//! therefore live on a [`FileScope`] rather than on the table itself.

use std::collections::HashMap;

use prost_types::{DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto};

use crate::ast::{Expr, TypeNode};
use crate::error::GeneratorError;

/// Key and value fields of a synthetic map-entry message
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    /// Field number 1
    pub key: FieldDescriptorProto,
    /// Field number 2
    pub value: FieldDescriptorProto,
}

/// Registry of fully-qualified type names for one generation run
#[derive(Debug, Default)]
pub struct SymbolTable {
    /// `.pkg.Outer.Inner` -> owning proto file name
    owners: HashMap<String, String>,
    /// `.pkg.Outer.FieldEntry` -> key/value pair
    map_entries: HashMap<String, MapEntry>,
}

impl SymbolTable {
    /// Build a table covering every file of a request
    pub fn from_files(files: &[FileDescriptorProto]) -> Result<Self, GeneratorError> {
        let mut table = SymbolTable::default();
        for file in files {
            table.populate_file(file)?;
        }
        tracing::debug!(
            symbols = table.owners.len(),
            map_entries = table.map_entries.len(),
            "symbol table populated"
        );
        Ok(table)
    }

    /// Register every enum and message declared in `file`
    pub fn populate_file(&mut self, file: &FileDescriptorProto) -> Result<(), GeneratorError> {
        let prefix = match file.package() {
            "" => String::new(),
            package => format!(".{}", package),
        };
        self.populate(file.name(), &prefix, &file.enum_type, &file.message_type)
    }

    /// Recursive walk registering `prefix.Name` for nested enums and messages
    fn populate(
        &mut self,
        owner: &str,
        prefix: &str,
        enums: &[EnumDescriptorProto],
        messages: &[DescriptorProto],
    ) -> Result<(), GeneratorError> {
        for enum_desc in enums {
            self.owners
                .insert(format!("{}.{}", prefix, enum_desc.name()), owner.to_string());
        }

        for message in messages {
            let name = format!("{}.{}", prefix, message.name());

            if is_map_entry(message) {
                let entry = map_entry_fields(message).ok_or_else(|| {
                    GeneratorError::MissingDescriptorData(format!(
                        "key/value fields on map entry `{}`",
                        name
                    ))
                })?;
                self.map_entries.insert(name, entry);
                continue;
            }

            self.owners.insert(name.clone(), owner.to_string());
            self.populate(owner, &name, &message.enum_type, &message.nested_type)?;
        }

        Ok(())
    }

    /// File that declares `type_name`, if known
    pub fn owner_of(&self, type_name: &str) -> Option<&str> {
        self.owners.get(type_name).map(String::as_str)
    }

    /// Key/value pair of a registered map entry, `None` when the type is not a map
    pub fn map_entry_of(&self, type_name: &str) -> Option<&MapEntry> {
        self.map_entries.get(type_name)
    }

    /// Number of registered (non map-entry) types
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Whether nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty() && self.map_entries.is_empty()
    }

    /// Forget everything so the table can serve an unrelated run
    pub fn clear(&mut self) {
        self.owners.clear();
        self.map_entries.clear();
    }
}

/// Whether a message is a synthetic map entry
pub fn is_map_entry(message: &DescriptorProto) -> bool {
    message
        .options
        .as_ref()
        .and_then(|o| o.map_entry)
        .unwrap_or(false)
}

/// Nested messages that are emitted as ordinary types (map entries excluded)
pub fn ordinary_nested_types(message: &DescriptorProto) -> impl Iterator<Item = &DescriptorProto> {
    message.nested_type.iter().filter(|m| !is_map_entry(m))
}

fn map_entry_fields(message: &DescriptorProto) -> Option<MapEntry> {
    let key = message.field.iter().find(|f| f.number() == 1)?;
    let value = message.field.iter().find(|f| f.number() == 2)?;
    Some(MapEntry {
        key: key.clone(),
        value: value.clone(),
    })
}

/// Resolution context for one output file
#[derive(Debug)]
pub struct FileScope<'a> {
    /// Frozen run-wide symbol table
    pub table: &'a SymbolTable,
    /// File being generated
    pub file: &'a FileDescriptorProto,
    /// Identifier of the protobuf runtime import
    pub pb: String,
    /// Identifier of the gRPC runtime import
    pub grpc: String,
    /// Dependency proto file name -> import identifier
    dependencies: HashMap<String, String>,
}

impl<'a> FileScope<'a> {
    /// Scope with the conventional `pb_1` / `grpc_1` runtime identifiers
    pub fn new(table: &'a SymbolTable, file: &'a FileDescriptorProto) -> Self {
        FileScope {
            table,
            file,
            pb: "pb_1".to_string(),
            grpc: "grpc_1".to_string(),
            dependencies: HashMap::new(),
        }
    }

    /// Record the identifier under which `dependency` is imported
    pub fn set_dependency_identifier(&mut self, dependency: &str, identifier: &str) {
        self.dependencies
            .insert(dependency.to_string(), identifier.to_string());
    }

    /// Import identifier of a dependency file
    pub fn dependency_identifier(&self, dependency: &str) -> Option<&str> {
        self.dependencies.get(dependency).map(String::as_str)
    }

    /// Key/value pair of a map entry, `None` when the type is not a map
    pub fn map_entry_of(&self, type_name: &str) -> Option<&'a MapEntry> {
        self.table.map_entry_of(type_name)
    }

    /// Dotted path naming `type_name` from inside the current file
    ///
    /// A type owned by a file that is not a direct dependency has no import
    /// identifier. It falls back to a package-relative name and logs a warning,
    /// since the emitted reference will not resolve in TypeScript.
    pub fn resolve_path(&self, type_name: &str) -> String {
        let owner = self.table.owner_of(type_name);
        match owner.map(|owner| (owner, self.dependency_identifier(owner))) {
            Some((_, Some(identifier))) => {
                format!("{}.{}", identifier, type_name.trim_start_matches('.'))
            }
            Some((owner, None)) if owner != self.file.name() => {
                tracing::warn!(
                    type_name,
                    owner,
                    file = self.file.name(),
                    "type is owned by a file that is not imported directly"
                );
                strip_package(type_name, self.file.package())
            }
            _ => strip_package(type_name, self.file.package()),
        }
    }

    /// Reference to `type_name` in a type position
    pub fn resolve_type(&self, type_name: &str) -> TypeNode {
        TypeNode::named(self.resolve_path(type_name))
    }

    /// Reference to `type_name` in a value position (`Type.fromObject(...)`)
    pub fn resolve_expr(&self, type_name: &str) -> Expr {
        let path = self.resolve_path(type_name);
        let mut segments = path.split('.');
        let head = segments.next().unwrap_or_default();
        segments.fold(Expr::Ident(head.to_string()), |expr, segment| {
            expr.prop(segment)
        })
    }
}

/// Drop the leading separator and the package prefix of a local type name
fn strip_package(type_name: &str, package: &str) -> String {
    let name = type_name.trim_start_matches('.');
    if package.is_empty() {
        return name.to_string();
    }
    name.strip_prefix(package)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::expr_text;
    use prost_types::field_descriptor_proto::{Label, Type};
    use prost_types::MessageOptions;

    fn map_entry(name: &str) -> DescriptorProto {
        DescriptorProto {
            name: Some(name.to_string()),
            field: vec![
                FieldDescriptorProto {
                    name: Some("key".to_string()),
                    number: Some(1),
                    label: Some(Label::Optional as i32),
                    r#type: Some(Type::String as i32),
                    ..Default::default()
                },
                FieldDescriptorProto {
                    name: Some("value".to_string()),
                    number: Some(2),
                    label: Some(Label::Optional as i32),
                    r#type: Some(Type::Int32 as i32),
                    ..Default::default()
                },
            ],
            options: Some(MessageOptions {
                map_entry: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn files() -> Vec<FileDescriptorProto> {
        vec![
            FileDescriptorProto {
                name: Some("common/types.proto".to_string()),
                package: Some("common".to_string()),
                message_type: vec![DescriptorProto {
                    name: Some("Money".to_string()),
                    ..Default::default()
                }],
                ..Default::default()
            },
            FileDescriptorProto {
                name: Some("shop/order.proto".to_string()),
                package: Some("shop.v1".to_string()),
                dependency: vec!["common/types.proto".to_string()],
                enum_type: vec![EnumDescriptorProto {
                    name: Some("Status".to_string()),
                    ..Default::default()
                }],
                message_type: vec![DescriptorProto {
                    name: Some("Order".to_string()),
                    nested_type: vec![
                        map_entry("LabelsEntry"),
                        DescriptorProto {
                            name: Some("Line".to_string()),
                            enum_type: vec![EnumDescriptorProto {
                                name: Some("Kind".to_string()),
                                ..Default::default()
                            }],
                            ..Default::default()
                        },
                    ],
                    ..Default::default()
                }],
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_populate_registers_nested_types() {
        let files = files();
        let table = SymbolTable::from_files(&files).unwrap();

        assert_eq!(table.owner_of(".common.Money"), Some("common/types.proto"));
        assert_eq!(table.owner_of(".shop.v1.Status"), Some("shop/order.proto"));
        assert_eq!(table.owner_of(".shop.v1.Order"), Some("shop/order.proto"));
        assert_eq!(table.owner_of(".shop.v1.Order.Line"), Some("shop/order.proto"));
        assert_eq!(table.owner_of(".shop.v1.Order.Line.Kind"), Some("shop/order.proto"));
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_map_entries_are_registered_separately() {
        let files = files();
        let table = SymbolTable::from_files(&files).unwrap();

        assert_eq!(table.owner_of(".shop.v1.Order.LabelsEntry"), None);
        let entry = table.map_entry_of(".shop.v1.Order.LabelsEntry").unwrap();
        assert_eq!(entry.key.name(), "key");
        assert_eq!(entry.value.name(), "value");
        assert!(table.map_entry_of(".shop.v1.Order.Line").is_none());

        let nested: Vec<_> = ordinary_nested_types(&files[1].message_type[0])
            .map(|m| m.name())
            .collect();
        assert_eq!(nested, vec!["Line"]);
    }

    #[test]
    fn test_file_without_package() {
        let file = FileDescriptorProto {
            name: Some("plain.proto".to_string()),
            message_type: vec![DescriptorProto {
                name: Some("Thing".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let table = SymbolTable::from_files(std::slice::from_ref(&file)).unwrap();
        assert_eq!(table.owner_of(".Thing"), Some("plain.proto"));

        let scope = FileScope::new(&table, &file);
        assert_eq!(scope.resolve_path(".Thing"), "Thing");
    }

    #[test]
    fn test_resolve_local_and_imported() {
        let files = files();
        let table = SymbolTable::from_files(&files).unwrap();
        let mut scope = FileScope::new(&table, &files[1]);
        scope.set_dependency_identifier("common/types.proto", "dependency_1");

        assert_eq!(
            scope.resolve_type(".shop.v1.Order.Line"),
            TypeNode::named("Order.Line")
        );
        assert_eq!(
            scope.resolve_type(".common.Money"),
            TypeNode::named("dependency_1.common.Money")
        );
        assert_eq!(
            expr_text(&scope.resolve_expr(".common.Money"), 0),
            "dependency_1.common.Money"
        );
        assert_eq!(
            scope.resolve_expr(".shop.v1.Status"),
            Expr::Ident("Status".to_string())
        );
    }

    #[test]
    fn test_unknown_or_unimported_types_resolve_locally() {
        let files = files();
        let table = SymbolTable::from_files(&files).unwrap();
        // no dependency identifiers registered
        let scope = FileScope::new(&table, &files[1]);

        assert_eq!(scope.resolve_path(".common.Money"), "common.Money");
        assert_eq!(scope.resolve_path(".shop.v1.Unknown"), "Unknown");
    }

    #[test]
    fn test_transitive_dependency_falls_back_to_package_path() {
        let mut files = files();
        files.push(FileDescriptorProto {
            name: Some("shop/invoice.proto".to_string()),
            package: Some("shop.v1".to_string()),
            // only the order file is imported, money comes in transitively
            dependency: vec!["shop/order.proto".to_string()],
            ..Default::default()
        });
        let table = SymbolTable::from_files(&files).unwrap();
        let mut scope = FileScope::new(&table, &files[2]);
        scope.set_dependency_identifier("shop/order.proto", "dependency_1");

        assert_eq!(
            scope.resolve_path(".shop.v1.Order"),
            "dependency_1.shop.v1.Order"
        );
        assert_eq!(scope.resolve_path(".common.Money"), "common.Money");
        assert_eq!(
            scope.resolve_type(".common.Money"),
            TypeNode::named("common.Money")
        );
    }

    #[test]
    fn test_clear() {
        let files = files();
        let mut table = SymbolTable::from_files(&files).unwrap();
        assert!(!table.is_empty());
        table.clear();
        assert!(table.is_empty());
        assert!(table.map_entry_of(".shop.v1.Order.LabelsEntry").is_none());
    }

    #[test]
    fn test_strip_package() {
        assert_eq!(strip_package(".a.b.Msg", "a.b"), "Msg");
        assert_eq!(strip_package(".a.bc.Msg", "a.b"), "a.bc.Msg");
        assert_eq!(strip_package(".Msg", ""), "Msg");
    }
}
