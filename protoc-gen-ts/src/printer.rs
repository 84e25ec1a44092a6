//! TypeScript printer
//!
//! Renders a [`SourceFile`] declaration tree as TypeScript source text
//! with four-space indentation.

use crate::ast::{
    ArrowBody, Binding, CallSignature, ClassDecl, ClassMember, Decl, EnumDecl, Expr,
    IndexSignature, InterfaceDecl, Param, PropertyKey, SourceFile, Stmt, TypeLiteral, TypeNode,
};

const INDENT: &str = "    ";

/// Render a whole output file
pub fn print_file(file: &SourceFile) -> String {
    let mut printer = Printer::default();

    if !file.header.is_empty() {
        printer.out.push_str("/**\n");
        for line in &file.header {
            if line.is_empty() {
                printer.out.push_str(" *\n");
            } else {
                printer.out.push_str(&format!(" * {}\n", line));
            }
        }
        printer.out.push_str(" */\n");
    }

    for import in &file.imports {
        printer.out.push_str(&format!(
            "import * as {} from {};\n",
            import.ident,
            quote(&import.module)
        ));
    }

    for decl in &file.body {
        printer.decl(decl, 0);
    }

    printer.out
}

/// Render a single declaration at the top level
pub fn print_decl(decl: &Decl) -> String {
    let mut printer = Printer::default();
    printer.decl(decl, 0);
    printer.out
}

#[derive(Default)]
struct Printer {
    out: String,
}

impl Printer {
    fn line(&mut self, level: usize, text: &str) {
        for _ in 0..level {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn decl(&mut self, decl: &Decl, level: usize) {
        match decl {
            Decl::Enum(e) => self.enum_decl(e, level),
            Decl::Class(c) => self.class_decl(c, level),
            Decl::Interface(i) => self.interface_decl(i, level),
            Decl::Namespace { name, body } => {
                self.line(level, &format!("export namespace {} {{", name));
                for decl in body {
                    self.decl(decl, level + 1);
                }
                self.line(level, "}");
            }
        }
    }

    fn enum_decl(&mut self, decl: &EnumDecl, level: usize) {
        self.line(level, &format!("export enum {} {{", decl.name));
        let count = decl.members.len();
        for (i, (name, value)) in decl.members.iter().enumerate() {
            let separator = if i + 1 < count { "," } else { "" };
            self.line(level + 1, &format!("{} = {}{}", name, value, separator));
        }
        self.line(level, "}");
    }

    fn interface_decl(&mut self, decl: &InterfaceDecl, level: usize) {
        let type_params = if decl.type_params.is_empty() {
            String::new()
        } else {
            format!("<{}>", decl.type_params.join(", "))
        };
        self.line(
            level,
            &format!("export interface {}{} {{", decl.name, type_params),
        );
        for CallSignature { params, ret } in &decl.signatures {
            self.line(
                level + 1,
                &format!(
                    "({}): {};",
                    params_text(params, level + 1),
                    type_text(ret, level + 1)
                ),
            );
        }
        self.line(level, "}");
    }

    fn class_decl(&mut self, decl: &ClassDecl, level: usize) {
        let mut head = String::from("export ");
        if decl.is_abstract {
            head.push_str("abstract ");
        }
        head.push_str("class ");
        head.push_str(&decl.name);
        if let Some(base) = &decl.extends {
            head.push_str(" extends ");
            head.push_str(&expr_text(base, level));
        }
        head.push_str(" {");
        self.line(level, &head);
        for member in &decl.members {
            self.member(member, level + 1);
        }
        self.line(level, "}");
    }

    fn member(&mut self, member: &ClassMember, level: usize) {
        match member {
            ClassMember::Constructor { params, body } => {
                self.line(
                    level,
                    &format!("constructor({}) {{", params_text(params, level)),
                );
                self.stmts(body, level + 1);
                self.line(level, "}");
            }
            ClassMember::Getter { name, body } => {
                self.line(level, &format!("get {}() {{", name));
                self.stmts(body, level + 1);
                self.line(level, "}");
            }
            ClassMember::Setter { name, param, body } => {
                self.line(
                    level,
                    &format!("set {}({}) {{", name, param_text(param, level)),
                );
                self.stmts(body, level + 1);
                self.line(level, "}");
            }
            ClassMember::Method {
                name,
                is_static,
                is_abstract,
                params,
                ret,
                body,
            } => {
                let mut head = String::new();
                if *is_static {
                    head.push_str("static ");
                }
                if *is_abstract {
                    head.push_str("abstract ");
                }
                head.push_str(&format!("{}({})", name, params_text(params, level)));
                if let Some(ret) = ret {
                    head.push_str(&format!(": {}", type_text(ret, level)));
                }
                match body {
                    Some(body) => {
                        head.push_str(" {");
                        self.line(level, &head);
                        self.stmts(body, level + 1);
                        self.line(level, "}");
                    }
                    None => {
                        head.push(';');
                        self.line(level, &head);
                    }
                }
            }
            ClassMember::Property {
                name,
                is_static,
                ty,
                init,
            } => {
                let mut text = String::new();
                if *is_static {
                    text.push_str("static ");
                }
                text.push_str(name);
                if let Some(ty) = ty {
                    text.push_str(&format!(": {}", type_text(ty, level)));
                }
                if let Some(init) = init {
                    text.push_str(&format!(" = {}", expr_text(init, level)));
                }
                text.push(';');
                self.line(level, &text);
            }
            ClassMember::Index(index) => {
                self.line(level, &format!("{};", index_text(index, level)));
            }
        }
    }

    fn stmts(&mut self, stmts: &[Stmt], level: usize) {
        for stmt in stmts {
            self.stmt(stmt, level);
        }
    }

    fn stmt(&mut self, stmt: &Stmt, level: usize) {
        match stmt {
            Stmt::Expr(expr) => self.line(level, &format!("{};", expr_text(expr, level))),
            Stmt::Return(None) => self.line(level, "return;"),
            Stmt::Return(Some(expr)) => {
                self.line(level, &format!("return {};", expr_text(expr, level)))
            }
            Stmt::Const { binding, ty, init } => {
                let ty = ty
                    .as_ref()
                    .map(|ty| format!(": {}", type_text(ty, level)))
                    .unwrap_or_default();
                self.line(
                    level,
                    &format!(
                        "const {}{} = {};",
                        binding_text(binding),
                        ty,
                        expr_text(init, level)
                    ),
                );
            }
            Stmt::Let(name) => self.line(level, &format!("let {};", name)),
            Stmt::If {
                cond,
                then,
                otherwise,
            } => {
                self.line(level, &format!("if ({}) {{", expr_text(cond, level)));
                self.stmts(then, level + 1);
                match otherwise {
                    Some(otherwise) => {
                        self.line(level, "} else {");
                        self.stmts(otherwise, level + 1);
                        self.line(level, "}");
                    }
                    None => self.line(level, "}"),
                }
            }
            Stmt::ForOf {
                binding,
                iter,
                body,
            } => {
                self.line(
                    level,
                    &format!(
                        "for (const {} of {}) {{",
                        binding_text(binding),
                        expr_text(iter, level)
                    ),
                );
                self.stmts(body, level + 1);
                self.line(level, "}");
            }
            Stmt::While { cond, body } => {
                self.line(level, &format!("while ({}) {{", expr_text(cond, level)));
                self.stmts(body, level + 1);
                self.line(level, "}");
            }
            Stmt::Switch {
                discriminant,
                cases,
                default,
            } => {
                self.line(
                    level,
                    &format!("switch ({}) {{", expr_text(discriminant, level)),
                );
                for (label, body) in cases {
                    self.line(level + 1, &format!("case {}:", expr_text(label, level + 1)));
                    self.stmts(body, level + 2);
                }
                if let Some(body) = default {
                    self.line(level + 1, "default:");
                    self.stmts(body, level + 2);
                }
                self.line(level, "}");
            }
            Stmt::Break => self.line(level, "break;"),
        }
    }
}

/// Render statements as a `{ ... }` block whose closing brace sits at `level`
fn block_text(stmts: &[Stmt], level: usize) -> String {
    if stmts.is_empty() {
        return "{ }".to_string();
    }
    let mut printer = Printer::default();
    printer.stmts(stmts, level + 1);
    format!("{{\n{}{}}}", printer.out, INDENT.repeat(level))
}

fn binding_text(binding: &Binding) -> String {
    match binding {
        Binding::Name(name) => name.clone(),
        Binding::Array(names) => format!("[{}]", names.join(", ")),
    }
}

fn param_text(param: &Param, level: usize) -> String {
    let mut text = binding_text(&param.binding);
    if param.optional {
        text.push('?');
    }
    if let Some(ty) = &param.ty {
        text.push_str(": ");
        text.push_str(&type_text(ty, level));
    }
    text
}

fn params_text(params: &[Param], level: usize) -> String {
    params
        .iter()
        .map(|p| param_text(p, level))
        .collect::<Vec<_>>()
        .join(", ")
}

fn index_text(index: &IndexSignature, level: usize) -> String {
    format!(
        "[{}: {}]: {}",
        index.param,
        type_text(&index.key, level),
        type_text(&index.value, level)
    )
}

/// Render a type node; multi-line literals close at `level`
pub fn type_text(ty: &TypeNode, level: usize) -> String {
    match ty {
        TypeNode::Ref { name, args } if args.is_empty() => name.clone(),
        TypeNode::Ref { name, args } => format!(
            "{}<{}>",
            name,
            args.iter()
                .map(|a| type_text(a, level))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        TypeNode::Array(inner) => match inner.as_ref() {
            TypeNode::Union(_) | TypeNode::Intersection(_) => {
                format!("({})[]", type_text(inner, level))
            }
            _ => format!("{}[]", type_text(inner, level)),
        },
        TypeNode::Union(members) => members
            .iter()
            .map(|m| type_text(m, level))
            .collect::<Vec<_>>()
            .join(" | "),
        TypeNode::Intersection(members) => members
            .iter()
            .map(|m| match m {
                TypeNode::Union(_) => format!("({})", type_text(m, level)),
                _ => type_text(m, level),
            })
            .collect::<Vec<_>>()
            .join(" & "),
        TypeNode::Literal(literal) => literal_text(literal, level),
        TypeNode::StringLiteral(value) => quote(value),
        TypeNode::Query(path) => format!("typeof {}", path),
    }
}

fn literal_text(literal: &TypeLiteral, level: usize) -> String {
    if literal.properties.is_empty() && literal.index.is_none() {
        return "{}".to_string();
    }
    let inner = INDENT.repeat(level + 1);
    let mut text = String::from("{\n");
    for property in &literal.properties {
        text.push_str(&format!(
            "{}{}{}: {};\n",
            inner,
            property.name,
            if property.optional { "?" } else { "" },
            type_text(&property.ty, level + 1)
        ));
    }
    if let Some(index) = &literal.index {
        text.push_str(&format!("{}{};\n", inner, index_text(index, level + 1)));
    }
    text.push_str(&INDENT.repeat(level));
    text.push('}');
    text
}

fn binary_precedence(op: &str) -> u8 {
    match op {
        "=" => 1,
        "||" => 3,
        "&&" => 4,
        "==" | "!=" | "===" | "!==" => 8,
        "<" | ">" | "<=" | ">=" | "in" | "instanceof" => 9,
        "+" | "-" => 11,
        _ => 12,
    }
}

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Arrow { .. } => 0,
        Expr::Conditional(..) => 2,
        Expr::Binary(_, op, _) => binary_precedence(op),
        Expr::As(..) => 9,
        Expr::Unary(..) | Expr::TypeOf(_) => 14,
        _ => 17,
    }
}

/// Render `expr`, parenthesized when it binds looser than `min`
fn operand(expr: &Expr, min: u8, level: usize) -> String {
    let text = expr_text(expr, level);
    if precedence(expr) < min {
        format!("({})", text)
    } else {
        text
    }
}

fn args_text(args: &[Expr], level: usize) -> String {
    args.iter()
        .map(|a| expr_text(a, level))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render an expression; multi-line parts close at `level`
pub fn expr_text(expr: &Expr, level: usize) -> String {
    match expr {
        Expr::Ident(name) => name.clone(),
        Expr::This => "this".to_string(),
        Expr::Super => "super".to_string(),
        Expr::Null => "null".to_string(),
        Expr::Bool(value) => value.to_string(),
        Expr::Number(value) => value.clone(),
        Expr::Str(value) => quote(value),
        Expr::Prop(target, name) => format!("{}.{}", operand(target, 17, level), name),
        Expr::Index(target, index) => format!(
            "{}[{}]",
            operand(target, 17, level),
            expr_text(index, level)
        ),
        Expr::Call(callee, args) => format!(
            "{}({})",
            operand(callee, 17, level),
            args_text(args, level)
        ),
        Expr::New(callee, args) => format!(
            "new {}({})",
            operand(callee, 17, level),
            args_text(args, level)
        ),
        Expr::Array(items) => format!("[{}]", args_text(items, level)),
        Expr::Object {
            properties,
            multiline,
        } => object_text(properties, *multiline, level),
        Expr::Arrow { params, ret, body } => {
            let ret = ret
                .as_ref()
                .map(|ty| format!(": {}", type_text(ty, level)))
                .unwrap_or_default();
            let body = match body {
                ArrowBody::Expr(body) => match body.as_ref() {
                    Expr::Object { .. } => format!("({})", expr_text(body, level)),
                    _ => operand(body, 1, level),
                },
                ArrowBody::Block(stmts) => block_text(stmts, level),
            };
            format!("({}){} => {}", params_text(params, level), ret, body)
        }
        Expr::Binary(left, op, right) => {
            let prec = binary_precedence(op);
            // assignment is right-associative, everything else left-associative
            let (left_min, right_min) = if *op == "=" {
                (prec + 1, prec)
            } else {
                (prec, prec + 1)
            };
            format!(
                "{} {} {}",
                operand(left, left_min, level),
                op,
                operand(right, right_min, level)
            )
        }
        Expr::Unary(op, target) => format!("{}{}", op, operand(target, 14, level)),
        Expr::TypeOf(target) => format!("typeof {}", operand(target, 14, level)),
        Expr::As(target, ty) => format!("{} as {}", operand(target, 9, level), type_text(ty, level)),
        Expr::Conditional(cond, then, otherwise) => format!(
            "{} ? {} : {}",
            operand(cond, 3, level),
            operand(then, 1, level),
            operand(otherwise, 1, level)
        ),
    }
}

fn property_key_text(key: &PropertyKey) -> String {
    match key {
        PropertyKey::Number(n) => n.to_string(),
        PropertyKey::Name(name) if is_identifier(name) => name.clone(),
        PropertyKey::Name(name) => quote(name),
    }
}

fn object_text(properties: &[(PropertyKey, Expr)], multiline: bool, level: usize) -> String {
    if properties.is_empty() {
        return "{}".to_string();
    }
    if !multiline {
        let inner = properties
            .iter()
            .map(|(k, v)| format!("{}: {}", property_key_text(k), expr_text(v, level)))
            .collect::<Vec<_>>()
            .join(", ");
        return format!("{{ {} }}", inner);
    }
    let inner = INDENT.repeat(level + 1);
    let body = properties
        .iter()
        .map(|(k, v)| {
            format!(
                "{}{}: {}",
                inner,
                property_key_text(k),
                expr_text(v, level + 1)
            )
        })
        .collect::<Vec<_>>()
        .join(",\n");
    format!("{{\n{}\n{}}}", body, INDENT.repeat(level))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Double-quoted, escaped string literal
pub fn quote(value: &str) -> String {
    let mut text = String::with_capacity(value.len() + 2);
    text.push('"');
    for c in value.chars() {
        match c {
            '"' => text.push_str("\\\""),
            '\\' => text.push_str("\\\\"),
            '\n' => text.push_str("\\n"),
            '\r' => text.push_str("\\r"),
            '\t' => text.push_str("\\t"),
            c if (c as u32) < 0x20 => text.push_str(&format!("\\u{:04x}", c as u32)),
            c => text.push(c),
        }
    }
    text.push('"');
    text
}
