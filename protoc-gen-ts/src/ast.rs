//! TypeScript declaration tree
//!
//! Synthesizers build these nodes; [`crate::printer`] turns them into
//! source text. The tree only covers the subset of TypeScript the
//! generated files use.

/// A type position node
#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    /// Named (possibly dotted) type reference with optional type arguments
    Ref {
        /// Type name, e.g. `number` or `dependency_1.pkg.Msg`
        name: String,
        /// Generic arguments
        args: Vec<TypeNode>,
    },
    /// `T[]`
    Array(Box<TypeNode>),
    /// `A | B`
    Union(Vec<TypeNode>),
    /// `A & B`
    Intersection(Vec<TypeNode>),
    /// `{ a?: T; [key: K]: V }`
    Literal(TypeLiteral),
    /// `"none"`
    StringLiteral(String),
    /// `typeof a.b.c`
    Query(String),
}

impl TypeNode {
    /// Plain named reference without type arguments
    pub fn named(name: impl Into<String>) -> Self {
        TypeNode::Ref {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Named reference with type arguments
    pub fn generic(name: impl Into<String>, args: Vec<TypeNode>) -> Self {
        TypeNode::Ref {
            name: name.into(),
            args,
        }
    }

    /// Wrap in an array type
    pub fn array(self) -> Self {
        TypeNode::Array(Box::new(self))
    }
}

/// Object type literal
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypeLiteral {
    /// Named members
    pub properties: Vec<PropertySignature>,
    /// Optional index signature
    pub index: Option<Box<IndexSignature>>,
}

/// `name?: type`
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySignature {
    /// Property name
    pub name: String,
    /// Rendered with `?`
    pub optional: bool,
    /// Property type
    pub ty: TypeNode,
}

/// `[param: key]: value`
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSignature {
    /// Name of the key parameter
    pub param: String,
    /// Key type
    pub key: TypeNode,
    /// Value type
    pub value: TypeNode,
}

/// Function or method parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Bound name or destructuring pattern
    pub binding: Binding,
    /// Rendered with `?`
    pub optional: bool,
    /// Type annotation, if any
    pub ty: Option<TypeNode>,
}

impl Param {
    /// Required typed parameter
    pub fn typed(name: &str, ty: TypeNode) -> Self {
        Param {
            binding: Binding::Name(name.to_string()),
            optional: false,
            ty: Some(ty),
        }
    }

    /// Optional typed parameter (`name?: ty`)
    pub fn optional(name: &str, ty: TypeNode) -> Self {
        Param {
            optional: true,
            ..Param::typed(name, ty)
        }
    }

    /// Untyped parameter
    pub fn untyped(name: &str) -> Self {
        Param {
            binding: Binding::Name(name.to_string()),
            optional: false,
            ty: None,
        }
    }

    /// `[a, b]` destructuring parameter
    pub fn pair(first: &str, second: &str) -> Self {
        Param {
            binding: Binding::Array(vec![first.to_string(), second.to_string()]),
            optional: false,
            ty: None,
        }
    }
}

/// Variable or parameter binding
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// `name`
    Name(String),
    /// `[a, b]`
    Array(Vec<String>),
}

/// Key of an object literal property
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    /// Identifier-like key
    Name(String),
    /// Numeric key
    Number(i64),
}

/// Body of an arrow function
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    /// `=> expr`
    Expr(Box<Expr>),
    /// `=> { ... }`
    Block(Vec<Stmt>),
}

/// Expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Identifier
    Ident(String),
    /// `this`
    This,
    /// `super`
    Super,
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Numeric literal, kept as written
    Number(String),
    /// String literal, escaped on output
    Str(String),
    /// `target.name`
    Prop(Box<Expr>, String),
    /// `target[index]`
    Index(Box<Expr>, Box<Expr>),
    /// `callee(args)`
    Call(Box<Expr>, Vec<Expr>),
    /// `new callee(args)`
    New(Box<Expr>, Vec<Expr>),
    /// `[a, b]`
    Array(Vec<Expr>),
    /// Object literal
    Object {
        /// Keys and values in insertion order
        properties: Vec<(PropertyKey, Expr)>,
        /// One property per line
        multiline: bool,
    },
    /// Arrow function
    Arrow {
        /// Parameters
        params: Vec<Param>,
        /// Return type annotation
        ret: Option<TypeNode>,
        /// Expression or block body
        body: ArrowBody,
    },
    /// `left op right`, including assignment
    Binary(Box<Expr>, &'static str, Box<Expr>),
    /// Prefix operator such as `!`
    Unary(&'static str, Box<Expr>),
    /// `typeof target`
    TypeOf(Box<Expr>),
    /// `target as T`
    As(Box<Expr>, TypeNode),
    /// `cond ? then : otherwise`
    Conditional(Box<Expr>, Box<Expr>, Box<Expr>),
}

/// Identifier expression
pub fn ident(name: &str) -> Expr {
    Expr::Ident(name.to_string())
}

/// Numeric literal from an integer
pub fn num(value: impl std::fmt::Display) -> Expr {
    Expr::Number(value.to_string())
}

/// String literal
pub fn string(value: &str) -> Expr {
    Expr::Str(value.to_string())
}

/// Arrow function with an expression body
pub fn arrow(params: Vec<Param>, body: Expr) -> Expr {
    Expr::Arrow {
        params,
        ret: None,
        body: ArrowBody::Expr(Box::new(body)),
    }
}

/// Arrow function with a block body
pub fn arrow_block(params: Vec<Param>, ret: Option<TypeNode>, body: Vec<Stmt>) -> Expr {
    Expr::Arrow {
        params,
        ret,
        body: ArrowBody::Block(body),
    }
}

impl Expr {
    /// `self.name`
    pub fn prop(self, name: &str) -> Expr {
        Expr::Prop(Box::new(self), name.to_string())
    }

    /// `self[index]`
    pub fn index(self, index: Expr) -> Expr {
        Expr::Index(Box::new(self), Box::new(index))
    }

    /// `self(args)`
    pub fn call(self, args: Vec<Expr>) -> Expr {
        Expr::Call(Box::new(self), args)
    }

    /// `self.method(args)`
    pub fn method(self, name: &str, args: Vec<Expr>) -> Expr {
        self.prop(name).call(args)
    }

    /// `new self(args)`
    pub fn construct(self, args: Vec<Expr>) -> Expr {
        Expr::New(Box::new(self), args)
    }

    /// `self op right`
    pub fn binary(self, op: &'static str, right: Expr) -> Expr {
        Expr::Binary(Box::new(self), op, Box::new(right))
    }

    /// `self = value`
    pub fn assign(self, value: Expr) -> Expr {
        self.binary("=", value)
    }

    /// `!self`
    pub fn not(self) -> Expr {
        Expr::Unary("!", Box::new(self))
    }

    /// `self as ty`
    pub fn cast(self, ty: TypeNode) -> Expr {
        Expr::As(Box::new(self), ty)
    }

    /// `typeof self`
    pub fn type_of(self) -> Expr {
        Expr::TypeOf(Box::new(self))
    }

    /// Wrap as an expression statement
    pub fn stmt(self) -> Stmt {
        Stmt::Expr(self)
    }
}

/// Statement node
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Expression statement
    Expr(Expr),
    /// `return;` or `return value;`
    Return(Option<Expr>),
    /// `const binding: ty = init;`
    Const {
        /// Bound name or pattern
        binding: Binding,
        /// Type annotation
        ty: Option<TypeNode>,
        /// Initializer
        init: Expr,
    },
    /// `let name;`
    Let(String),
    /// `if (cond) { ... } else { ... }`, always braced
    If {
        /// Condition
        cond: Expr,
        /// Statements run when the condition holds
        then: Vec<Stmt>,
        /// `else` branch
        otherwise: Option<Vec<Stmt>>,
    },
    /// `for (const binding of iter) { body }`
    ForOf {
        /// Loop variable binding
        binding: Binding,
        /// Iterated value
        iter: Expr,
        /// Loop body
        body: Vec<Stmt>,
    },
    /// `while (cond) { body }`
    While {
        /// Loop condition
        cond: Expr,
        /// Loop body
        body: Vec<Stmt>,
    },
    /// `switch` with `case` labels and an optional `default`
    Switch {
        /// Switched value
        discriminant: Expr,
        /// Case label and its statements
        cases: Vec<(Expr, Vec<Stmt>)>,
        /// `default:` statements
        default: Option<Vec<Stmt>>,
    },
    /// `break;`
    Break,
}

impl Stmt {
    /// `const name = init;`
    pub fn constant(name: &str, init: Expr) -> Stmt {
        Stmt::Const {
            binding: Binding::Name(name.to_string()),
            ty: None,
            init,
        }
    }

    /// `if (cond) { then }`
    pub fn when(cond: Expr, then: Vec<Stmt>) -> Stmt {
        Stmt::If {
            cond,
            then,
            otherwise: None,
        }
    }

    /// `return value;`
    pub fn ret(value: Expr) -> Stmt {
        Stmt::Return(Some(value))
    }
}

/// Member of a class declaration
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    /// `constructor(params) { body }`
    Constructor {
        /// Constructor parameters
        params: Vec<Param>,
        /// Constructor body
        body: Vec<Stmt>,
    },
    /// `get name() { body }`
    Getter {
        /// Property name
        name: String,
        /// Getter body
        body: Vec<Stmt>,
    },
    /// `set name(param) { body }`
    Setter {
        /// Property name
        name: String,
        /// The single setter parameter
        param: Param,
        /// Setter body
        body: Vec<Stmt>,
    },
    /// Method; a `None` body is an overload signature or an abstract method
    Method {
        /// Method name
        name: String,
        /// `static` modifier
        is_static: bool,
        /// `abstract` modifier
        is_abstract: bool,
        /// Parameters
        params: Vec<Param>,
        /// Return type annotation
        ret: Option<TypeNode>,
        /// Body, absent for signatures
        body: Option<Vec<Stmt>>,
    },
    /// Field declaration with an optional initializer
    Property {
        /// Property name
        name: String,
        /// `static` modifier
        is_static: bool,
        /// Type annotation
        ty: Option<TypeNode>,
        /// Initializer
        init: Option<Expr>,
    },
    /// `[param: K]: V;`
    Index(IndexSignature),
}

/// Class declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// Class name
    pub name: String,
    /// `abstract` modifier
    pub is_abstract: bool,
    /// Base class expression
    pub extends: Option<Expr>,
    /// Members in declaration order
    pub members: Vec<ClassMember>,
}

/// Enum declaration
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    /// Enum name
    pub name: String,
    /// Member names and their values
    pub members: Vec<(String, i32)>,
}

/// Interface made only of call signatures
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    /// Interface name
    pub name: String,
    /// Generic parameter names
    pub type_params: Vec<String>,
    /// Overloaded call signatures
    pub signatures: Vec<CallSignature>,
}

/// `(params): ret;`
#[derive(Debug, Clone, PartialEq)]
pub struct CallSignature {
    /// Parameters
    pub params: Vec<Param>,
    /// Return type
    pub ret: TypeNode,
}

/// Top-level or namespaced declaration; all declarations are exported
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    /// `export enum`
    Enum(EnumDecl),
    /// `export class`
    Class(ClassDecl),
    /// `export interface`
    Interface(InterfaceDecl),
    /// `export namespace name { body }`
    Namespace {
        /// Single namespace segment
        name: String,
        /// Nested declarations
        body: Vec<Decl>,
    },
}

impl Decl {
    /// Wrap declarations in nested namespaces named by a dotted path
    pub fn namespace(path: &str, body: Vec<Decl>) -> Decl {
        let mut segments = path.split('.').rev();
        let innermost = segments.next().unwrap_or(path);
        let mut decl = Decl::Namespace {
            name: innermost.to_string(),
            body,
        };
        for segment in segments {
            decl = Decl::Namespace {
                name: segment.to_string(),
                body: vec![decl],
            };
        }
        decl
    }

    /// Declared name
    pub fn name(&self) -> &str {
        match self {
            Decl::Enum(e) => &e.name,
            Decl::Class(c) => &c.name,
            Decl::Interface(i) => &i.name,
            Decl::Namespace { name, .. } => name,
        }
    }
}

/// `import * as ident from "module";`
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    /// Local namespace identifier
    pub ident: String,
    /// Module specifier
    pub module: String,
}

/// A complete output unit
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceFile {
    /// Lines of the leading doc comment
    pub header: Vec<String>,
    /// Namespace imports, in order
    pub imports: Vec<Import>,
    /// Top-level declarations
    pub body: Vec<Decl>,
}
