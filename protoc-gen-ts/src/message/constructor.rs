//! Message constructor

use crate::ast::{ClassMember, Expr, Param, Stmt, TypeNode, ident, num, string};
use crate::error::GeneratorError;
use crate::field::FieldKind;

use super::MessageContext;
use super::signature::message_signature;

/// `Array.isArray(data)`
fn is_array(data: Expr) -> Expr {
    ident("Array").method("isArray", vec![data])
}

/// `constructor(data?: any[] | {...})`
///
/// Initializes storage from a positional array, or from an empty one and
/// then copies the fields of a keyed record. Map fields always end up with
/// a `Map`, even when the record did not provide one.
pub(super) fn constructor(ctx: &MessageContext<'_, '_>) -> Result<ClassMember, GeneratorError> {
    let data = || ident("data");

    let repeated: Vec<Expr> = ctx
        .fields
        .iter()
        .filter(|f| f.is_repeated_storage())
        .map(|f| num(f.number()))
        .collect();
    let groups: Vec<Expr> = ctx
        .groups
        .iter()
        .map(|group| Expr::Array(group.iter().map(|n| num(n)).collect()))
        .collect();

    let initialize = ctx.pb_message().method(
        "initialize",
        vec![
            Expr::This,
            Expr::Conditional(
                Box::new(is_array(data())),
                Box::new(data()),
                Box::new(Expr::Array(vec![])),
            ),
            num(0),
            // extensions are not supported
            num(-1),
            Expr::Array(repeated),
            Expr::Array(groups),
        ],
    );

    let mut copies = Vec::with_capacity(ctx.fields.len());
    for field in &ctx.fields {
        let assign = Expr::This
            .prop(field.name())
            .assign(data().prop(field.name()))
            .stmt();
        if field.optional {
            let present = string(field.name())
                .binary("in", data())
                .binary("&&", data().prop(field.name()).binary("!==", ident("undefined")));
            copies.push(Stmt::when(present, vec![assign]));
        } else {
            copies.push(assign);
        }
    }

    let mut body = vec![
        Expr::Super.call(vec![]).stmt(),
        initialize.stmt(),
        Stmt::when(
            is_array(data())
                .not()
                .binary("&&", data().type_of().binary("==", string("object"))),
            copies,
        ),
    ];

    for field in &ctx.fields {
        if let FieldKind::Map(_) = field.kind {
            let target = || Expr::This.prop(field.name());
            body.push(Stmt::when(
                target().not(),
                vec![target().assign(ident("Map").construct(vec![])).stmt()],
            ));
        }
    }

    Ok(ClassMember::Constructor {
        params: vec![Param::optional(
            "data",
            TypeNode::Union(vec![TypeNode::named("any").array(), message_signature(ctx)?]),
        )],
        body,
    })
}
