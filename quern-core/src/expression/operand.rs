use crate::{ColumnRef, Expression, OpPrecedence, QueryCompiler, RenderContext, Value};

/// Leaf node of the expression AST.
#[derive(Debug)]
pub enum Operand {
    LitBool(bool),
    LitFloat(f64),
    LitInt(i128),
    LitStr(&'static str),
    /// A bare identifier rendered verbatim.
    LitIdent(&'static str),
    Null,
    /// A column reference, qualified at render time through the alias map.
    Column(ColumnRef),
    /// A value captured from the surrounding scope, embedded as a literal.
    Variable(Value),
    Asterisk,
}

impl OpPrecedence for Operand {
    fn precedence(&self, _compiler: &dyn QueryCompiler) -> i32 {
        1_000_000_000
    }
}

impl Expression for Operand {
    fn write_query(&self, compiler: &dyn QueryCompiler, ctx: &mut RenderContext, out: &mut String) {
        compiler.write_expression_operand(ctx, out, self);
    }
}

impl PartialEq for Operand {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::LitBool(l), Self::LitBool(r)) => l == r,
            (Self::LitFloat(l), Self::LitFloat(r)) => l == r,
            (Self::LitInt(l), Self::LitInt(r)) => l == r,
            (Self::LitStr(l), Self::LitStr(r)) => l == r,
            (Self::LitIdent(l), Self::LitIdent(r)) => l == r,
            (Self::Column(l), Self::Column(r)) => l == r,
            (Self::Variable(l), Self::Variable(r)) => l == r,
            (Self::Null, Self::Null) | (Self::Asterisk, Self::Asterisk) => true,
            _ => false,
        }
    }
}
