use crate::{OpPrecedence, QueryCompiler, RenderContext, Value};
use std::fmt::Debug;

/// A renderable SQL expression node. The AST is closed: operands, unary and
/// binary operators. Instances are built either through the `expr!` macro or
/// directly from the node types.
pub trait Expression: OpPrecedence + Debug + Send + Sync {
    /// Serialize the expression into `out` using the compiler's quoting and
    /// precedence rules.
    fn write_query(&self, compiler: &dyn QueryCompiler, ctx: &mut RenderContext, out: &mut String);
}

impl<T: Expression> Expression for &T {
    fn write_query(&self, compiler: &dyn QueryCompiler, ctx: &mut RenderContext, out: &mut String) {
        (*self).write_query(compiler, ctx, out);
    }
}

impl Expression for &dyn Expression {
    fn write_query(&self, compiler: &dyn QueryCompiler, ctx: &mut RenderContext, out: &mut String) {
        (*self).write_query(compiler, ctx, out);
    }
}

impl Expression for Box<dyn Expression> {
    fn write_query(&self, compiler: &dyn QueryCompiler, ctx: &mut RenderContext, out: &mut String) {
        self.as_ref().write_query(compiler, ctx, out);
    }
}

impl Expression for () {
    fn write_query(
        &self,
        _compiler: &dyn QueryCompiler,
        _ctx: &mut RenderContext,
        _out: &mut String,
    ) {
    }
}

impl Expression for Value {
    fn write_query(&self, compiler: &dyn QueryCompiler, ctx: &mut RenderContext, out: &mut String) {
        compiler.write_value(ctx, out, self);
    }
}
