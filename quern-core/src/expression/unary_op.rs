use crate::{Expression, OpPrecedence, QueryCompiler, RenderContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOpType {
    Negative,
    Not,
}

impl OpPrecedence for UnaryOpType {
    fn precedence(&self, compiler: &dyn QueryCompiler) -> i32 {
        compiler.expression_unary_op_precedence(self)
    }
}

#[derive(Debug)]
pub struct UnaryOp<V: Expression> {
    pub op: UnaryOpType,
    pub v: V,
}

impl<V: Expression> OpPrecedence for UnaryOp<V> {
    fn precedence(&self, compiler: &dyn QueryCompiler) -> i32 {
        compiler.expression_unary_op_precedence(&self.op)
    }
}

impl<V: Expression> Expression for UnaryOp<V> {
    fn write_query(&self, compiler: &dyn QueryCompiler, ctx: &mut RenderContext, out: &mut String) {
        compiler.write_expression_unary_op(
            ctx,
            out,
            &UnaryOp {
                op: self.op,
                v: &self.v as &dyn Expression,
            },
        );
    }
}
