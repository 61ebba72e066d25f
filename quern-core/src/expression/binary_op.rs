use crate::{Expression, OpPrecedence, QueryCompiler, RenderContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOpType {
    Multiplication,
    Division,
    Remainder,
    Addition,
    Subtraction,
    Is,
    IsNot,
    Like,
    NotLike,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    And,
    Or,
}

impl OpPrecedence for BinaryOpType {
    fn precedence(&self, compiler: &dyn QueryCompiler) -> i32 {
        compiler.expression_binary_op_precedence(self)
    }
}

#[derive(Debug)]
pub struct BinaryOp<L: Expression, R: Expression> {
    pub op: BinaryOpType,
    pub lhs: L,
    pub rhs: R,
}

impl<L: Expression, R: Expression> OpPrecedence for BinaryOp<L, R> {
    fn precedence(&self, compiler: &dyn QueryCompiler) -> i32 {
        compiler.expression_binary_op_precedence(&self.op)
    }
}

impl<L: Expression, R: Expression> Expression for BinaryOp<L, R> {
    fn write_query(&self, compiler: &dyn QueryCompiler, ctx: &mut RenderContext, out: &mut String) {
        compiler.write_expression_binary_op(
            ctx,
            out,
            &BinaryOp {
                op: self.op,
                lhs: &self.lhs as &dyn Expression,
                rhs: &self.rhs as &dyn Expression,
            },
        );
    }
}
