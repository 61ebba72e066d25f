use crate::{Expression, QueryCompiler, Value};

/// Numeric precedence for expression nodes, letting the compiler insert
/// parentheses only where the rendered SQL needs them.
pub trait OpPrecedence {
    /// Lower numbers bind weaker; the compiler parenthesizes a child whose
    /// precedence does not exceed its operator's.
    fn precedence(&self, compiler: &dyn QueryCompiler) -> i32;
}

impl<T: OpPrecedence> OpPrecedence for &T {
    fn precedence(&self, compiler: &dyn QueryCompiler) -> i32 {
        (*self).precedence(compiler)
    }
}

impl OpPrecedence for &dyn Expression {
    fn precedence(&self, compiler: &dyn QueryCompiler) -> i32 {
        (*self).precedence(compiler)
    }
}

impl OpPrecedence for Box<dyn Expression> {
    fn precedence(&self, compiler: &dyn QueryCompiler) -> i32 {
        self.as_ref().precedence(compiler)
    }
}

impl OpPrecedence for () {
    fn precedence(&self, _compiler: &dyn QueryCompiler) -> i32 {
        1_000_000_000
    }
}

impl OpPrecedence for Value {
    fn precedence(&self, _compiler: &dyn QueryCompiler) -> i32 {
        1_000_000_000
    }
}
