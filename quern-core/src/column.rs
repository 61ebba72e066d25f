use crate::{Expression, OpPrecedence, QueryCompiler, RenderContext, Result, Value};

/// A value converter applied to the raw column value before the member
/// coercion runs. Failures are reported as
/// [`Error::InvalidConverter`](crate::Error::InvalidConverter) and never
/// swallowed.
pub type Converter = fn(Value) -> Result<Value>;

/// Reference to a table column, const-constructible so the derive macro can
/// expose one associated constant per entity field for use inside
/// [`expr!`](https://docs.rs/quern) predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnRef {
    pub name: &'static str,
    pub table: &'static str,
    pub schema: &'static str,
}

/// Metadata describing the mapping between a database column and a struct
/// member. Built once per entity type by the derive macro into a static
/// table and reused for every mapping operation; immutable after
/// construction.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Struct member name.
    pub member: &'static str,
    /// Column identity (column name may differ from the member name).
    pub column_ref: ColumnRef,
    /// Prototype value describing the column's native type.
    pub value: Value,
    /// Whether NULL is a legal payload for the member.
    pub nullable: bool,
    /// Whether the field participates in the entity key.
    pub key: bool,
    /// Optional user converter, run on the raw column value.
    pub converter: Option<Converter>,
}

impl FieldDef {
    pub fn name(&self) -> &'static str {
        self.column_ref.name
    }
    pub fn table(&self) -> &'static str {
        self.column_ref.table
    }
}

impl OpPrecedence for ColumnRef {
    fn precedence(&self, _compiler: &dyn QueryCompiler) -> i32 {
        1_000_000
    }
}

impl Expression for ColumnRef {
    fn write_query(&self, compiler: &dyn QueryCompiler, ctx: &mut RenderContext, out: &mut String) {
        compiler.write_column_ref(ctx, out, self);
    }
}

/// Lighter descriptor used for ad-hoc projections where no entity type
/// exists, keyed by result column name only.
#[derive(Debug, Clone)]
pub struct ObjectDef {
    pub name: String,
    pub converter: Option<Converter>,
}

impl ObjectDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            converter: None,
        }
    }
    pub fn with_converter(name: impl Into<String>, converter: Converter) -> Self {
        Self {
            name: name.into(),
            converter: Some(converter),
        }
    }
}
