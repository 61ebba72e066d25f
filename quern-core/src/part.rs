use crate::{Expression, FieldDef, OperationType, Value};

/// The payload of a [`QueryPart`], one variant per fragment shape.
#[derive(Debug)]
pub enum PartKind {
    /// A table reference: the FROM/JOIN/INSERT/UPDATE/DELETE target.
    Entity {
        table: &'static str,
        alias: &'static str,
    },
    /// A projected column, optionally renamed and optionally qualified with
    /// an explicit source entity (for disambiguating joined columns).
    Field {
        column: &'static str,
        alias: &'static str,
        entity: &'static str,
    },
    /// A boolean or scalar expression (join predicates, filters, ordering
    /// keys).
    Expression(Box<dyn Expression>),
    /// A literal value (INSERT value lists, SET right-hand sides).
    Value(Value),
    /// A column declaration inside CREATE TABLE.
    ColumnDecl(&'static FieldDef),
    /// A foreign key declaration.
    ForeignKey {
        column: &'static str,
        references_table: &'static str,
        references_column: &'static str,
    },
    /// Pre-rendered text, used sparingly for fragments with no structure.
    Raw(String),
    /// No payload: the operation tag and children carry all information.
    Marker,
}

/// A self-describing fragment of a SQL statement: an operation tag, an
/// identity used for lookup and removal, a payload and optional children
/// (e.g. the field list under a SELECT part).
#[derive(Debug)]
pub struct QueryPart {
    pub op: OperationType,
    pub id: String,
    pub kind: PartKind,
    pub children: Vec<QueryPart>,
}

impl QueryPart {
    pub fn new(op: OperationType, id: impl Into<String>, kind: PartKind) -> Self {
        Self {
            op,
            id: id.into(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn marker(op: OperationType) -> Self {
        Self::new(op, "", PartKind::Marker)
    }

    pub fn entity(op: OperationType, table: &'static str, alias: &'static str) -> Self {
        Self::new(op, table, PartKind::Entity { table, alias })
    }

    pub fn field(column: &'static str, alias: &'static str, entity: &'static str) -> Self {
        Self::new(
            OperationType::Field,
            column,
            PartKind::Field {
                column,
                alias,
                entity,
            },
        )
    }

    pub fn expression(op: OperationType, expression: impl Expression + 'static) -> Self {
        Self::new(op, "", PartKind::Expression(Box::new(expression)))
    }

    pub fn value(id: impl Into<String>, value: Value) -> Self {
        Self::new(OperationType::Value, id, PartKind::Value(value))
    }

    pub fn with_children(mut self, children: Vec<QueryPart>) -> Self {
        self.children = children;
        self
    }

    /// The table name when this is an entity part.
    pub fn entity_name(&self) -> Option<&'static str> {
        match self.kind {
            PartKind::Entity { table, .. } => Some(table),
            _ => None,
        }
    }

    /// Whether this part projects the given column, either under its primary
    /// name or under its alias.
    pub fn matches_field(&self, name: &str) -> bool {
        match self.kind {
            PartKind::Field { column, alias, .. } => {
                column.eq_ignore_ascii_case(name)
                    || (!alias.is_empty() && alias.eq_ignore_ascii_case(name))
            }
            _ => self.id.eq_ignore_ascii_case(name),
        }
    }
}
