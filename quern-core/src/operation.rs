use std::fmt::{self, Display, Formatter};

/// The clause kind a [`QueryPart`](crate::QueryPart) belongs to. The
/// compiler dispatches on this tag; parts always render in the order they
/// occupy inside their container, never reordered by operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OperationType {
    #[default]
    None,
    Select,
    From,
    Join,
    Where,
    And,
    Or,
    GroupBy,
    ThenBy,
    OrderBy,
    OrderByDesc,
    ThenByDesc,
    Insert,
    Values,
    Update,
    Set,
    Delete,
    Field,
    Column,
    Value,
    Create,
    Alter,
    Drop,
    TableKeys,
    ForeignKey,
}

impl OperationType {
    /// Operations that introduce the root entity of a query. The first part
    /// carrying one of these is the aggregate part used for interceptor
    /// dispatch.
    pub fn is_aggregate(&self) -> bool {
        matches!(
            self,
            OperationType::From
                | OperationType::Insert
                | OperationType::Update
                | OperationType::Delete
                | OperationType::Create
                | OperationType::Alter
                | OperationType::Drop
        )
    }

    /// Operations rendered as boolean filter clauses.
    pub fn is_filter(&self) -> bool {
        matches!(
            self,
            OperationType::Where | OperationType::And | OperationType::Or
        )
    }

    /// Operations that append ordering or grouping expressions to a
    /// previously emitted clause.
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            OperationType::GroupBy
                | OperationType::OrderBy
                | OperationType::OrderByDesc
                | OperationType::ThenBy
                | OperationType::ThenByDesc
        )
    }
}

impl Display for OperationType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
