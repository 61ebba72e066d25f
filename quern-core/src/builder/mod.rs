mod delete;
mod insert;
mod select;
mod table;
mod update;

pub use delete::DeleteBuilder;
pub use insert::InsertBuilder;
pub use select::SelectBuilder;
pub use table::TableBuilder;
pub use update::UpdateBuilder;

use crate::{BinaryOp, BinaryOpType, Entity, Error, Operand, OperationType, PartKind, QueryPart, Result, Value};

pub(crate) fn field_part(
    op: OperationType,
    column: &'static str,
    alias: &'static str,
    entity: &'static str,
) -> QueryPart {
    QueryPart::new(
        op,
        column,
        PartKind::Field {
            column,
            alias,
            entity,
        },
    )
}

/// Key equality predicates for an entity instance, one per key field, in
/// declaration order. Fails when the entity declares no key.
pub(crate) fn key_predicates<E: Entity>(entity: &E) -> Result<Vec<QueryPart>> {
    let values = entity.row();
    let mut parts = Vec::new();
    for (index, def) in E::fields().iter().enumerate() {
        if !def.key {
            continue;
        }
        let value = values.get(index).cloned().unwrap_or(Value::Null);
        let op = if parts.is_empty() {
            OperationType::Where
        } else {
            OperationType::And
        };
        parts.push(QueryPart::expression(
            op,
            BinaryOp {
                op: BinaryOpType::Equal,
                lhs: Operand::Column(def.column_ref),
                rhs: Operand::Variable(value),
            },
        ));
    }
    if parts.is_empty() {
        return Err(Error::MissingKey {
            entity: E::table_name().to_owned(),
        });
    }
    Ok(parts)
}
