use super::field_part;
use crate::{
    CompiledQuery, Entity, OperationType, PartsContainer, QueryCompiler, QueryPart, QuerySettings,
    Value,
};
use std::marker::PhantomData;

/// Fluent INSERT over one entity instance. The column list and the VALUES
/// list stay aligned: dropping a field removes both entries.
pub struct InsertBuilder<E: Entity> {
    parts: PartsContainer,
    marker: PhantomData<E>,
}

impl<E: Entity> InsertBuilder<E> {
    pub fn new(entity: &E) -> Self {
        let mut parts = PartsContainer::new();
        let columns = E::fields()
            .iter()
            .map(|f| field_part(OperationType::Field, f.name(), "", ""))
            .collect();
        parts.add(
            QueryPart::entity(OperationType::Insert, E::table_name(), "").with_children(columns),
        );
        let values = E::fields()
            .iter()
            .zip(entity.row())
            .map(|(f, v)| QueryPart::value(f.name(), v))
            .collect();
        parts.add(QueryPart::marker(OperationType::Values).with_children(values));
        Self {
            parts,
            marker: PhantomData,
        }
    }

    /// Drops a field from both the column list and the VALUES list.
    pub fn ignore(mut self, column: &str) -> Self {
        let _ = self.parts.remove_field(column);
        let _ = self.parts.remove_value(column);
        self
    }

    /// Overrides the value inserted for one column.
    pub fn set(mut self, column: &str, value: impl Into<Value>) -> Self {
        if let Some(values) = self.parts.last_mut(OperationType::Values) {
            if let Some(slot) = values.children.iter_mut().find(|c| c.id == column) {
                *slot = QueryPart::value(slot.id.clone(), value.into());
            }
        }
        self
    }

    pub fn compile(&self, compiler: &dyn QueryCompiler, settings: &QuerySettings) -> String {
        compiler.compile(&self.parts, settings)
    }

    pub fn into_compiled(
        self,
        compiler: &dyn QueryCompiler,
        settings: &QuerySettings,
    ) -> CompiledQuery {
        CompiledQuery::new(compiler.compile(&self.parts, settings), self.parts)
    }

    pub fn parts(&self) -> &PartsContainer {
        &self.parts
    }

    pub fn into_parts(self) -> PartsContainer {
        self.parts
    }
}
