use super::key_predicates;
use crate::{
    CompiledQuery, Entity, Expression, OperationType, PartsContainer, QueryCompiler, QueryPart,
    QuerySettings, Result,
};
use std::marker::PhantomData;

/// Fluent DELETE over entity `E`. Without a filter it deletes the whole
/// table, so most chains go through `filter` or `by_key`.
pub struct DeleteBuilder<E: Entity> {
    parts: PartsContainer,
    marker: PhantomData<E>,
}

impl<E: Entity> DeleteBuilder<E> {
    pub fn new() -> Self {
        let mut parts = PartsContainer::new();
        parts.add(QueryPart::entity(OperationType::Delete, E::table_name(), ""));
        Self {
            parts,
            marker: PhantomData,
        }
    }

    pub fn filter(mut self, predicate: impl Expression + 'static) -> Self {
        self.parts
            .add(QueryPart::expression(OperationType::Where, predicate));
        self
    }

    pub fn and(mut self, predicate: impl Expression + 'static) -> Self {
        self.parts
            .add(QueryPart::expression(OperationType::And, predicate));
        self
    }

    /// Filters on the entity's inferred key fields.
    pub fn by_key(mut self, entity: &E) -> Result<Self> {
        for part in key_predicates(entity)? {
            self.parts.add(part);
        }
        Ok(self)
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

impl<E: Entity> Default for DeleteBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}
