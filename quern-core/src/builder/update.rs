use super::key_predicates;
use crate::{
    CompiledQuery, Entity, Expression, OperationType, PartsContainer, QueryCompiler, QueryPart,
    QuerySettings, Result, Value,
};
use std::marker::PhantomData;

/// Fluent UPDATE over entity `E`. Assignments come either from explicit
/// `set` calls or from a whole instance with its key fields held back for
/// the WHERE clause.
pub struct UpdateBuilder<E: Entity> {
    parts: PartsContainer,
    marker: PhantomData<E>,
}

impl<E: Entity> UpdateBuilder<E> {
    pub fn new() -> Self {
        let mut parts = PartsContainer::new();
        parts.add(QueryPart::entity(OperationType::Update, E::table_name(), ""));
        parts.add(QueryPart::marker(OperationType::Set));
        Self {
            parts,
            marker: PhantomData,
        }
    }

    /// Updates every non-key field from `entity`, filtered by its key.
    pub fn entity(entity: &E) -> Result<Self> {
        let mut builder = Self::new();
        for (def, value) in E::fields().iter().zip(entity.row()) {
            if !def.key {
                builder = builder.set(def.name(), value);
            }
        }
        builder.by_key(entity)
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        if let Some(set) = self.parts.last_mut(OperationType::Set) {
            set.children.push(QueryPart::value(column, value.into()));
        }
        self
    }

    /// Drops an assignment added earlier.
    pub fn ignore(mut self, column: &str) -> Self {
        if let Some(set) = self.parts.last_mut(OperationType::Set) {
            if let Some(at) = set.children.iter().position(|c| c.id == column) {
                set.children.remove(at);
            }
        }
        self
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

impl<E: Entity> Default for UpdateBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}
