use super::field_part;
use crate::{
    CompiledQuery, Entity, Error, Expression, FromRow, OperationType, PartsContainer,
    QueryCompiler, QueryPart, QuerySettings, Result, RowLabeled,
};
use std::marker::PhantomData;

/// Fluent SELECT chain rooted on entity `E`, projecting into `P`.
///
/// The builder exclusively owns its parts container: every method consumes
/// the builder and hands back a new one over the mutated parts, so two
/// chains can never alias the same query state.
pub struct SelectBuilder<E: Entity, P: FromRow = E> {
    parts: PartsContainer,
    marker: PhantomData<(E, P)>,
}

impl<E: Entity> SelectBuilder<E> {
    /// Starts a select over `E` with its full field list projected.
    pub fn new() -> Self {
        Self::aliased("")
    }

    /// Starts a select over `E` under a table alias. Columns are qualified
    /// with the alias from the start.
    pub fn aliased(alias: &'static str) -> Self {
        let mut parts = PartsContainer::new();
        let fields = E::fields()
            .iter()
            .map(|f| field_part(OperationType::Field, f.name(), "", f.table()))
            .collect();
        parts.add(QueryPart::marker(OperationType::Select).with_children(fields));
        parts.add(QueryPart::entity(
            OperationType::From,
            E::table_name(),
            alias,
        ));
        if !alias.is_empty() {
            parts.register_alias(E::table_name(), alias);
            parts.set_qualified();
        }
        Self {
            parts,
            marker: PhantomData,
        }
    }
}

impl<E: Entity> Default for SelectBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity, P: FromRow> SelectBuilder<E, P> {
    /// Joins `J`, extending the projection with its fields and switching the
    /// whole query to qualified column references.
    pub fn join<J: Entity>(self, on: impl Expression + 'static) -> Self {
        self.join_aliased::<J>("", on)
    }

    /// Join under an alias, for self-joins and repeated entities. The alias
    /// replaces the entity name wherever its columns are qualified.
    pub fn join_aliased<J: Entity>(mut self, alias: &'static str, on: impl Expression + 'static) -> Self {
        self.parts.set_qualified();
        if !alias.is_empty() {
            self.parts.register_alias(J::table_name(), alias);
        }
        for f in J::fields() {
            let _ = self.parts.add_to_last(
                OperationType::Select,
                field_part(OperationType::Field, f.name(), "", f.table()),
            );
        }
        let join = QueryPart::entity(OperationType::Join, J::table_name(), alias)
            .with_children(vec![QueryPart::expression(OperationType::None, on)]);
        // Joins stay grouped after FROM regardless of when the chain adds
        // filters in between.
        let anchor = if self.parts.last_mut(OperationType::Join).is_some() {
            OperationType::Join
        } else {
            OperationType::From
        };
        self.parts.add_after(anchor, join);
        self
    }

    /// Re-maps a projected column, replacing the automatic entry.
    pub fn map(self, column: &'static str) -> Self {
        self.map_as(column, "")
    }

    /// Re-maps a projected column under an output alias.
    pub fn map_as(self, column: &'static str, alias: &'static str) -> Self {
        self.map_from::<E>(column, alias)
    }

    /// Re-maps a column that belongs to a joined entity, qualifying it with
    /// that entity (or its alias) to break column-name ambiguity.
    pub fn map_from<S: Entity>(mut self, column: &'static str, alias: &'static str) -> Self {
        if self.parts.remove_field(column).applied() || !self.parts.is_sealed() {
            let _ = self.parts.add_to_last(
                OperationType::Select,
                field_part(OperationType::Field, column, alias, S::table_name()),
            );
        }
        self
    }

    /// Drops a column from the projection. Unknown columns are a no-op.
    pub fn ignore(mut self, column: &str) -> Self {
        let _ = self.parts.remove_field(column);
        self
    }

    /// Strict variant of [`map`](Self::map): a projection sealed by
    /// [`for_type`](Self::for_type) is an error instead of a silent no-op.
    pub fn try_map(mut self, column: &'static str) -> Result<Self> {
        if !self.parts.remove_field(column).applied() && self.parts.is_sealed() {
            return Err(Error::Sealed);
        }
        let _ = self.parts.add_to_last(
            OperationType::Select,
            field_part(OperationType::Field, column, "", E::table_name()),
        );
        Ok(self)
    }

    /// Strict variant of [`ignore`](Self::ignore).
    pub fn try_ignore(mut self, column: &str) -> Result<Self> {
        if self.parts.is_sealed() {
            return Err(Error::Sealed);
        }
        let _ = self.parts.remove_field(column);
        Ok(self)
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

    pub fn or(mut self, predicate: impl Expression + 'static) -> Self {
        self.parts
            .add(QueryPart::expression(OperationType::Or, predicate));
        self
    }

    pub fn group_by(mut self, column: &'static str) -> Self {
        self.parts
            .add(field_part(OperationType::GroupBy, column, "", ""));
        self
    }

    pub fn order_by(mut self, column: &'static str) -> Self {
        self.parts
            .add(field_part(OperationType::OrderBy, column, "", ""));
        self
    }

    pub fn order_by_desc(mut self, column: &'static str) -> Self {
        self.parts
            .add(field_part(OperationType::OrderByDesc, column, "", ""));
        self
    }

    /// Appends a secondary key to the most recent GROUP BY or ORDER BY
    /// clause; without one it degenerates to `order_by`.
    pub fn then_by(self, column: &'static str) -> Self {
        self.then_by_part(column, OperationType::ThenBy)
    }

    pub fn then_by_desc(self, column: &'static str) -> Self {
        self.then_by_part(column, OperationType::ThenByDesc)
    }

    fn then_by_part(mut self, column: &'static str, op: OperationType) -> Self {
        let key = field_part(op, column, "", "");
        match self.parts.last_ordering_mut() {
            Some(parent) => parent.children.push(key),
            None => self.parts.add(field_part(OperationType::OrderBy, column, "", "")),
        }
        self
    }

    /// Keeps the projection but hands back raw labeled rows, read field by
    /// field through [`ObjectDef`](crate::ObjectDef) descriptors.
    pub fn as_rows(self) -> SelectBuilder<E, RowLabeled> {
        SelectBuilder {
            parts: self.parts,
            marker: PhantomData,
        }
    }

    /// Switches the projection to `T`, rebuilding the field list from `T`'s
    /// members and sealing it against further mutation.
    pub fn for_type<T: Entity>(mut self) -> SelectBuilder<E, T> {
        if let Some(select) = self.parts.last_mut(OperationType::Select) {
            select.children = T::fields()
                .iter()
                .map(|f| field_part(OperationType::Field, f.name(), "", ""))
                .collect();
        }
        self.parts.seal();
        SelectBuilder {
            parts: self.parts,
            marker: PhantomData,
        }
    }

    /// Renders the SQL without consuming the chain. Calling it twice on an
    /// unmodified chain yields identical text.
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
