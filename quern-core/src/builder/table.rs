use super::field_part;
use crate::{
    CompiledQuery, Entity, FieldDef, OperationType, PartKind, PartsContainer, QueryCompiler,
    QueryPart, QuerySettings,
};
use std::marker::PhantomData;

/// DDL builder generating CREATE TABLE, ALTER TABLE and DROP TABLE
/// statements from an entity's field descriptors.
pub struct TableBuilder<E: Entity> {
    parts: PartsContainer,
    marker: PhantomData<E>,
}

impl<E: Entity> TableBuilder<E> {
    /// CREATE TABLE with one column per field and a PRIMARY KEY clause when
    /// the entity declares key fields.
    pub fn create() -> Self {
        let mut children: Vec<QueryPart> = E::fields()
            .iter()
            .map(|f| QueryPart::new(OperationType::Column, f.name(), PartKind::ColumnDecl(f)))
            .collect();
        let keys: Vec<QueryPart> = E::fields()
            .iter()
            .filter(|f| f.key)
            .map(|f| field_part(OperationType::Field, f.name(), "", ""))
            .collect();
        if !keys.is_empty() {
            children.push(QueryPart::marker(OperationType::TableKeys).with_children(keys));
        }
        let mut parts = PartsContainer::new();
        parts.add(
            QueryPart::entity(OperationType::Create, E::table_name(), "").with_children(children),
        );
        Self {
            parts,
            marker: PhantomData,
        }
    }

    /// ALTER TABLE collecting ADD COLUMN, DROP COLUMN and ADD FOREIGN KEY
    /// actions in the order they are chained.
    pub fn alter() -> Self {
        let mut parts = PartsContainer::new();
        parts.add(QueryPart::entity(OperationType::Alter, E::table_name(), ""));
        Self {
            parts,
            marker: PhantomData,
        }
    }

    pub fn drop() -> Self {
        let mut parts = PartsContainer::new();
        parts.add(QueryPart::entity(OperationType::Drop, E::table_name(), ""));
        Self {
            parts,
            marker: PhantomData,
        }
    }

    pub fn if_not_exists(mut self) -> Self {
        if let Some(create) = self.parts.last_mut(OperationType::Create) {
            create.id = "if_not_exists".into();
        }
        self
    }

    pub fn if_exists(mut self) -> Self {
        if let Some(drop) = self.parts.last_mut(OperationType::Drop) {
            drop.id = "if_exists".into();
        }
        self
    }

    /// Adds a column described by another entity's field descriptor to the
    /// ALTER statement.
    pub fn add_column(mut self, def: &'static FieldDef) -> Self {
        if let Some(alter) = self.parts.last_mut(OperationType::Alter) {
            alter.children.push(QueryPart::new(
                OperationType::Column,
                def.name(),
                PartKind::ColumnDecl(def),
            ));
        }
        self
    }

    pub fn drop_column(mut self, column: &'static str) -> Self {
        if let Some(alter) = self.parts.last_mut(OperationType::Alter) {
            alter
                .children
                .push(field_part(OperationType::Column, column, "", ""));
        }
        self
    }

    /// Overrides the keys derived from the entity, appending `column` to the
    /// PRIMARY KEY clause of the CREATE statement. Useful for entities whose
    /// key the derive could not infer.
    pub fn key(mut self, column: &'static str) -> Self {
        if let Some(create) = self.parts.last_mut(OperationType::Create) {
            let field = field_part(OperationType::Field, column, "", "");
            match create
                .children
                .iter_mut()
                .find(|c| c.op == OperationType::TableKeys)
            {
                Some(keys) => keys.children.push(field),
                None => create.children.push(
                    QueryPart::marker(OperationType::TableKeys).with_children(vec![field]),
                ),
            }
        }
        self
    }

    /// Adds a FOREIGN KEY constraint to the CREATE or ALTER statement.
    pub fn foreign_key<R: Entity>(
        mut self,
        column: &'static str,
        references_column: &'static str,
    ) -> Self {
        if let Some(root) = self.parts.aggregate_mut() {
            root.children.push(QueryPart::new(
                OperationType::ForeignKey,
                column,
                PartKind::ForeignKey {
                    column,
                    references_table: R::table_name(),
                    references_column,
                },
            ));
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
