use crate::{OperationType, QueryPart};
use std::collections::HashMap;

/// Outcome of a container mutation. Mutations against a sealed select field
/// list are rejected explicitly rather than silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    Rejected,
}

impl Mutation {
    pub fn applied(&self) -> bool {
        matches!(self, Mutation::Applied)
    }
}

/// Ordered, mutable collection of [`QueryPart`]s. A builder chain owns
/// exactly one container; the compiler consumes it in stored order. Insertion
/// helpers position parts relative to an operation type without ever
/// reordering what is already there.
#[derive(Debug, Default)]
pub struct PartsContainer {
    parts: Vec<QueryPart>,
    /// Entity name -> alias, filled in as FROM/JOIN parts declare aliases.
    aliases: HashMap<&'static str, &'static str>,
    /// Columns render qualified once a second entity enters the query.
    qualify: bool,
    /// Once an explicit projection type is chosen the select field list is
    /// sealed against further automatic mutation.
    sealed: bool,
}

impl PartsContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parts(&self) -> &[QueryPart] {
        &self.parts
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn unseal(&mut self) {
        self.sealed = false;
    }

    pub fn qualified(&self) -> bool {
        self.qualify
    }

    pub fn set_qualified(&mut self) {
        self.qualify = true;
    }

    pub fn aliases(&self) -> &HashMap<&'static str, &'static str> {
        &self.aliases
    }

    pub fn register_alias(&mut self, entity: &'static str, alias: &'static str) {
        if !alias.is_empty() {
            self.aliases.insert(entity, alias);
        }
    }

    /// Appends a part at the end.
    pub fn add(&mut self, part: QueryPart) {
        self.parts.push(part);
    }

    /// Inserts a part right before the first part tagged with `op`, or at
    /// the end when no such part exists.
    pub fn add_before(&mut self, op: OperationType, part: QueryPart) {
        let position = self
            .parts
            .iter()
            .position(|p| p.op == op)
            .unwrap_or(self.parts.len());
        self.parts.insert(position, part);
    }

    /// Inserts a part right after the last part tagged with `op`, or at the
    /// end when no such part exists.
    pub fn add_after(&mut self, op: OperationType, part: QueryPart) {
        let position = self
            .parts
            .iter()
            .rposition(|p| p.op == op)
            .map(|i| i + 1)
            .unwrap_or(self.parts.len());
        self.parts.insert(position, part);
    }

    /// Appends `part` as a child of the last part tagged with `op`. Children
    /// of a sealed select part reject the mutation.
    pub fn add_to_last(&mut self, op: OperationType, part: QueryPart) -> Mutation {
        if self.sealed && op == OperationType::Select {
            return Mutation::Rejected;
        }
        match self.parts.iter_mut().rev().find(|p| p.op == op) {
            Some(parent) => {
                parent.children.push(part);
                Mutation::Applied
            }
            None => Mutation::Rejected,
        }
    }

    /// Removes the first field child projecting `name` (matching the column
    /// name or its alias) from the last select part. Removing an absent
    /// field is a no-op.
    pub fn remove_field(&mut self, name: &str) -> Mutation {
        if self.sealed {
            return Mutation::Rejected;
        }
        let Some(select) = self
            .parts
            .iter_mut()
            .rev()
            .find(|p| p.op == OperationType::Select || p.op == OperationType::Insert)
        else {
            return Mutation::Rejected;
        };
        match select.children.iter().position(|c| c.matches_field(name)) {
            Some(i) => {
                select.children.remove(i);
                Mutation::Applied
            }
            None => Mutation::Rejected,
        }
    }

    /// Removes the value child matching `name` from the last VALUES part,
    /// keeping INSERT column and value lists aligned.
    pub fn remove_value(&mut self, name: &str) -> Mutation {
        let Some(values) = self
            .parts
            .iter_mut()
            .rev()
            .find(|p| p.op == OperationType::Values)
        else {
            return Mutation::Rejected;
        };
        match values.children.iter().position(|c| c.matches_field(name)) {
            Some(i) => {
                values.children.remove(i);
                Mutation::Applied
            }
            None => Mutation::Rejected,
        }
    }

    /// The aggregate part: the first entity-introducing part of the query,
    /// used to key interceptor dispatch.
    pub fn aggregate(&self) -> Option<&QueryPart> {
        self.parts.iter().find(|p| p.op.is_aggregate())
    }

    pub fn aggregate_mut(&mut self) -> Option<&mut QueryPart> {
        self.parts.iter_mut().find(|p| p.op.is_aggregate())
    }

    /// Mutable access to the last part with the given operation.
    pub fn last_mut(&mut self, op: OperationType) -> Option<&mut QueryPart> {
        self.parts.iter_mut().rev().find(|p| p.op == op)
    }

    /// The most recent grouping or ordering clause, the attach point for
    /// secondary ThenBy keys.
    pub fn last_ordering_mut(&mut self) -> Option<&mut QueryPart> {
        self.parts.iter_mut().rev().find(|p| p.op.is_ordering())
    }

    /// The dominant operation of this container, taken from the aggregate.
    pub fn operation(&self) -> OperationType {
        self.aggregate().map(|p| p.op).unwrap_or_default()
    }
}
