use crate::{
    CompiledQuery, Connection, DeleteBuilder, Entity, FromRow, InsertBuilder, PartsContainer,
    QueryCompiler, QueryKernel, Result, SelectBuilder, UpdateBuilder,
};
use std::collections::VecDeque;

const LOG_TARGET: &str = "quern::context";

/// A deferred unit of work queued on the context, executed at commit.
#[derive(Debug)]
pub struct QueryCommand {
    pub query: CompiledQuery,
}

impl QueryCommand {
    pub fn new(query: CompiledQuery) -> Self {
        Self { query }
    }
}

/// Orchestrates builders, the kernel and a deferred command store over one
/// connection.
///
/// Selects run immediately. Mutating operations are queued and flushed by
/// `commit` in strict FIFO order; each command leaves the queue only after
/// it executed successfully, so a failure keeps the failing command and
/// everything behind it queued. There is no transactional rollback.
pub struct DatabaseContext<C: Connection, Q: QueryCompiler> {
    connection: C,
    kernel: QueryKernel<Q>,
    store: VecDeque<QueryCommand>,
}

impl<C: Connection, Q: QueryCompiler> DatabaseContext<C, Q> {
    pub fn new(connection: C, kernel: QueryKernel<Q>) -> Self {
        Self {
            connection,
            kernel,
            store: VecDeque::new(),
        }
    }

    pub fn kernel(&self) -> &QueryKernel<Q> {
        &self.kernel
    }

    pub fn kernel_mut(&mut self) -> &mut QueryKernel<Q> {
        &mut self.kernel
    }

    /// Compiles and runs a select chain immediately, mapping the rows into
    /// the chain's projection type.
    pub fn select<E: Entity, P: FromRow + 'static>(
        &mut self,
        builder: SelectBuilder<E, P>,
    ) -> Result<Vec<P>> {
        let query = self.kernel.compile(builder.into_parts());
        self.kernel.select(&mut self.connection, &query)
    }

    /// Queues an INSERT for the whole entity instance.
    pub fn insert<E: Entity>(&mut self, entity: &E) {
        self.add_query(InsertBuilder::new(entity).into_parts());
    }

    /// Queues an UPDATE of all non-key fields, filtered by the entity key.
    pub fn update<E: Entity>(&mut self, entity: &E) -> Result<()> {
        self.add_query(UpdateBuilder::entity(entity)?.into_parts());
        Ok(())
    }

    /// Queues a DELETE filtered by the entity key.
    pub fn delete<E: Entity>(&mut self, entity: &E) -> Result<()> {
        self.add_query(DeleteBuilder::new().by_key(entity)?.into_parts());
        Ok(())
    }

    /// Compiles a parts container and appends it to the deferred store.
    pub fn add_query(&mut self, parts: PartsContainer) {
        let query = self.kernel.compile(parts);
        self.store.push_back(QueryCommand::new(query));
    }

    pub fn pending(&self) -> usize {
        self.store.len()
    }

    /// Flushes the deferred store in insertion order. Returns the total
    /// affected row count of the commands that ran.
    pub fn commit(&mut self) -> Result<u64> {
        log::debug!(
            target: LOG_TARGET,
            "Committing {} deferred command(s)",
            self.store.len()
        );
        let mut affected = 0;
        while let Some(command) = self.store.front() {
            affected += self.kernel.execute(&mut self.connection, &command.query)?;
            self.store.pop_front();
        }
        Ok(affected)
    }
}
