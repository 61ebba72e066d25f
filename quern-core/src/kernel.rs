use crate::{
    truncate_long, CompiledQuery, Connection, Error, FromRow, Interceptors, PartsContainer,
    QueryCompiler, QueryPart, QuerySettings, Result, RowMapper,
};

const LOG_TARGET: &str = "quern::query";

/// Runs queries end to end: interceptor hooks, compilation, the connection
/// round trip and row mapping. Owns the compiler and the settings so every
/// query it touches renders under one consistent configuration.
pub struct QueryKernel<C: QueryCompiler> {
    compiler: C,
    settings: QuerySettings,
    interceptors: Interceptors,
}

impl<C: QueryCompiler> QueryKernel<C> {
    pub fn new(compiler: C, settings: QuerySettings) -> Self {
        Self {
            compiler,
            settings,
            interceptors: Interceptors::new(),
        }
    }

    pub fn settings(&self) -> &QuerySettings {
        &self.settings
    }

    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    pub fn interceptors(&self) -> &Interceptors {
        &self.interceptors
    }

    pub fn interceptors_mut(&mut self) -> &mut Interceptors {
        &mut self.interceptors
    }

    /// Compiles a parts container into SQL, letting `before_compile` hooks
    /// registered for its entity mutate the parts first.
    pub fn compile(&self, mut parts: PartsContainer) -> CompiledQuery {
        let entity = parts
            .aggregate()
            .and_then(QueryPart::entity_name)
            .unwrap_or_default();
        self.interceptors.run_before_compile(entity, &mut parts);
        let sql = self.compiler.compile(&parts, &self.settings);
        CompiledQuery::new(sql, parts)
    }

    /// Runs a compiled select and maps each row. An `as_execute` hook for
    /// `T` replaces the connection round trip.
    pub fn select<T: FromRow + 'static>(
        &self,
        connection: &mut dyn Connection,
        query: &CompiledQuery,
    ) -> Result<Vec<T>> {
        self.interceptors.run_before_execute(query);
        if let Some(items) = self.interceptors.execution_override::<T>(query) {
            log::debug!(target: LOG_TARGET, "Execution replaced by interceptor, {}", truncate_long!(query.sql));
            return Ok(items);
        }
        log::info!(target: LOG_TARGET, "{}", truncate_long!(query.sql));
        let rows = connection.fetch(&query.sql).map_err(|e| {
            log::error!(target: LOG_TARGET, "Query failed: {}", e);
            log::debug!(target: LOG_TARGET, "{:#}, {}", e, truncate_long!(query.sql));
            Error::Execution {
                sql: query.sql.clone(),
                message: format!("{:#}", e),
            }
        })?;
        let mut mapper = RowMapper::new(self.settings);
        rows.iter().map(|row| mapper.map(row)).collect()
    }

    /// Runs a compiled statement that produces no rows.
    pub fn execute(&self, connection: &mut dyn Connection, query: &CompiledQuery) -> Result<u64> {
        self.interceptors.run_before_execute(query);
        log::info!(target: LOG_TARGET, "{}", truncate_long!(query.sql));
        let affected = connection.execute(&query.sql).map_err(|e| {
            log::error!(target: LOG_TARGET, "Statement failed: {}", e);
            log::debug!(target: LOG_TARGET, "{:#}, {}", e, truncate_long!(query.sql));
            Error::Execution {
                sql: query.sql.clone(),
                message: format!("{:#}", e),
            }
        })?;
        Ok(affected.rows_affected)
    }
}
