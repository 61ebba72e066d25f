use crate::{RowLabeled, RowsAffected};

/// A blocking database connection. Drivers report their own failures through
/// `anyhow`; the kernel wraps them into [`crate::Error::Execution`] together
/// with the statement that failed.
pub trait Connection {
    /// Runs a statement expected to produce rows.
    fn fetch(&mut self, sql: &str) -> anyhow::Result<Vec<RowLabeled>>;

    /// Runs a statement expected to produce no rows.
    fn execute(&mut self, sql: &str) -> anyhow::Result<RowsAffected>;
}
