use crate::Value;
use std::sync::Arc;

/// Column labels shared between all rows of one result set.
pub type RowNames = Arc<[String]>;
pub type Row = Box<[Value]>;

/// A result row together with its column labels.
#[derive(Clone, Debug, PartialEq)]
pub struct RowLabeled {
    pub labels: RowNames,
    pub values: Row,
}

impl RowLabeled {
    pub fn new(labels: RowNames, values: Row) -> Self {
        Self { labels, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Position of a label, matched exactly first and case-insensitively as
    /// a fallback.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels
            .iter()
            .position(|l| l == label)
            .or_else(|| self.labels.iter().position(|l| l.eq_ignore_ascii_case(label)))
    }

    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }
}

/// Outcome of a statement that does not produce rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RowsAffected {
    pub rows_affected: u64,
}

impl RowsAffected {
    pub fn new(rows_affected: u64) -> Self {
        Self { rows_affected }
    }
}
