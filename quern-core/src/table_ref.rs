/// Reference to a table, optionally schema qualified and aliased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableRef {
    pub name: &'static str,
    pub schema: &'static str,
    pub alias: &'static str,
}
