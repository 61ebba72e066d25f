/// Controls how the row mapper reacts to a declared field that is missing
/// from the result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestrictiveMode {
    /// Log the missing field and leave the member at its default value.
    #[default]
    Log,
    /// Log and fail the mapping with [`Error::InvalidMap`](crate::Error::InvalidMap).
    Fail,
}

impl RestrictiveMode {
    pub fn fails(&self) -> bool {
        matches!(self, RestrictiveMode::Fail)
    }
}

/// Rendering and mapping configuration, threaded explicitly through the
/// compiler and the kernel. There is no process-wide instance; two
/// compilations with different settings can run side by side.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuerySettings {
    /// Render enum values by their integer index instead of their name.
    pub enum_as_integer: bool,
    /// Wrap both operands of a LIKE comparison in UPPER() to get
    /// case-insensitive matching on dialects that fold case in LIKE.
    pub strip_upper_in_like: bool,
    /// Mapping strictness for missing result columns.
    pub restrictive: RestrictiveMode,
}

impl QuerySettings {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn enum_as_integer(mut self, value: bool) -> Self {
        self.enum_as_integer = value;
        self
    }
    pub fn strip_upper_in_like(mut self, value: bool) -> Self {
        self.strip_upper_in_like = value;
        self
    }
    pub fn restrictive(mut self, value: RestrictiveMode) -> Self {
        self.restrictive = value;
        self
    }
}
