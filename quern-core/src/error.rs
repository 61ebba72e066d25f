use thiserror::Error;

/// Errors surfaced by compilation, execution and row mapping.
#[derive(Debug, Error)]
pub enum Error {
    /// A value could not be coerced into the requested member type.
    #[error("cannot convert {value} into {target}")]
    Conversion { value: String, target: &'static str },

    /// A user-supplied converter failed. Never swallowed by the mapper.
    #[error("converter failed for field `{field}`: {message}")]
    InvalidConverter { field: String, message: String },

    /// A declared field has no corresponding column in the result set and
    /// the settings demand failure.
    #[error("field `{field}` of `{entity}` is not present in the result set")]
    InvalidMap { field: String, entity: String },

    /// The underlying connection rejected the statement. Carries the SQL
    /// that was sent so callers can inspect what actually went down the wire.
    #[error("query execution failed: {message}\n{sql}")]
    Execution { sql: String, message: String },

    /// A mutation was attempted on a select part sealed by an explicit
    /// projection choice.
    #[error("the select field list is sealed and rejects further mutation")]
    Sealed,

    /// No key field could be inferred for an entity.
    #[error("no key field found on `{entity}`: flag one with #[quern(key)] or name it `id`")]
    MissingKey { entity: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn conversion(value: impl std::fmt::Debug, target: &'static str) -> Self {
        Error::Conversion {
            value: format!("{:?}", value),
            target,
        }
    }
}
