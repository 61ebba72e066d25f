use crate::{AsValue, FieldDef, Result, RowLabeled, RowMapper, TableRef, Value};

/// Constructs `Self` from a labeled result row. Derived for entity structs;
/// implemented for tuples as anonymous positional projections.
pub trait FromRow: Sized {
    fn from_row(row: &RowLabeled, mapper: &mut RowMapper) -> Result<Self>;
}

/// A struct bound to a table, with its field descriptors generated at derive
/// time.
pub trait Entity: FromRow {
    fn table_ref() -> &'static TableRef;

    fn table_name() -> &'static str {
        Self::table_ref().name
    }

    /// Field descriptors in declaration order.
    fn fields() -> &'static [FieldDef];

    fn key_fields() -> impl Iterator<Item = &'static FieldDef> {
        Self::fields().iter().filter(|f| f.key)
    }

    /// The instance's values, in the same order as [`Entity::fields`].
    fn row(&self) -> Vec<Value>;
}

/// Dictionary-style projection: the row comes back untyped and is read
/// field by field through [`ObjectDef`](crate::ObjectDef) descriptors.
impl FromRow for RowLabeled {
    fn from_row(row: &RowLabeled, _mapper: &mut RowMapper) -> Result<Self> {
        Ok(row.clone())
    }
}

macro_rules! impl_from_row_tuple {
    ($($t:ident: $i:tt),+) => {
        impl<$($t: AsValue + Default),+> FromRow for ($($t,)+) {
            fn from_row(row: &RowLabeled, mapper: &mut RowMapper) -> Result<Self> {
                Ok(($(mapper.read_at::<$t>(row, $i)?,)+))
            }
        }
    };
}

impl_from_row_tuple!(A: 0);
impl_from_row_tuple!(A: 0, B: 1);
impl_from_row_tuple!(A: 0, B: 1, C: 2);
impl_from_row_tuple!(A: 0, B: 1, C: 2, D: 3);
impl_from_row_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_from_row_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_from_row_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_from_row_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);
