use crate::{
    AsValue, Error, FieldDef, FromRow, ObjectDef, QuerySettings, Result, RowLabeled, RowNames,
    Value,
};
use std::{collections::HashMap, sync::Arc};

const LOG_TARGET: &str = "quern::map";

/// Maps labeled rows into typed values using entity field descriptors.
///
/// Column positions are resolved once per result set and memoized; the cache
/// is keyed on the shared label slice and rebuilt when a row from a different
/// result set comes in. Unresolvable columns and failed coercions follow
/// [`QuerySettings::restrictive`]: logged and defaulted, or turned into
/// errors.
pub struct RowMapper {
    settings: QuerySettings,
    labels: Option<RowNames>,
    indices: HashMap<&'static str, Option<usize>>,
}

impl RowMapper {
    pub fn new(settings: QuerySettings) -> Self {
        Self {
            settings,
            labels: None,
            indices: HashMap::new(),
        }
    }

    pub fn map<T: FromRow>(&mut self, row: &RowLabeled) -> Result<T> {
        T::from_row(row, self)
    }

    /// Reads the column described by `def` out of `row`, runs its converter
    /// when one is set, and coerces the result. NULL maps to `T::default()`.
    pub fn read<T: AsValue + Default>(&mut self, row: &RowLabeled, def: &FieldDef) -> Result<T> {
        let Some(index) = self.index(row, def.name()) else {
            return self.unmapped(def.name(), def.table());
        };
        let value = row.value(index).cloned().unwrap_or(Value::Null);
        let value = match def.converter {
            Some(converter) => converter(value).map_err(|e| Error::InvalidConverter {
                field: def.name().to_owned(),
                message: e.to_string(),
            })?,
            None => value,
        };
        self.coerce(value, def.name(), def.table())
    }

    /// Reads an ad-hoc projection column described by `def`, resolved by
    /// result label alone with no entity metadata involved.
    pub fn read_named<T: AsValue + Default>(
        &mut self,
        row: &RowLabeled,
        def: &ObjectDef,
    ) -> Result<T> {
        let Some(index) = row.index_of(&def.name) else {
            return self.unmapped(&def.name, "");
        };
        let value = row.value(index).cloned().unwrap_or(Value::Null);
        let value = match def.converter {
            Some(converter) => converter(value).map_err(|e| Error::InvalidConverter {
                field: def.name.clone(),
                message: e.to_string(),
            })?,
            None => value,
        };
        self.coerce(value, &def.name, "")
    }

    /// Positional read for anonymous projections.
    pub fn read_at<T: AsValue + Default>(&mut self, row: &RowLabeled, index: usize) -> Result<T> {
        let Some(value) = row.value(index) else {
            return self.unmapped(&index.to_string(), "");
        };
        self.coerce(value.clone(), &index.to_string(), "")
    }

    fn coerce<T: AsValue + Default>(
        &self,
        value: Value,
        field: &str,
        entity: &str,
    ) -> Result<T> {
        if value.is_null() {
            return Ok(T::default());
        }
        match T::try_from_value(value) {
            Ok(v) => Ok(v),
            Err(e) if self.settings.restrictive.fails() => Err(e),
            Err(e) => {
                log::warn!(
                    target: LOG_TARGET,
                    "Field {:?} of {:?} left at its default, {}",
                    field,
                    entity,
                    e
                );
                Ok(T::default())
            }
        }
    }

    fn unmapped<T: Default>(&self, field: &str, entity: &str) -> Result<T> {
        if self.settings.restrictive.fails() {
            return Err(Error::InvalidMap {
                field: field.to_owned(),
                entity: entity.to_owned(),
            });
        }
        log::warn!(
            target: LOG_TARGET,
            "No column found for field {:?} of {:?}, left at its default",
            field,
            entity
        );
        Ok(T::default())
    }

    fn index(&mut self, row: &RowLabeled, name: &'static str) -> Option<usize> {
        let stale = self
            .labels
            .as_ref()
            .is_none_or(|l| !Arc::ptr_eq(l, &row.labels));
        if stale {
            self.labels = Some(row.labels.clone());
            self.indices.clear();
        }
        *self
            .indices
            .entry(name)
            .or_insert_with(|| row.index_of(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColumnRef, RestrictiveMode};
    use std::sync::Arc;

    fn row(labels: &[&str], values: Vec<Value>) -> RowLabeled {
        RowLabeled::new(
            labels.iter().map(|l| l.to_string()).collect::<Vec<_>>().into(),
            values.into_boxed_slice(),
        )
    }

    fn field(name: &'static str, prototype: Value) -> FieldDef {
        FieldDef {
            member: name,
            column_ref: ColumnRef {
                name,
                table: "things",
                schema: "",
            },
            value: prototype,
            nullable: false,
            key: false,
            converter: None,
        }
    }

    #[test]
    fn maps_tuple_positionally() {
        let mut mapper = RowMapper::new(QuerySettings::default());
        let row = row(
            &["a", "b"],
            vec![Value::Int32(Some(7)), Value::Varchar(Some("x".into()))],
        );
        let (a, b): (i32, String) = mapper.map(&row).unwrap();
        assert_eq!(a, 7);
        assert_eq!(b, "x");
    }

    #[test]
    fn null_maps_to_default() {
        let mut mapper = RowMapper::new(QuerySettings::default());
        let row = row(&["n"], vec![Value::Null]);
        let def = field("n", Value::Int32(None));
        assert_eq!(mapper.read::<i32>(&row, &def).unwrap(), 0);
        assert_eq!(mapper.read::<Option<i32>>(&row, &def).unwrap(), None);
    }

    #[test]
    fn label_match_falls_back_to_case_insensitive() {
        let mut mapper = RowMapper::new(QuerySettings::default());
        let row = row(&["UserName"], vec![Value::Varchar(Some("kim".into()))]);
        let def = field("username", Value::Varchar(None));
        assert_eq!(mapper.read::<String>(&row, &def).unwrap(), "kim");
    }

    #[test]
    fn missing_column_defaults_unless_restrictive() {
        let row = row(&["other"], vec![Value::Int32(Some(1))]);
        let def = field("gone", Value::Int32(None));
        let mut lenient = RowMapper::new(QuerySettings::default());
        assert_eq!(lenient.read::<i32>(&row, &def).unwrap(), 0);
        let mut strict =
            RowMapper::new(QuerySettings::default().restrictive(RestrictiveMode::Fail));
        assert!(matches!(
            strict.read::<i32>(&row, &def),
            Err(Error::InvalidMap { .. })
        ));
    }

    #[test]
    fn failed_coercion_respects_restrictive_mode() {
        let row = row(&["a"], vec![Value::Varchar(Some("not a number".into()))]);
        let def = field("a", Value::Int32(None));
        let mut lenient = RowMapper::new(QuerySettings::default());
        assert_eq!(lenient.read::<i32>(&row, &def).unwrap(), 0);
        let mut strict =
            RowMapper::new(QuerySettings::default().restrictive(RestrictiveMode::Fail));
        assert!(strict.read::<i32>(&row, &def).is_err());
    }

    #[test]
    fn converter_runs_before_coercion() {
        let mut mapper = RowMapper::new(QuerySettings::default());
        let row = row(&["a"], vec![Value::Varchar(Some("0xC".into()))]);
        let mut def = field("a", Value::Int32(None));
        def.converter = Some(|v| match v {
            Value::Varchar(Some(s)) => {
                let parsed = i32::from_str_radix(s.trim_start_matches("0x"), 16)
                    .map_err(|_| Error::conversion(s, "i32"))?;
                Ok(Value::Int32(Some(parsed)))
            }
            other => Ok(other),
        });
        assert_eq!(mapper.read::<i32>(&row, &def).unwrap(), 12);
    }

    #[test]
    fn named_reads_cover_ad_hoc_projections() {
        let mut mapper = RowMapper::new(QuerySettings::default());
        let row = row(
            &["total", "label"],
            vec![
                Value::Varchar(Some("0x10".into())),
                Value::Varchar(Some("august".into())),
            ],
        );
        let def = ObjectDef::with_converter("total", |v| match v {
            Value::Varchar(Some(s)) => {
                let parsed = i64::from_str_radix(s.trim_start_matches("0x"), 16)
                    .map_err(|_| Error::conversion(s, "i64"))?;
                Ok(Value::Int64(Some(parsed)))
            }
            other => Ok(other),
        });
        assert_eq!(mapper.read_named::<i64>(&row, &def).unwrap(), 16);
        let plain = ObjectDef::new("label");
        assert_eq!(mapper.read_named::<String>(&row, &plain).unwrap(), "august");
        let gone = ObjectDef::new("missing");
        assert_eq!(mapper.read_named::<i64>(&row, &gone).unwrap(), 0);
    }

    #[test]
    fn index_cache_rebuilds_for_new_result_set() {
        let mut mapper = RowMapper::new(QuerySettings::default());
        let def = field("a", Value::Int32(None));
        let first = row(&["a"], vec![Value::Int32(Some(1))]);
        assert_eq!(mapper.read::<i32>(&first, &def).unwrap(), 1);
        let second = row(&["pad", "a"], vec![Value::Null, Value::Int32(Some(2))]);
        assert_eq!(mapper.read::<i32>(&second, &def).unwrap(), 2);
        assert!(!Arc::ptr_eq(&first.labels, &second.labels));
    }
}
