use crate::{Error, Result, Value};
use rust_decimal::{
    prelude::{FromPrimitive, ToPrimitive},
    Decimal,
};
use std::any;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime, Time,
};
use uuid::Uuid;

/// Conversion between native Rust types and the dynamically typed [`Value`]
/// representation backing query literals and row decoding.
///
/// `try_from_value` is the deterministic coercion table used by the row
/// mapper: every implementation accepts its canonical variant plus the
/// alternate widths and string forms a driver may hand back, with range
/// checks before any narrowing.
pub trait AsValue {
    /// A NULL-like value of this type, used for type prototypes.
    fn as_empty_value() -> Value;
    /// Convert into the owned [`Value`] representation.
    fn as_value(self) -> Value;
    /// Attempt to convert a dynamic [`Value`] into `Self`.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.to_owned()))
    }
}

macro_rules! out_of_range {
    ($value:expr, $target:ty) => {
        Error::Conversion {
            value: format!("{} (out of range)", $value),
            target: any::type_name::<$target>(),
        }
    };
}

macro_rules! impl_integer {
    ($source:ty, $variant:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $variant(None)
            }
            fn as_value(self) -> Value {
                $variant(Some(self))
            }
            #[allow(unreachable_patterns)]
            fn try_from_value(value: Value) -> Result<Self> {
                let wide: i128 = match value {
                    $variant(Some(v)) => return Ok(v),
                    Value::Int8(Some(v)) => v as i128,
                    Value::Int16(Some(v)) => v as i128,
                    Value::Int32(Some(v)) => v as i128,
                    Value::Int64(Some(v)) => v as i128,
                    Value::Int128(Some(v)) => v,
                    Value::UInt8(Some(v)) => v as i128,
                    Value::UInt16(Some(v)) => v as i128,
                    Value::UInt32(Some(v)) => v as i128,
                    Value::UInt64(Some(v)) => v as i128,
                    Value::UInt128(Some(v)) => {
                        return <$source>::try_from(v).map_err(|_| out_of_range!(v, $source))
                    }
                    Value::Decimal(Some(v), ..) => {
                        if !v.is_integer() {
                            return Err(Error::conversion(v, any::type_name::<$source>()));
                        }
                        v.to_i128()
                            .ok_or_else(|| out_of_range!(v, $source))?
                    }
                    Value::Varchar(Some(ref v)) => v
                        .trim()
                        .parse::<i128>()
                        .map_err(|_| Error::conversion(v, any::type_name::<$source>()))?,
                    other => return Err(Error::conversion(other, any::type_name::<$source>())),
                };
                <$source>::try_from(wide).map_err(|_| out_of_range!(wide, $source))
            }
        }
    };
}

impl_integer!(i8, Value::Int8);
impl_integer!(i16, Value::Int16);
impl_integer!(i32, Value::Int32);
impl_integer!(i64, Value::Int64);
impl_integer!(i128, Value::Int128);
impl_integer!(u8, Value::UInt8);
impl_integer!(u16, Value::UInt16);
impl_integer!(u32, Value::UInt32);
impl_integer!(u64, Value::UInt64);
impl_integer!(u128, Value::UInt128);

macro_rules! impl_float {
    ($source:ty, $variant:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $variant(None)
            }
            fn as_value(self) -> Value {
                $variant(Some(self))
            }
            #[allow(unreachable_patterns)]
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $variant(Some(v)) => Ok(v),
                    Value::Float32(Some(v)) => Ok(v as $source),
                    Value::Float64(Some(v)) => Ok(v as $source),
                    Value::Int8(Some(v)) => Ok(v as $source),
                    Value::Int16(Some(v)) => Ok(v as $source),
                    Value::Int32(Some(v)) => Ok(v as $source),
                    Value::Int64(Some(v)) => Ok(v as $source),
                    Value::UInt8(Some(v)) => Ok(v as $source),
                    Value::UInt16(Some(v)) => Ok(v as $source),
                    Value::UInt32(Some(v)) => Ok(v as $source),
                    Value::UInt64(Some(v)) => Ok(v as $source),
                    Value::Decimal(Some(v), ..) => v
                        .to_f64()
                        .map(|v| v as $source)
                        .ok_or_else(|| Error::conversion(v, any::type_name::<$source>())),
                    Value::Varchar(Some(ref v)) => v
                        .trim()
                        .parse::<$source>()
                        .map_err(|_| Error::conversion(v, any::type_name::<$source>())),
                    other => Err(Error::conversion(other, any::type_name::<$source>())),
                }
            }
        }
    };
}

impl_float!(f32, Value::Float32);
impl_float!(f64, Value::Float64);

impl AsValue for bool {
    fn as_empty_value() -> Value {
        Value::Boolean(None)
    }
    fn as_value(self) -> Value {
        Value::Boolean(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Boolean(Some(v)) => Ok(v),
            Value::Int8(Some(v)) => Ok(v != 0),
            Value::Int16(Some(v)) => Ok(v != 0),
            Value::Int32(Some(v)) => Ok(v != 0),
            Value::Int64(Some(v)) => Ok(v != 0),
            Value::UInt8(Some(v)) => Ok(v != 0),
            Value::UInt16(Some(v)) => Ok(v != 0),
            Value::UInt32(Some(v)) => Ok(v != 0),
            Value::UInt64(Some(v)) => Ok(v != 0),
            Value::Varchar(Some(ref v)) => match v.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(Error::conversion(v, "bool")),
            },
            other => Err(Error::conversion(other, "bool")),
        }
    }
}

impl AsValue for String {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(Some(v)) => Ok(v),
            Value::Char(Some(v)) => Ok(v.to_string()),
            Value::Uuid(Some(v)) => Ok(v.to_string()),
            Value::Enum(Some((.., name))) => Ok(name.to_owned()),
            other => Err(Error::conversion(other, "String")),
        }
    }
}

impl AsValue for char {
    fn as_empty_value() -> Value {
        Value::Char(None)
    }
    fn as_value(self) -> Value {
        Value::Char(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Char(Some(v)) => Ok(v),
            Value::Varchar(Some(ref v)) if v.chars().count() == 1 => {
                Ok(v.chars().next().unwrap())
            }
            other => Err(Error::conversion(other, "char")),
        }
    }
}

impl AsValue for Decimal {
    fn as_empty_value() -> Value {
        Value::Decimal(None, 0, 0)
    }
    fn as_value(self) -> Value {
        Value::Decimal(Some(self), 0, 0)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Decimal(Some(v), ..) => Ok(v),
            Value::Int8(Some(v)) => Ok(v.into()),
            Value::Int16(Some(v)) => Ok(v.into()),
            Value::Int32(Some(v)) => Ok(v.into()),
            Value::Int64(Some(v)) => Ok(v.into()),
            Value::UInt8(Some(v)) => Ok(v.into()),
            Value::UInt16(Some(v)) => Ok(v.into()),
            Value::UInt32(Some(v)) => Ok(v.into()),
            Value::UInt64(Some(v)) => Ok(v.into()),
            Value::Float32(Some(v)) => {
                Decimal::from_f32(v).ok_or_else(|| Error::conversion(v, "Decimal"))
            }
            Value::Float64(Some(v)) => {
                Decimal::from_f64(v).ok_or_else(|| Error::conversion(v, "Decimal"))
            }
            Value::Varchar(Some(ref v)) => v
                .trim()
                .parse()
                .map_err(|_| Error::conversion(v, "Decimal")),
            other => Err(Error::conversion(other, "Decimal")),
        }
    }
}

impl AsValue for Vec<u8> {
    fn as_empty_value() -> Value {
        Value::Blob(None)
    }
    fn as_value(self) -> Value {
        Value::Blob(Some(self.into_boxed_slice()))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(Some(v)) => Ok(v.into_vec()),
            Value::Varchar(Some(v)) => Ok(v.into_bytes()),
            other => Err(Error::conversion(other, "Vec<u8>")),
        }
    }
}

impl AsValue for Date {
    fn as_empty_value() -> Value {
        Value::Date(None)
    }
    fn as_value(self) -> Value {
        Value::Date(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Date(Some(v)) => Ok(v),
            Value::Timestamp(Some(v)) => Ok(v.date()),
            Value::TimestampWithTimezone(Some(v)) => Ok(v.date()),
            Value::Varchar(Some(ref v)) => {
                Date::parse(v.trim(), format_description!("[year]-[month]-[day]"))
                    .map_err(|_| Error::conversion(v, "time::Date"))
            }
            other => Err(Error::conversion(other, "time::Date")),
        }
    }
}

impl AsValue for Time {
    fn as_empty_value() -> Value {
        Value::Time(None)
    }
    fn as_value(self) -> Value {
        Value::Time(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Time(Some(v)) => Ok(v),
            Value::Timestamp(Some(v)) => Ok(v.time()),
            Value::TimestampWithTimezone(Some(v)) => Ok(v.time()),
            Value::Varchar(Some(ref v)) => Time::parse(
                v.trim(),
                format_description!("[hour]:[minute]:[second][optional [.[subsecond]]]"),
            )
            .map_err(|_| Error::conversion(v, "time::Time")),
            other => Err(Error::conversion(other, "time::Time")),
        }
    }
}

impl AsValue for PrimitiveDateTime {
    fn as_empty_value() -> Value {
        Value::Timestamp(None)
    }
    fn as_value(self) -> Value {
        Value::Timestamp(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Timestamp(Some(v)) => Ok(v),
            Value::TimestampWithTimezone(Some(v)) => {
                Ok(PrimitiveDateTime::new(v.date(), v.time()))
            }
            Value::Date(Some(v)) => Ok(PrimitiveDateTime::new(v, Time::MIDNIGHT)),
            Value::Varchar(Some(ref v)) => PrimitiveDateTime::parse(
                v.trim(),
                format_description!(
                    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
                ),
            )
            .map_err(|_| Error::conversion(v, "time::PrimitiveDateTime")),
            other => Err(Error::conversion(other, "time::PrimitiveDateTime")),
        }
    }
}

impl AsValue for OffsetDateTime {
    fn as_empty_value() -> Value {
        Value::TimestampWithTimezone(None)
    }
    fn as_value(self) -> Value {
        Value::TimestampWithTimezone(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::TimestampWithTimezone(Some(v)) => Ok(v),
            Value::Timestamp(Some(v)) => Ok(v.assume_utc()),
            Value::Varchar(Some(ref v)) => OffsetDateTime::parse(v.trim(), &Rfc3339)
                .map_err(|_| Error::conversion(v, "time::OffsetDateTime")),
            other => Err(Error::conversion(other, "time::OffsetDateTime")),
        }
    }
}

/// Durations travel as a 64 bit nanosecond tick count.
impl AsValue for std::time::Duration {
    fn as_empty_value() -> Value {
        Value::Int64(None)
    }
    fn as_value(self) -> Value {
        Value::Int64(Some(self.as_nanos().min(i64::MAX as u128) as i64))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let nanos = i64::try_from_value(value)?;
        u64::try_from(nanos)
            .map(std::time::Duration::from_nanos)
            .map_err(|_| out_of_range!(nanos, std::time::Duration))
    }
}

impl AsValue for Uuid {
    fn as_empty_value() -> Value {
        Value::Uuid(None)
    }
    fn as_value(self) -> Value {
        Value::Uuid(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Uuid(Some(v)) => Ok(v),
            Value::Varchar(Some(ref v)) => {
                Uuid::parse_str(v.trim()).map_err(|_| Error::conversion(v, "uuid::Uuid"))
            }
            other => Err(Error::conversion(other, "uuid::Uuid")),
        }
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::try_from_value(value).map(Some)
        }
    }
}

/// Implemented by field enums so they can travel either as their integer
/// index or as their variant name, selected by
/// [`QuerySettings::enum_as_integer`](crate::QuerySettings::enum_as_integer).
pub trait EnumValue: Sized {
    fn index(&self) -> i64;
    fn name(&self) -> &'static str;
    fn from_index(index: i64) -> Option<Self>;
    fn from_name(name: &str) -> Option<Self>;
}

impl<T: EnumValue> AsValue for T {
    fn as_empty_value() -> Value {
        Value::Enum(None)
    }
    fn as_value(self) -> Value {
        Value::Enum(Some((self.index(), self.name())))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        let target = any::type_name::<T>();
        match value {
            Value::Enum(Some((index, name))) => T::from_index(index)
                .or_else(|| T::from_name(name))
                .ok_or_else(|| Error::conversion(name, target)),
            Value::Int8(Some(v)) => T::from_index(v as i64).ok_or(Error::conversion(v, target)),
            Value::Int16(Some(v)) => T::from_index(v as i64).ok_or(Error::conversion(v, target)),
            Value::Int32(Some(v)) => T::from_index(v as i64).ok_or(Error::conversion(v, target)),
            Value::Int64(Some(v)) => T::from_index(v).ok_or(Error::conversion(v, target)),
            Value::Varchar(Some(ref v)) => {
                let v = v.trim();
                T::from_name(v)
                    .or_else(|| v.parse::<i64>().ok().and_then(T::from_index))
                    .ok_or_else(|| Error::conversion(v, target))
            }
            other => Err(Error::conversion(other, target)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_widening_and_narrowing() {
        assert_eq!(i64::try_from_value(Value::Int8(Some(-3))).unwrap(), -3);
        assert_eq!(u8::try_from_value(Value::Int32(Some(200))).unwrap(), 200);
        assert!(u8::try_from_value(Value::Int32(Some(300))).is_err());
        assert!(i8::try_from_value(Value::Int64(Some(i64::MAX))).is_err());
        assert_eq!(
            i32::try_from_value(Value::Varchar(Some(" 42 ".into()))).unwrap(),
            42
        );
    }

    #[test]
    fn bool_from_int_or_string() {
        assert!(bool::try_from_value(Value::Int32(Some(1))).unwrap());
        assert!(!bool::try_from_value(Value::Int32(Some(0))).unwrap());
        assert!(bool::try_from_value(Value::Varchar(Some("True".into()))).unwrap());
        assert!(!bool::try_from_value(Value::Varchar(Some("0".into()))).unwrap());
        assert!(bool::try_from_value(Value::Varchar(Some("yes".into()))).is_err());
    }

    #[test]
    fn option_maps_null_to_none() {
        assert_eq!(
            Option::<i32>::try_from_value(Value::Int32(None)).unwrap(),
            None
        );
        assert_eq!(
            Option::<i32>::try_from_value(Value::Int32(Some(7))).unwrap(),
            Some(7)
        );
    }

    #[test]
    fn temporal_parsing() {
        let date = Date::try_from_value(Value::Varchar(Some("2016-05-04".into()))).unwrap();
        assert_eq!((date.year(), date.day()), (2016, 4));
        let ts = PrimitiveDateTime::try_from_value(Value::Varchar(Some(
            "2016-05-04T13:45:30".into(),
        )))
        .unwrap();
        assert_eq!(ts.hour(), 13);
        assert!(OffsetDateTime::try_from_value(Value::Varchar(Some("not a date".into()))).is_err());
    }

    #[test]
    fn duration_round_trips_through_ticks() {
        let d = std::time::Duration::from_millis(1500);
        let v = d.as_value();
        assert_eq!(v, Value::Int64(Some(1_500_000_000)));
        assert_eq!(std::time::Duration::try_from_value(v).unwrap(), d);
    }

    #[derive(Debug, PartialEq)]
    enum Stance {
        Aggressive,
        Defensive,
    }
    impl EnumValue for Stance {
        fn index(&self) -> i64 {
            match self {
                Stance::Aggressive => 0,
                Stance::Defensive => 1,
            }
        }
        fn name(&self) -> &'static str {
            match self {
                Stance::Aggressive => "Aggressive",
                Stance::Defensive => "Defensive",
            }
        }
        fn from_index(index: i64) -> Option<Self> {
            match index {
                0 => Some(Stance::Aggressive),
                1 => Some(Stance::Defensive),
                _ => None,
            }
        }
        fn from_name(name: &str) -> Option<Self> {
            match name {
                "Aggressive" => Some(Stance::Aggressive),
                "Defensive" => Some(Stance::Defensive),
                _ => None,
            }
        }
    }

    #[test]
    fn enum_from_int_or_string() {
        assert_eq!(
            Stance::try_from_value(Value::Int32(Some(1))).unwrap(),
            Stance::Defensive
        );
        assert_eq!(
            Stance::try_from_value(Value::Varchar(Some("Aggressive".into()))).unwrap(),
            Stance::Aggressive
        );
        assert_eq!(
            Stance::try_from_value(Value::Varchar(Some("0".into()))).unwrap(),
            Stance::Aggressive
        );
        assert!(Stance::try_from_value(Value::Varchar(Some("Sneaky".into()))).is_err());
    }
}
