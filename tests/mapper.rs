#[cfg(test)]
mod tests {
    use quern::{
        Entity, EnumValue, Error, QuerySettings, RestrictiveMode, Result, RowLabeled, RowMapper,
        Value,
    };
    use rust_decimal::Decimal;
    use time::macros::{date, datetime};
    use uuid::Uuid;

    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    enum Rank {
        #[default]
        Recruit,
        Veteran,
    }

    impl EnumValue for Rank {
        fn index(&self) -> i64 {
            match self {
                Rank::Recruit => 0,
                Rank::Veteran => 1,
            }
        }
        fn name(&self) -> &'static str {
            match self {
                Rank::Recruit => "Recruit",
                Rank::Veteran => "Veteran",
            }
        }
        fn from_index(index: i64) -> Option<Self> {
            match index {
                0 => Some(Rank::Recruit),
                1 => Some(Rank::Veteran),
                _ => None,
            }
        }
        fn from_name(name: &str) -> Option<Self> {
            match name {
                "Recruit" => Some(Rank::Recruit),
                "Veteran" => Some(Rank::Veteran),
                _ => None,
            }
        }
    }

    fn double(value: Value) -> Result<Value> {
        match value {
            Value::Int32(Some(v)) => Ok(Value::Int32(Some(v * 2))),
            other => Ok(other),
        }
    }

    #[derive(Entity, Clone, Debug, Default, PartialEq)]
    #[table_name("Warrior")]
    struct Warrior {
        #[quern(name = "ID")]
        id: i32,
        #[quern(name = "Name")]
        name: String,
        #[quern(name = "Age")]
        age: Option<i32>,
        #[quern(name = "Rank")]
        rank: Rank,
        #[quern(name = "Strength", converter = double)]
        strength: i32,
    }

    fn row(labels: &[&str], values: Vec<Value>) -> RowLabeled {
        RowLabeled::new(
            labels
                .iter()
                .map(|l| l.to_string())
                .collect::<Vec<_>>()
                .into(),
            values.into_boxed_slice(),
        )
    }

    fn full_row() -> RowLabeled {
        row(
            &["ID", "Name", "Age", "Rank", "Strength"],
            vec![
                Value::Int32(Some(1)),
                Value::Varchar(Some("conan".into())),
                Value::Int32(Some(30)),
                Value::Int32(Some(1)),
                Value::Int32(Some(10)),
            ],
        )
    }

    #[test]
    fn maps_a_full_row_with_coercions() {
        let mut mapper = RowMapper::new(QuerySettings::default());
        let warrior: Warrior = mapper.map(&full_row()).unwrap();
        assert_eq!(
            warrior,
            Warrior {
                id: 1,
                name: "conan".into(),
                age: Some(30),
                rank: Rank::Veteran,
                strength: 20,
            }
        );
    }

    #[test]
    fn round_trips_through_row_and_back() {
        let original = Warrior {
            id: 7,
            name: "red sonja".into(),
            age: None,
            rank: Rank::Recruit,
            strength: 0,
        };
        let labels = Warrior::fields().iter().map(|f| f.name().to_string());
        let row = RowLabeled::new(
            labels.collect::<Vec<_>>().into(),
            original.row().into_boxed_slice(),
        );
        let mut mapper = RowMapper::new(QuerySettings::default());
        let back: Warrior = mapper.map(&row).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn null_yields_default_for_non_nullable_and_none_for_nullable() {
        let r = row(
            &["ID", "Name", "Age", "Rank", "Strength"],
            vec![
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
            ],
        );
        let mut mapper = RowMapper::new(QuerySettings::default());
        let warrior: Warrior = mapper.map(&r).unwrap();
        assert_eq!(warrior.id, 0);
        assert_eq!(warrior.name, "");
        assert_eq!(warrior.age, None);
        assert_eq!(warrior.rank, Rank::Recruit);
    }

    #[test]
    fn enum_coerces_from_name_as_well() {
        let r = row(
            &["Rank"],
            vec![Value::Varchar(Some("Veteran".into()))],
        );
        let mut mapper = RowMapper::new(QuerySettings::default());
        let warrior: Warrior = mapper.map(&r).unwrap();
        assert_eq!(warrior.rank, Rank::Veteran);
    }

    #[test]
    fn missing_columns_fail_only_in_restrictive_mode() {
        let r = row(&["ID"], vec![Value::Int32(Some(1))]);
        let mut lenient = RowMapper::new(QuerySettings::default());
        let warrior: Warrior = lenient.map(&r).unwrap();
        assert_eq!(warrior.id, 1);
        assert_eq!(warrior.name, "");

        let mut strict =
            RowMapper::new(QuerySettings::default().restrictive(RestrictiveMode::Fail));
        let result: Result<Warrior> = strict.map(&r);
        assert!(matches!(result, Err(Error::InvalidMap { .. })));
    }

    #[derive(Entity, Clone, Debug, Default, PartialEq)]
    #[table_name("Shipments")]
    struct Shipment {
        #[quern(name = "ID")]
        id: Uuid,
        #[quern(name = "ShippedOn")]
        shipped_on: Option<time::Date>,
        #[quern(name = "RegisteredAt")]
        registered_at: Option<time::PrimitiveDateTime>,
        #[quern(name = "Weight")]
        weight: Decimal,
    }

    #[test]
    fn typed_columns_coerce_from_driver_strings() {
        let r = row(
            &["ID", "ShippedOn", "RegisteredAt", "Weight"],
            vec![
                Value::Varchar(Some("67e55044-10b1-426f-9247-bb680e5fe0c8".into())),
                Value::Varchar(Some("2016-05-04".into())),
                Value::Varchar(Some("2016-05-04T13:45:30".into())),
                Value::Varchar(Some("12.5".into())),
            ],
        );
        let mut mapper = RowMapper::new(QuerySettings::default());
        let shipment: Shipment = mapper.map(&r).unwrap();
        assert_eq!(
            shipment.id,
            Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap()
        );
        assert_eq!(shipment.shipped_on, Some(date!(2016 - 05 - 04)));
        assert_eq!(shipment.registered_at, Some(datetime!(2016-05-04 13:45:30)));
        assert_eq!(shipment.weight, Decimal::new(125, 1));
    }

    #[test]
    fn tuples_project_positionally() {
        let r = row(
            &["anything", "goes"],
            vec![Value::Int32(Some(5)), Value::Varchar(Some("five".into()))],
        );
        let mut mapper = RowMapper::new(QuerySettings::default());
        let (count, label): (i64, String) = mapper.map(&r).unwrap();
        assert_eq!(count, 5);
        assert_eq!(label, "five");
    }
}
