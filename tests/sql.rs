#[cfg(test)]
mod tests {
    use indoc::indoc;
    use quern::{
        expr, DeleteBuilder, Entity, Error, GenericQueryCompiler, InsertBuilder, OperationType,
        QuerySettings, SelectBuilder, TableBuilder, UpdateBuilder,
    };

    const COMPILER: GenericQueryCompiler = GenericQueryCompiler::new();

    fn settings() -> QuerySettings {
        QuerySettings::default()
    }

    #[derive(Entity, Clone, Debug, Default)]
    #[table_name("Orders")]
    struct Orders {
        #[quern(name = "OrdersID")]
        orders_id: i32,
        #[quern(name = "CustomersID")]
        customers_id: i32,
        #[quern(name = "ShipName")]
        ship_name: String,
    }

    #[derive(Entity, Clone, Debug, Default)]
    #[table_name("OrderDetails")]
    struct OrderDetails {
        #[quern(name = "OrdersID")]
        orders_id: i32,
        #[quern(name = "ProductID")]
        product_id: i32,
        #[quern(name = "Quantity")]
        quantity: i32,
    }

    #[derive(Entity, Clone, Debug, Default)]
    #[table_name("Warrior")]
    struct Warrior {
        #[quern(name = "ID")]
        id: i32,
        #[quern(name = "Name")]
        name: String,
    }

    #[test]
    fn select_projects_the_full_field_list() {
        let sql = SelectBuilder::<Orders>::new().compile(&COMPILER, &settings());
        assert_eq!(
            sql,
            indoc! {"
                SELECT OrdersID, CustomersID, ShipName
                FROM Orders"
            }
        );
    }

    #[test]
    fn join_extends_and_qualifies_the_projection() {
        let sql = SelectBuilder::<Orders>::new()
            .join::<OrderDetails>(expr!(OrderDetails::orders_id == Orders::orders_id))
            .compile(&COMPILER, &settings());
        assert_eq!(
            sql,
            indoc! {"
                SELECT Orders.OrdersID, Orders.CustomersID, Orders.ShipName, OrderDetails.OrdersID, OrderDetails.ProductID, OrderDetails.Quantity
                FROM Orders
                JOIN OrderDetails ON (OrderDetails.OrdersID = Orders.OrdersID)"
            }
        );
    }

    #[test]
    fn clause_order_follows_the_chain() {
        let sql = SelectBuilder::<Orders>::new()
            .filter(expr!(Orders::customers_id == 7))
            .and(expr!(Orders::orders_id > 100))
            .or(expr!(Orders::ship_name == "Speedy Express"))
            .group_by("CustomersID")
            .order_by("OrdersID")
            .compile(&COMPILER, &settings());
        assert_eq!(
            sql,
            indoc! {"
                SELECT OrdersID, CustomersID, ShipName
                FROM Orders
                WHERE CustomersID = 7
                AND OrdersID > 100
                OR ShipName = 'Speedy Express'
                GROUP BY CustomersID
                ORDER BY OrdersID"
            }
        );
    }

    #[test]
    fn joins_stay_grouped_after_from() {
        let parts = SelectBuilder::<Orders>::new()
            .filter(expr!(Orders::customers_id == 7))
            .join::<OrderDetails>(expr!(OrderDetails::orders_id == Orders::orders_id))
            .into_parts();
        let ops: Vec<_> = parts.parts().iter().map(|p| p.op).collect();
        assert_eq!(
            ops,
            [
                OperationType::Select,
                OperationType::From,
                OperationType::Join,
                OperationType::Where,
            ]
        );
    }

    #[test]
    fn then_by_appends_to_the_latest_clause() {
        let sql = SelectBuilder::<Orders>::new()
            .group_by("CustomersID")
            .then_by("ShipName")
            .order_by("OrdersID")
            .then_by_desc("CustomersID")
            .compile(&COMPILER, &settings());
        assert_eq!(
            sql,
            indoc! {"
                SELECT OrdersID, CustomersID, ShipName
                FROM Orders
                GROUP BY CustomersID, ShipName
                ORDER BY OrdersID, CustomersID DESC"
            }
        );
    }

    #[test]
    fn compile_is_idempotent() {
        let builder = SelectBuilder::<Orders>::new()
            .filter(expr!(Orders::customers_id == 7))
            .order_by("OrdersID");
        let first = builder.compile(&COMPILER, &settings());
        let second = builder.compile(&COMPILER, &settings());
        assert_eq!(first, second);
    }

    #[test]
    fn ignore_removes_exactly_one_field_and_map_re_adds_it() {
        let sql = SelectBuilder::<Orders>::new()
            .ignore("ShipName")
            .compile(&COMPILER, &settings());
        assert!(sql.starts_with("SELECT OrdersID, CustomersID\n"));

        let sql = SelectBuilder::<Orders>::new()
            .ignore("ShipName")
            .map("ShipName")
            .compile(&COMPILER, &settings());
        assert!(sql.starts_with("SELECT OrdersID, CustomersID, ShipName\n"));

        // unknown field is a no-op, not an error
        let sql = SelectBuilder::<Orders>::new()
            .ignore("NoSuchField")
            .compile(&COMPILER, &settings());
        assert!(sql.starts_with("SELECT OrdersID, CustomersID, ShipName\n"));
    }

    #[test]
    fn map_as_renames_the_projected_column() {
        let sql = SelectBuilder::<Orders>::new()
            .ignore("ShipName")
            .map_as("ShipName", "Vessel")
            .compile(&COMPILER, &settings());
        assert!(sql.starts_with("SELECT OrdersID, CustomersID, ShipName AS Vessel\n"));
    }

    #[derive(Entity, Clone, Debug, Default)]
    #[table_name("Slim")]
    struct Slim {
        #[quern(name = "OrdersID")]
        orders_id: i32,
    }

    #[test]
    fn for_type_reshapes_and_seals_the_projection() {
        let builder = SelectBuilder::<Orders>::new().for_type::<Slim>();
        let sql = builder.compile(&COMPILER, &settings());
        assert!(sql.starts_with("SELECT OrdersID\n"));

        // sealed: neither map nor ignore mutates the field list
        let sql = SelectBuilder::<Orders>::new()
            .for_type::<Slim>()
            .ignore("OrdersID")
            .map("CustomersID")
            .compile(&COMPILER, &settings());
        assert!(sql.starts_with("SELECT OrdersID\n"));
    }

    #[test]
    fn strict_projection_methods_error_once_sealed() {
        let sealed = SelectBuilder::<Orders>::new().for_type::<Slim>();
        assert!(matches!(sealed.try_map("CustomersID"), Err(Error::Sealed)));

        let sealed = SelectBuilder::<Orders>::new().for_type::<Slim>();
        assert!(matches!(sealed.try_ignore("OrdersID"), Err(Error::Sealed)));

        // unsealed chains behave exactly like map/ignore
        let sql = SelectBuilder::<Orders>::new()
            .try_ignore("ShipName")
            .unwrap()
            .try_map("CustomersID")
            .unwrap()
            .compile(&COMPILER, &settings());
        assert!(sql.starts_with("SELECT OrdersID, CustomersID\n"));
    }

    #[test]
    fn delete_by_key_infers_the_id_field() {
        let warrior = Warrior {
            id: 1,
            ..Default::default()
        };
        let sql = DeleteBuilder::new()
            .by_key(&warrior)
            .unwrap()
            .compile(&COMPILER, &settings());
        assert_eq!(
            sql,
            indoc! {"
                DELETE FROM Warrior
                WHERE ID = 1"
            }
        );
    }

    #[test]
    fn update_sets_only_the_requested_fields() {
        let sql = UpdateBuilder::<Warrior>::new()
            .set("Name", "x")
            .filter(expr!(Warrior::id == 1))
            .compile(&COMPILER, &settings());
        assert_eq!(
            sql,
            indoc! {"
                UPDATE Warrior
                SET Name = 'x'
                WHERE ID = 1"
            }
        );
    }

    #[test]
    fn update_entity_excludes_the_key_from_assignments() {
        let warrior = Warrior {
            id: 3,
            name: "conan".into(),
        };
        let sql = UpdateBuilder::entity(&warrior)
            .unwrap()
            .compile(&COMPILER, &settings());
        assert_eq!(
            sql,
            indoc! {"
                UPDATE Warrior
                SET Name = 'conan'
                WHERE ID = 3"
            }
        );
    }

    #[test]
    fn insert_lists_columns_and_values_aligned() {
        let warrior = Warrior {
            id: 1,
            name: "conan".into(),
        };
        let sql = InsertBuilder::new(&warrior).compile(&COMPILER, &settings());
        assert_eq!(
            sql,
            indoc! {"
                INSERT INTO Warrior (ID, Name)
                VALUES (1, 'conan')"
            }
        );

        let sql = InsertBuilder::new(&warrior)
            .ignore("ID")
            .compile(&COMPILER, &settings());
        assert_eq!(
            sql,
            indoc! {"
                INSERT INTO Warrior (Name)
                VALUES ('conan')"
            }
        );
    }

    #[test]
    fn create_table_renders_columns_keys_and_constraints() {
        let sql = TableBuilder::<OrderDetails>::create()
            .foreign_key::<Orders>("OrdersID", "OrdersID")
            .compile(&COMPILER, &settings());
        assert_eq!(
            sql,
            indoc! {"
                CREATE TABLE OrderDetails (
                OrdersID INTEGER NOT NULL,
                ProductID INTEGER NOT NULL,
                Quantity INTEGER NOT NULL,
                FOREIGN KEY (OrdersID) REFERENCES Orders(OrdersID)
                )"
            }
        );

        let sql = TableBuilder::<Warrior>::create()
            .if_not_exists()
            .compile(&COMPILER, &settings());
        assert_eq!(
            sql,
            indoc! {"
                CREATE TABLE IF NOT EXISTS Warrior (
                ID INTEGER,
                Name VARCHAR NOT NULL,
                PRIMARY KEY (ID)
                )"
            }
        );
    }

    #[test]
    fn alter_table_chains_column_and_constraint_actions() {
        let sql = TableBuilder::<Orders>::alter()
            .add_column(&OrderDetails::fields()[2])
            .drop_column("ShipName")
            .compile(&COMPILER, &settings());
        assert_eq!(
            sql,
            indoc! {"
                ALTER TABLE Orders
                ADD COLUMN Quantity INTEGER NOT NULL
                DROP COLUMN ShipName"
            }
        );

        let sql = TableBuilder::<OrderDetails>::alter()
            .foreign_key::<Orders>("OrdersID", "OrdersID")
            .compile(&COMPILER, &settings());
        assert_eq!(
            sql,
            indoc! {"
                ALTER TABLE OrderDetails
                ADD FOREIGN KEY (OrdersID) REFERENCES Orders(OrdersID)"
            }
        );
    }

    #[test]
    fn explicit_keys_cover_entities_without_an_inferable_one() {
        let sql = TableBuilder::<OrderDetails>::create()
            .key("OrdersID")
            .key("ProductID")
            .compile(&COMPILER, &settings());
        assert_eq!(
            sql,
            indoc! {"
                CREATE TABLE OrderDetails (
                OrdersID INTEGER NOT NULL,
                ProductID INTEGER NOT NULL,
                Quantity INTEGER NOT NULL,
                PRIMARY KEY (OrdersID, ProductID)
                )"
            }
        );
    }

    #[test]
    fn drop_table_renders_if_exists() {
        let sql = TableBuilder::<Warrior>::drop().compile(&COMPILER, &settings());
        assert_eq!(sql, "DROP TABLE Warrior");

        let sql = TableBuilder::<Warrior>::drop()
            .if_exists()
            .compile(&COMPILER, &settings());
        assert_eq!(sql, "DROP TABLE IF EXISTS Warrior");
    }
}
