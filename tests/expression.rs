#[cfg(test)]
mod tests {
    use quern::{
        expr, BinaryOp, BinaryOpType, ColumnRef, Entity, Expression, GenericQueryCompiler,
        Operand, QuerySettings, RenderContext, UnaryOp, UnaryOpType, Value,
    };

    const COMPILER: GenericQueryCompiler = GenericQueryCompiler::new();

    #[derive(Entity, Clone, Debug, Default)]
    #[table_name("Orders")]
    struct Orders {
        #[quern(name = "OrdersID")]
        orders_id: i32,
        #[quern(name = "CustomersID")]
        customers_id: i32,
        #[quern(name = "ShipName")]
        ship_name: String,
        #[quern(name = "Freight")]
        freight: Option<f64>,
    }

    fn render(expression: &dyn Expression) -> String {
        render_with(expression, QuerySettings::default())
    }

    fn render_with(expression: &dyn Expression, settings: QuerySettings) -> String {
        let mut ctx = RenderContext::new(settings);
        let mut out = String::new();
        expression.write_query(&COMPILER, &mut ctx, &mut out);
        out
    }

    #[test]
    fn literals_and_arithmetic() {
        let e = expr!(1 + 2);
        assert!(matches!(
            e,
            BinaryOp {
                op: BinaryOpType::Addition,
                lhs: Operand::LitInt(1),
                rhs: Operand::LitInt(2),
            }
        ));
        assert_eq!(render(&e), "1 + 2");

        let e = expr!(5 * 1.5);
        assert!(matches!(
            e,
            BinaryOp {
                op: BinaryOpType::Multiplication,
                lhs: Operand::LitInt(5),
                rhs: Operand::LitFloat(1.5),
            }
        ));
        assert_eq!(render(&e), "5 * 1.5");

        let e = expr!((1 + 2) * 3);
        assert_eq!(render(&e), "(1 + 2) * 3");

        let e = expr!(-(1 + 2));
        assert!(matches!(
            e,
            UnaryOp {
                op: UnaryOpType::Negative,
                ..
            }
        ));
        assert_eq!(render(&e), "-(1 + 2)");
    }

    #[test]
    fn comparisons() {
        let e = expr!(Orders::customers_id == 1);
        assert!(matches!(
            e,
            BinaryOp {
                op: BinaryOpType::Equal,
                lhs: Operand::Column(ColumnRef {
                    name: "CustomersID",
                    table: "Orders",
                    ..
                }),
                rhs: Operand::LitInt(1),
            }
        ));
        assert_eq!(render(&e), "CustomersID = 1");

        let e = expr!(Orders::customers_id != 1);
        assert!(matches!(
            e,
            BinaryOp {
                op: BinaryOpType::NotEqual,
                ..
            }
        ));
        assert_eq!(render(&e), "CustomersID <> 1");

        let e = expr!(Orders::freight > 10.0 && Orders::customers_id <= 4);
        assert_eq!(render(&e), "Freight > 10.0 AND CustomersID <= 4");
    }

    #[test]
    fn null_comparison_renders_is_null() {
        let e = expr!(Orders::freight == None);
        assert!(matches!(
            e,
            BinaryOp {
                op: BinaryOpType::Is,
                rhs: Operand::Null,
                ..
            }
        ));
        assert_eq!(render(&e), "Freight IS NULL");

        let e = expr!(Orders::freight != None);
        assert_eq!(render(&e), "Freight IS NOT NULL");
    }

    #[test]
    fn evaluated_variables_embed_their_value() {
        let customer = 42;
        let e = expr!(Orders::customers_id == #customer);
        assert!(matches!(
            e,
            BinaryOp {
                rhs: Operand::Variable(Value::Int32(Some(42))),
                ..
            }
        ));
        assert_eq!(render(&e), "CustomersID = 42");

        let name = "O'Hare";
        let e = expr!(Orders::ship_name == #name);
        assert_eq!(render(&e), "ShipName = 'O''Hare'");
    }

    #[test]
    fn string_methods_become_like_patterns() {
        let e = expr!(Orders::ship_name.contains("speedy"));
        assert!(matches!(
            e,
            BinaryOp {
                op: BinaryOpType::Like,
                rhs: Operand::LitStr("%speedy%"),
                ..
            }
        ));
        assert_eq!(render(&e), "ShipName LIKE '%speedy%'");

        let e = expr!(Orders::ship_name.starts_with("Sp"));
        assert_eq!(render(&e), "ShipName LIKE 'Sp%'");

        let e = expr!(Orders::ship_name.ends_with("GmbH"));
        assert_eq!(render(&e), "ShipName LIKE '%GmbH'");

        let fragment = "eed";
        let e = expr!(Orders::ship_name.contains(#fragment));
        assert!(matches!(
            e,
            BinaryOp {
                op: BinaryOpType::Like,
                rhs: Operand::Variable(Value::Varchar(Some(..))),
                ..
            }
        ));
        assert_eq!(render(&e), "ShipName LIKE '%eed%'");
    }

    #[test]
    fn like_honors_case_folding_flag() {
        let e = expr!(Orders::ship_name.contains("speedy"));
        let settings = QuerySettings::default().strip_upper_in_like(true);
        assert_eq!(
            render_with(&e, settings),
            "UPPER(ShipName) LIKE UPPER('%speedy%')"
        );
    }

    #[test]
    fn qualified_columns_use_the_registered_alias() {
        let e = expr!(Orders::customers_id == 1);
        let mut ctx = RenderContext::new(QuerySettings::default());
        ctx.qualify = true;
        let mut out = String::new();
        e.write_query(&COMPILER, &mut ctx, &mut out);
        assert_eq!(out, "Orders.CustomersID = 1");

        let mut ctx = RenderContext::new(QuerySettings::default());
        ctx.qualify = true;
        ctx.aliases.insert("Orders", "o");
        let mut out = String::new();
        e.write_query(&COMPILER, &mut ctx, &mut out);
        assert_eq!(out, "o.CustomersID = 1");
    }

    #[test]
    fn boolean_precedence_parenthesizes_or_under_and() {
        let e = expr!((Orders::customers_id == 1 || Orders::customers_id == 2) && Orders::freight > 0.0);
        assert_eq!(
            render(&e),
            "(CustomersID = 1 OR CustomersID = 2) AND Freight > 0.0"
        );
    }
}
