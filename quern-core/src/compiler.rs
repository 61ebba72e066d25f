use crate::{
    possibly_parenthesized, separated_by, BinaryOp, BinaryOpType, ColumnRef, Expression, FieldDef,
    Operand, OperationType, PartKind, PartsContainer, QueryPart, QuerySettings, UnaryOp,
    UnaryOpType, Value,
};
use std::{
    collections::{HashMap, HashSet},
    fmt::Write,
};
use time::{Date, Time};

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
macro_rules! write_float {
    ($this:ident, $ctx:ident, $out:ident, $value:expr) => {{
        let mut buffer = ryu::Buffer::new();
        if $value.is_finite() {
            $out.push_str(buffer.format($value));
        } else {
            $this.write_value_string($out, buffer.format($value));
        }
    }};
}

/// Per-compilation rendering state. A fresh context is created for every
/// `compile` call, keeping compiler instances reusable across queries.
#[derive(Debug)]
pub struct RenderContext {
    pub settings: QuerySettings,
    /// Entity name -> alias, cloned from the container being compiled.
    pub aliases: HashMap<&'static str, &'static str>,
    /// Whether column references are qualified with their entity or alias.
    pub qualify: bool,
    /// Parts already rendered in this pass; shared sub-parts render once.
    compiled: HashSet<*const QueryPart>,
}

impl RenderContext {
    pub fn new(settings: QuerySettings) -> Self {
        Self {
            settings,
            aliases: HashMap::new(),
            qualify: false,
            compiled: HashSet::new(),
        }
    }

    pub fn for_container(settings: QuerySettings, container: &PartsContainer) -> Self {
        Self {
            settings,
            aliases: container.aliases().clone(),
            qualify: container.qualified(),
            compiled: HashSet::new(),
        }
    }

    /// Marks the part as rendered; returns false when it already was.
    fn enter(&mut self, part: &QueryPart) -> bool {
        self.compiled.insert(part as *const QueryPart)
    }

    /// The qualification prefix for an entity: its registered alias when it
    /// has one, the entity name otherwise.
    pub fn qualifier(&self, entity: &'static str) -> &'static str {
        self.aliases.get(entity).copied().unwrap_or(entity)
    }
}

/// The immutable product of compilation: the SQL text plus the container it
/// was rendered from, kept for interceptor hooks and inspection.
#[derive(Debug)]
pub struct CompiledQuery {
    pub sql: String,
    pub operation: OperationType,
    pub entity: String,
    pub parts: PartsContainer,
}

impl CompiledQuery {
    pub fn new(sql: String, parts: PartsContainer) -> Self {
        let operation = parts.operation();
        let entity = parts
            .aggregate()
            .and_then(QueryPart::entity_name)
            .unwrap_or_default()
            .to_owned();
        Self {
            sql,
            operation,
            entity,
            parts,
        }
    }
}

/// Renders a [`PartsContainer`] into SQL text, one rule per
/// [`OperationType`]. Every rule is a default method so dialects override
/// only what differs; [`GenericQueryCompiler`] takes the defaults wholesale.
pub trait QueryCompiler {
    fn as_dyn(&self) -> &dyn QueryCompiler;

    /// Walks the container's parts in stored order. Re-entrant: each call
    /// starts with a fresh rendered-parts set.
    fn compile(&self, container: &PartsContainer, settings: &QuerySettings) -> String {
        let mut ctx = RenderContext::for_container(*settings, container);
        let mut out = String::with_capacity(512);
        for part in container.parts() {
            self.write_part(&mut ctx, &mut out, part);
        }
        out
    }

    /// Dispatches one part to its operation rule, then its children.
    fn write_part(&self, ctx: &mut RenderContext, out: &mut String, part: &QueryPart) {
        if !ctx.enter(part) {
            return;
        }
        match part.op {
            OperationType::Select => self.write_select(ctx, out, part),
            OperationType::From => self.write_from(ctx, out, part),
            OperationType::Join => self.write_join(ctx, out, part),
            OperationType::Where => self.write_filter(ctx, out, part, "WHERE"),
            OperationType::And => self.write_filter(ctx, out, part, "AND"),
            OperationType::Or => self.write_filter(ctx, out, part, "OR"),
            OperationType::GroupBy => self.write_group_by(ctx, out, part),
            OperationType::OrderBy | OperationType::OrderByDesc => {
                self.write_order_by(ctx, out, part)
            }
            OperationType::Insert => self.write_insert(ctx, out, part),
            OperationType::Values => self.write_values(ctx, out, part),
            OperationType::Update => self.write_update(ctx, out, part),
            OperationType::Set => self.write_set(ctx, out, part),
            OperationType::Delete => self.write_delete(ctx, out, part),
            OperationType::Create => self.write_create_table(ctx, out, part),
            OperationType::Alter => self.write_alter_table(ctx, out, part),
            OperationType::Drop => self.write_drop_table(ctx, out, part),
            OperationType::Field => self.write_field(ctx, out, part),
            OperationType::TableKeys => self.write_table_keys(ctx, out, part),
            OperationType::ForeignKey => self.write_foreign_key(ctx, out, part),
            _ => match &part.kind {
                PartKind::Expression(e) => e.write_query(self.as_dyn(), ctx, out),
                PartKind::Value(v) => self.write_value(ctx, out, v),
                PartKind::Raw(s) => out.push_str(s),
                _ => {
                    for child in &part.children {
                        self.write_part(ctx, out, child);
                    }
                }
            },
        }
    }

    fn write_select(&self, ctx: &mut RenderContext, out: &mut String, part: &QueryPart) {
        out.push_str("SELECT ");
        if part.children.is_empty() {
            out.push('*');
            return;
        }
        separated_by(
            out,
            &part.children,
            |out, field| self.write_field(ctx, out, field),
            ", ",
        );
    }

    fn write_field(&self, ctx: &mut RenderContext, out: &mut String, part: &QueryPart) {
        match &part.kind {
            PartKind::Field {
                column,
                alias,
                entity,
            } => {
                if ctx.qualify && !entity.is_empty() {
                    out.push_str(ctx.qualifier(entity));
                    out.push('.');
                }
                out.push_str(column);
                if !alias.is_empty() {
                    out.push_str(" AS ");
                    out.push_str(alias);
                }
            }
            PartKind::Expression(e) => e.write_query(self.as_dyn(), ctx, out),
            _ => out.push_str(&part.id),
        }
    }

    fn write_entity(&self, ctx: &mut RenderContext, out: &mut String, part: &QueryPart) {
        if let PartKind::Entity { table, alias } = part.kind {
            out.push_str(table);
            if !alias.is_empty() {
                out.push(' ');
                out.push_str(alias);
            }
        } else {
            out.push_str(&part.id);
        }
        let _ = ctx;
    }

    fn write_from(&self, ctx: &mut RenderContext, out: &mut String, part: &QueryPart) {
        out.push_str("\nFROM ");
        self.write_entity(ctx, out, part);
    }

    fn write_join(&self, ctx: &mut RenderContext, out: &mut String, part: &QueryPart) {
        out.push_str("\nJOIN ");
        self.write_entity(ctx, out, part);
        if let Some(on) = part.children.first() {
            out.push_str(" ON (");
            self.write_part(ctx, out, on);
            out.push(')');
        }
    }

    fn write_filter(
        &self,
        ctx: &mut RenderContext,
        out: &mut String,
        part: &QueryPart,
        keyword: &str,
    ) {
        out.push('\n');
        out.push_str(keyword);
        out.push(' ');
        match &part.kind {
            PartKind::Expression(e) => e.write_query(self.as_dyn(), ctx, out),
            _ => {
                for child in &part.children {
                    self.write_part(ctx, out, child);
                }
            }
        }
    }

    fn write_group_by(&self, ctx: &mut RenderContext, out: &mut String, part: &QueryPart) {
        out.push_str("\nGROUP BY ");
        self.write_ordering_list(ctx, out, part);
    }

    fn write_order_by(&self, ctx: &mut RenderContext, out: &mut String, part: &QueryPart) {
        out.push_str("\nORDER BY ");
        self.write_ordering_list(ctx, out, part);
    }

    /// An ordering clause renders its own key first, then its ThenBy
    /// children in declaration order.
    fn write_ordering_list(&self, ctx: &mut RenderContext, out: &mut String, part: &QueryPart) {
        let mut write_key = |out: &mut String, p: &QueryPart, ctx: &mut RenderContext| {
            match &p.kind {
                PartKind::Field { .. } => self.write_field(ctx, out, p),
                PartKind::Expression(e) => e.write_query(self.as_dyn(), ctx, out),
                _ => out.push_str(&p.id),
            }
            if matches!(
                p.op,
                OperationType::OrderByDesc | OperationType::ThenByDesc
            ) {
                out.push_str(" DESC");
            }
        };
        write_key(out, part, ctx);
        for child in &part.children {
            out.push_str(", ");
            write_key(out, child, ctx);
        }
    }

    fn write_insert(&self, ctx: &mut RenderContext, out: &mut String, part: &QueryPart) {
        out.push_str("INSERT INTO ");
        self.write_entity(ctx, out, part);
        out.push_str(" (");
        separated_by(
            out,
            &part.children,
            |out, field| self.write_field(ctx, out, field),
            ", ",
        );
        out.push(')');
    }

    fn write_values(&self, ctx: &mut RenderContext, out: &mut String, part: &QueryPart) {
        out.push_str("\nVALUES (");
        separated_by(
            out,
            &part.children,
            |out, child| match &child.kind {
                PartKind::Value(v) => self.write_value(ctx, out, v),
                _ => self.write_part(ctx, out, child),
            },
            ", ",
        );
        out.push(')');
    }

    fn write_update(&self, ctx: &mut RenderContext, out: &mut String, part: &QueryPart) {
        out.push_str("UPDATE ");
        self.write_entity(ctx, out, part);
    }

    fn write_set(&self, ctx: &mut RenderContext, out: &mut String, part: &QueryPart) {
        out.push_str("\nSET ");
        separated_by(
            out,
            &part.children,
            |out, child| {
                out.push_str(&child.id);
                out.push_str(" = ");
                match &child.kind {
                    PartKind::Value(v) => self.write_value(ctx, out, v),
                    _ => self.write_part(ctx, out, child),
                }
            },
            ", ",
        );
    }

    fn write_delete(&self, ctx: &mut RenderContext, out: &mut String, part: &QueryPart) {
        out.push_str("DELETE FROM ");
        self.write_entity(ctx, out, part);
    }

    fn write_create_table(&self, ctx: &mut RenderContext, out: &mut String, part: &QueryPart) {
        out.push_str("CREATE TABLE ");
        // The builder flags IF NOT EXISTS through the part id.
        if part.id == "if_not_exists" {
            out.push_str("IF NOT EXISTS ");
        }
        self.write_entity(ctx, out, part);
        out.push_str(" (\n");
        // The separator runs between whatever children actually rendered, so
        // the last entry of the group never gets a trailing comma.
        separated_by(
            out,
            &part.children,
            |out, child| match &child.kind {
                PartKind::ColumnDecl(def) => self.write_column_decl(ctx, out, def),
                _ => self.write_part(ctx, out, child),
            },
            ",\n",
        );
        out.push_str("\n)");
    }

    fn write_alter_table(&self, ctx: &mut RenderContext, out: &mut String, part: &QueryPart) {
        out.push_str("ALTER TABLE ");
        self.write_entity(ctx, out, part);
        for child in &part.children {
            out.push('\n');
            match &child.kind {
                PartKind::ColumnDecl(def) => {
                    out.push_str("ADD COLUMN ");
                    self.write_column_decl(ctx, out, def);
                }
                PartKind::Field { column, .. } => {
                    out.push_str("DROP COLUMN ");
                    out.push_str(column);
                }
                PartKind::ForeignKey { .. } => {
                    out.push_str("ADD ");
                    self.write_foreign_key(ctx, out, child);
                }
                _ => self.write_part(ctx, out, child),
            }
        }
    }

    fn write_column_decl(&self, ctx: &mut RenderContext, out: &mut String, def: &FieldDef) {
        out.push_str(def.name());
        out.push(' ');
        self.write_column_type(out, &def.value);
        if !def.nullable && !def.key {
            out.push_str(" NOT NULL");
        }
        let _ = ctx;
    }

    fn write_table_keys(&self, ctx: &mut RenderContext, out: &mut String, part: &QueryPart) {
        out.push_str("PRIMARY KEY (");
        separated_by(
            out,
            &part.children,
            |out, field| self.write_field(ctx, out, field),
            ", ",
        );
        out.push(')');
    }

    fn write_foreign_key(&self, ctx: &mut RenderContext, out: &mut String, part: &QueryPart) {
        if let PartKind::ForeignKey {
            column,
            references_table,
            references_column,
        } = part.kind
        {
            out.push_str("FOREIGN KEY (");
            out.push_str(column);
            out.push_str(") REFERENCES ");
            out.push_str(references_table);
            out.push('(');
            out.push_str(references_column);
            out.push(')');
        }
        let _ = ctx;
    }

    fn write_drop_table(&self, ctx: &mut RenderContext, out: &mut String, part: &QueryPart) {
        out.push_str("DROP TABLE ");
        if part.id == "if_exists" {
            out.push_str("IF EXISTS ");
        }
        self.write_entity(ctx, out, part);
    }

    fn write_column_ref(&self, ctx: &mut RenderContext, out: &mut String, value: &ColumnRef) {
        if ctx.qualify && !value.table.is_empty() {
            out.push_str(ctx.qualifier(value.table));
            out.push('.');
        }
        out.push_str(value.name);
    }

    fn write_column_type(&self, out: &mut String, value: &Value) {
        out.push_str(match value {
            Value::Boolean(..) => "BOOLEAN",
            Value::Int8(..) => "TINYINT",
            Value::Int16(..) => "SMALLINT",
            Value::Int32(..) => "INTEGER",
            Value::Int64(..) => "BIGINT",
            Value::Int128(..) => "HUGEINT",
            Value::UInt8(..) => "UTINYINT",
            Value::UInt16(..) => "USMALLINT",
            Value::UInt32(..) => "UINTEGER",
            Value::UInt64(..) => "UBIGINT",
            Value::UInt128(..) => "UHUGEINT",
            Value::Float32(..) => "FLOAT",
            Value::Float64(..) => "DOUBLE",
            Value::Decimal(.., precision, scale) => {
                out.push_str("DECIMAL");
                if (precision, scale) != (&0, &0) {
                    let _ = write!(out, "({},{})", precision, scale);
                }
                return;
            }
            Value::Char(..) => "CHAR(1)",
            Value::Varchar(..) => "VARCHAR",
            Value::Blob(..) => "BLOB",
            Value::Date(..) => "DATE",
            Value::Time(..) => "TIME",
            Value::Timestamp(..) => "TIMESTAMP",
            Value::TimestampWithTimezone(..) => "TIMESTAMP WITH TIME ZONE",
            Value::Uuid(..) => "UUID",
            Value::Enum(..) => "INTEGER",
            Value::Null => "VARCHAR",
        });
    }

    fn write_value(&self, ctx: &mut RenderContext, out: &mut String, value: &Value) {
        if value.is_null() {
            out.push_str("NULL");
            return;
        }
        match value {
            Value::Boolean(Some(v)) => self.write_value_bool(out, *v),
            Value::Int8(Some(v)) => write_integer!(out, *v),
            Value::Int16(Some(v)) => write_integer!(out, *v),
            Value::Int32(Some(v)) => write_integer!(out, *v),
            Value::Int64(Some(v)) => write_integer!(out, *v),
            Value::Int128(Some(v)) => write_integer!(out, *v),
            Value::UInt8(Some(v)) => write_integer!(out, *v),
            Value::UInt16(Some(v)) => write_integer!(out, *v),
            Value::UInt32(Some(v)) => write_integer!(out, *v),
            Value::UInt64(Some(v)) => write_integer!(out, *v),
            Value::UInt128(Some(v)) => write_integer!(out, *v),
            Value::Float32(Some(v)) => write_float!(self, ctx, out, *v),
            Value::Float64(Some(v)) => write_float!(self, ctx, out, *v),
            Value::Decimal(Some(v), ..) => drop(write!(out, "{}", v)),
            Value::Char(Some(v)) => {
                out.push('\'');
                out.push(*v);
                out.push('\'');
            }
            Value::Varchar(Some(v)) => self.write_value_string(out, v),
            Value::Blob(Some(v)) => self.write_value_blob(out, v.as_ref()),
            Value::Date(Some(v)) => {
                out.push('\'');
                self.write_value_date(out, v);
                out.push('\'');
            }
            Value::Time(Some(v)) => {
                out.push('\'');
                self.write_value_time(out, v);
                out.push('\'');
            }
            Value::Timestamp(Some(v)) => {
                out.push('\'');
                self.write_value_date(out, &v.date());
                out.push('T');
                self.write_value_time(out, &v.time());
                out.push('\'');
            }
            Value::TimestampWithTimezone(Some(v)) => {
                out.push('\'');
                self.write_value_date(out, &v.date());
                out.push('T');
                self.write_value_time(out, &v.time());
                let _ = write!(
                    out,
                    "{:+03}:{:02}",
                    v.offset().whole_hours(),
                    v.offset().whole_minutes().unsigned_abs() % 60
                );
                out.push('\'');
            }
            Value::Uuid(Some(v)) => drop(write!(out, "'{}'", v)),
            Value::Enum(Some((index, name))) => {
                if ctx.settings.enum_as_integer {
                    write_integer!(out, *index);
                } else {
                    self.write_value_string(out, name);
                }
            }
            _ => unreachable!("null payloads are handled above"),
        }
    }

    fn write_value_bool(&self, out: &mut String, value: bool) {
        out.push_str(["false", "true"][value as usize]);
    }

    fn write_value_string(&self, out: &mut String, value: &str) {
        out.push('\'');
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == '\'' {
                out.push_str(&value[position..i]);
                out.push_str("''");
                position = i + 1;
            } else if c == '\n' {
                out.push_str(&value[position..i]);
                out.push_str("\\n");
                position = i + 1;
            }
        }
        out.push_str(&value[position..]);
        out.push('\'');
    }

    fn write_value_blob(&self, out: &mut String, value: &[u8]) {
        out.push('\'');
        for b in value {
            let _ = write!(out, "\\x{:02X}", b);
        }
        out.push('\'');
    }

    fn write_value_date(&self, out: &mut String, value: &Date) {
        let _ = write!(
            out,
            "{:04}-{:02}-{:02}",
            value.year(),
            value.month() as u8,
            value.day()
        );
    }

    fn write_value_time(&self, out: &mut String, value: &Time) {
        let mut subsecond = value.nanosecond();
        let mut width = 9;
        while width > 1 && subsecond % 10 == 0 {
            subsecond /= 10;
            width -= 1;
        }
        if subsecond == 0 {
            let _ = write!(
                out,
                "{:02}:{:02}:{:02}",
                value.hour(),
                value.minute(),
                value.second()
            );
        } else {
            let _ = write!(
                out,
                "{:02}:{:02}:{:02}.{:0width$}",
                value.hour(),
                value.minute(),
                value.second(),
                subsecond
            );
        }
    }

    fn expression_unary_op_precedence(&self, value: &UnaryOpType) -> i32 {
        match value {
            UnaryOpType::Negative => 1250,
            UnaryOpType::Not => 250,
        }
    }

    fn expression_binary_op_precedence(&self, value: &BinaryOpType) -> i32 {
        match value {
            BinaryOpType::Or => 100,
            BinaryOpType::And => 200,
            BinaryOpType::Equal
            | BinaryOpType::NotEqual
            | BinaryOpType::Less
            | BinaryOpType::Greater
            | BinaryOpType::LessEqual
            | BinaryOpType::GreaterEqual => 300,
            BinaryOpType::Is
            | BinaryOpType::IsNot
            | BinaryOpType::Like
            | BinaryOpType::NotLike => 400,
            BinaryOpType::Subtraction | BinaryOpType::Addition => 800,
            BinaryOpType::Multiplication | BinaryOpType::Division | BinaryOpType::Remainder => 900,
        }
    }

    fn write_expression_operand(&self, ctx: &mut RenderContext, out: &mut String, value: &Operand) {
        match value {
            Operand::LitBool(v) => self.write_value_bool(out, *v),
            Operand::LitFloat(v) => write_float!(self, ctx, out, *v),
            Operand::LitInt(v) => write_integer!(out, *v),
            Operand::LitStr(v) => self.write_value_string(out, v),
            Operand::LitIdent(v) => out.push_str(v),
            Operand::Null => out.push_str("NULL"),
            Operand::Column(v) => self.write_column_ref(ctx, out, v),
            Operand::Variable(v) => self.write_value(ctx, out, v),
            Operand::Asterisk => out.push('*'),
        }
    }

    fn write_expression_unary_op(
        &self,
        ctx: &mut RenderContext,
        out: &mut String,
        value: &UnaryOp<&dyn Expression>,
    ) {
        match value.op {
            UnaryOpType::Negative => out.push('-'),
            UnaryOpType::Not => out.push_str("NOT "),
        };
        possibly_parenthesized!(
            out,
            value.v.precedence(self.as_dyn()) <= self.expression_unary_op_precedence(&value.op),
            value.v.write_query(self.as_dyn(), ctx, out)
        );
    }

    fn write_expression_binary_op(
        &self,
        ctx: &mut RenderContext,
        out: &mut String,
        value: &BinaryOp<&dyn Expression, &dyn Expression>,
    ) {
        let infix = match value.op {
            BinaryOpType::Multiplication => " * ",
            BinaryOpType::Division => " / ",
            BinaryOpType::Remainder => " % ",
            BinaryOpType::Addition => " + ",
            BinaryOpType::Subtraction => " - ",
            BinaryOpType::Is => " IS ",
            BinaryOpType::IsNot => " IS NOT ",
            BinaryOpType::Like => " LIKE ",
            BinaryOpType::NotLike => " NOT LIKE ",
            BinaryOpType::Equal => " = ",
            BinaryOpType::NotEqual => " <> ",
            BinaryOpType::Less => " < ",
            BinaryOpType::LessEqual => " <= ",
            BinaryOpType::Greater => " > ",
            BinaryOpType::GreaterEqual => " >= ",
            BinaryOpType::And => " AND ",
            BinaryOpType::Or => " OR ",
        };
        let like = matches!(value.op, BinaryOpType::Like | BinaryOpType::NotLike)
            && ctx.settings.strip_upper_in_like;
        let precedence = self.expression_binary_op_precedence(&value.op);
        if like {
            out.push_str("UPPER(");
        }
        possibly_parenthesized!(
            out,
            !like && value.lhs.precedence(self.as_dyn()) < precedence,
            value.lhs.write_query(self.as_dyn(), ctx, out)
        );
        if like {
            out.push(')');
        }
        out.push_str(infix);
        if like {
            out.push_str("UPPER(");
        }
        possibly_parenthesized!(
            out,
            !like && value.rhs.precedence(self.as_dyn()) <= precedence,
            value.rhs.write_query(self.as_dyn(), ctx, out)
        );
        if like {
            out.push(')');
        }
    }
}

/// Dialect-neutral compiler using every default rule.
pub struct GenericQueryCompiler;

impl GenericQueryCompiler {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Default for GenericQueryCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCompiler for GenericQueryCompiler {
    fn as_dyn(&self) -> &dyn QueryCompiler {
        self
    }
}
