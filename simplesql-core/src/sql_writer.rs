use crate::{
    Dialect, Filter, LeftJoin, Limit, NEUTRAL_PLACEHOLDER, Order, Record, Select, Statement,
    Value, separated_by,
};
use std::fmt::Write;

/// Renders statements with neutral `%s` placeholders and collects their parameters in order.
///
/// The dialect is only consulted for identifier quoting and for the upsert clause, placeholders
/// are adapted later by the executor.
#[derive(Debug, Clone, Copy)]
pub struct SqlWriter {
    dialect: Dialect,
}

impl SqlWriter {
    pub const fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// `k1,k2,...` in record order.
    pub fn write_column_list(&self, out: &mut String, record: &Record) {
        separated_by(out, record.keys(), |out, v| out.push_str(v), ",");
    }

    /// `%s,%s,...`
    pub fn write_placeholders(&self, out: &mut String, count: usize) {
        separated_by(
            out,
            (0..count).map(|_| NEUTRAL_PLACEHOLDER),
            |out, v| out.push_str(v),
            ",",
        );
    }

    /// `(%s,%s),(%s,%s),...`: `rows` tuples of `arity` placeholders.
    pub fn write_values_tuples(&self, out: &mut String, arity: usize, rows: usize) {
        separated_by(
            out,
            0..rows,
            |out, _| {
                out.push('(');
                self.write_placeholders(out, arity);
                out.push(')');
            },
            ",",
        );
    }

    /// `k1=%s,k2=%s,...` in record order.
    pub fn write_set(&self, out: &mut String, record: &Record) {
        separated_by(
            out,
            record.keys(),
            |out, v| {
                out.push_str(v);
                out.push('=');
                out.push_str(NEUTRAL_PLACEHOLDER);
            },
            ",",
        );
    }

    /// ` WHERE <clause>`, nothing for an empty filter.
    pub fn write_where(&self, out: &mut String, filter: &Filter) {
        if !filter.is_empty() {
            out.push_str(" WHERE ");
            out.push_str(&filter.clause);
        }
    }

    /// ` ORDER BY <field> [ASC|DESC]`
    pub fn write_order(&self, out: &mut String, order: &Order) {
        out.push_str(" ORDER BY ");
        out.push_str(&order.field);
        if let Some(direction) = order.direction {
            out.push(' ');
            out.push_str(direction.as_str());
        }
    }

    /// `LIMIT n` or `LIMIT count OFFSET offset`
    pub fn write_limit(&self, out: &mut String, limit: &Limit) {
        let _ = match limit {
            Limit::Count(count) => write!(out, "LIMIT {}", count),
            Limit::Range { offset, count } => write!(out, "LIMIT {} OFFSET {}", count, offset),
        };
    }

    fn write_tail(
        &self,
        out: &mut String,
        filter: &Filter,
        order: Option<&Order>,
        limit: Option<&Limit>,
    ) {
        self.write_where(out, filter);
        if let Some(order) = order {
            self.write_order(out, order);
        }
        if let Some(limit) = limit {
            out.push(' ');
            self.write_limit(out, limit);
        }
    }

    pub fn select(&self, select: &Select) -> Statement {
        let mut sql = String::with_capacity(128);
        sql.push_str("SELECT ");
        if select.fields.is_empty() {
            sql.push('*');
        } else {
            separated_by(&mut sql, &select.fields, |out, v| out.push_str(v), ",");
        }
        sql.push_str(" FROM ");
        sql.push_str(&self.dialect.quote(&select.table));
        self.write_tail(
            &mut sql,
            &select.filter,
            select.order.as_ref(),
            select.limit.as_ref(),
        );
        Statement::new(sql, select.filter.bound_params().to_vec())
    }

    pub fn left_join(&self, join: &LeftJoin) -> Statement {
        let (left, right) = (&join.tables.0, &join.tables.1);
        let mut sql = String::with_capacity(256);
        sql.push_str("SELECT ");
        separated_by(
            &mut sql,
            join.fields
                .0
                .iter()
                .map(|f| (left, f))
                .chain(join.fields.1.iter().map(|f| (right, f))),
            |out, (table, field)| {
                let _ = write!(out, "{}.{}", table, field);
            },
            ",",
        );
        let _ = write!(
            sql,
            " FROM {left} LEFT JOIN {right} ON ({left}.{} = {right}.{})",
            join.join_fields.0, join.join_fields.1,
        );
        self.write_tail(
            &mut sql,
            &join.filter,
            join.order.as_ref(),
            join.limit.as_ref(),
        );
        Statement::new(sql, join.filter.bound_params().to_vec())
    }

    pub fn insert(&self, table: &str, record: &Record) -> Statement {
        let mut sql = String::with_capacity(128);
        let _ = write!(sql, "INSERT INTO {} (", table);
        self.write_column_list(&mut sql, record);
        sql.push_str(") VALUES(");
        self.write_placeholders(&mut sql, record.len());
        sql.push(')');
        Statement::new(sql, record.values().cloned().collect())
    }

    /// All records are expected to share the key set of the first one.
    pub fn insert_batch(&self, table: &str, records: &[Record]) -> Statement {
        let Some(first) = records.first() else {
            return Statement::default();
        };
        let mut sql = String::with_capacity(128 + records.len() * first.len() * 3);
        let _ = write!(sql, "INSERT INTO {} (", table);
        self.write_column_list(&mut sql, first);
        sql.push_str(") VALUES ");
        self.write_values_tuples(&mut sql, first.len(), records.len());
        let params = records
            .iter()
            .flat_map(|r| r.values().cloned())
            .collect();
        Statement::new(sql, params)
    }

    /// SET values first, then the filter values.
    pub fn update(&self, table: &str, record: &Record, filter: &Filter) -> Statement {
        let mut sql = String::with_capacity(128);
        let _ = write!(sql, "UPDATE {} SET ", table);
        self.write_set(&mut sql, record);
        self.write_where(&mut sql, filter);
        let mut params: Vec<Value> = record.values().cloned().collect();
        params.extend(filter.bound_params().iter().cloned());
        Statement::new(sql, params)
    }

    /// Insert of the whole record that, on a key conflict, updates the non key columns.
    ///
    /// Parameters are the insert values followed by the update values.
    pub fn insert_or_update(&self, table: &str, record: &Record, keys: &[&str]) -> Statement {
        let update = record.without(keys.iter().copied());
        let mut sql = String::with_capacity(192);
        let _ = write!(sql, "INSERT INTO {} (", table);
        self.write_column_list(&mut sql, record);
        sql.push_str(") VALUES(");
        self.write_placeholders(&mut sql, record.len());
        sql.push(')');
        match self.dialect {
            Dialect::MySql => {
                sql.push_str(" ON DUPLICATE KEY UPDATE ");
                if update.is_empty() {
                    if let Some(key) = keys.first() {
                        let _ = write!(sql, "{key}={key}");
                    }
                } else {
                    self.write_set(&mut sql, &update);
                }
            }
            Dialect::Postgres | Dialect::Sqlite => {
                sql.push_str(" ON CONFLICT (");
                separated_by(&mut sql, keys, |out, v| out.push_str(v), ",");
                sql.push(')');
                if update.is_empty() {
                    sql.push_str(" DO NOTHING");
                } else {
                    sql.push_str(" DO UPDATE SET ");
                    self.write_set(&mut sql, &update);
                }
            }
        }
        let mut params: Vec<Value> = record.values().cloned().collect();
        params.extend(update.values().cloned());
        Statement::new(sql, params)
    }

    pub fn delete(&self, table: &str, filter: &Filter) -> Statement {
        let mut sql = String::with_capacity(64);
        let _ = write!(sql, "DELETE FROM {}", table);
        self.write_where(&mut sql, filter);
        Statement::new(sql, filter.bound_params().to_vec())
    }
}
