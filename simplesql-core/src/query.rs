use crate::{Value, truncate_long};
use std::fmt::{self, Display};

/// SQL text with its ordered parameters.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", truncate_long!(self.sql))
    }
}

/// A WHERE condition: clause text with `%s` placeholders and the values bound to them, in order.
///
/// An empty clause means no WHERE at all. The number of placeholders is not checked against the
/// number of values, a mismatch is reported by the driver.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Filter {
    pub clause: String,
    pub params: Vec<Value>,
}

impl Filter {
    pub fn new<V: Into<Value>>(
        clause: impl Into<String>,
        params: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            clause: clause.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }
    /// Matches every row.
    pub fn none() -> Self {
        Self::default()
    }
    pub fn is_empty(&self) -> bool {
        self.clause.trim().is_empty()
    }
    /// Values to bind, none when the clause is blank and no WHERE is written.
    pub fn bound_params(&self) -> &[Value] {
        if self.is_empty() { &[] } else { &self.params }
    }
}

impl From<()> for Filter {
    fn from(_: ()) -> Self {
        Filter::none()
    }
}

impl From<&str> for Filter {
    fn from(value: &str) -> Self {
        Filter::new(value, Vec::<Value>::new())
    }
}

impl From<String> for Filter {
    fn from(value: String) -> Self {
        Filter::new(value, Vec::<Value>::new())
    }
}

impl<S: Into<String>, V: Into<Value>, const N: usize> From<(S, [V; N])> for Filter {
    fn from((clause, params): (S, [V; N])) -> Self {
        Filter::new(clause, params)
    }
}

impl<S: Into<String>, V: Into<Value>> From<(S, Vec<V>)> for Filter {
    fn from((clause, params): (S, Vec<V>)) -> Self {
        Filter::new(clause, params)
    }
}

impl From<Option<Filter>> for Filter {
    fn from(value: Option<Filter>) -> Self {
        value.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// ORDER BY on one field, with an optional direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub field: String,
    pub direction: Option<Direction>,
}

impl Order {
    pub fn new(field: impl Into<String>, direction: Option<Direction>) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

impl From<&str> for Order {
    fn from(value: &str) -> Self {
        Order::new(value, None)
    }
}

impl From<String> for Order {
    fn from(value: String) -> Self {
        Order::new(value, None)
    }
}

impl<S: Into<String>> From<(S, Direction)> for Order {
    fn from((field, direction): (S, Direction)) -> Self {
        Order::new(field, Some(direction))
    }
}

/// Row cap, optionally preceded by an offset.
///
/// Written as a pair the offset comes first: `[0, 1]` is offset 0, at most 1 row, and renders as
/// `LIMIT 1 OFFSET 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Count(u64),
    Range { offset: u64, count: u64 },
}

impl Limit {
    /// One element is a cap, two elements are offset and cap. Other lengths mean no limit.
    pub fn from_slice(values: &[u64]) -> Option<Limit> {
        match *values {
            [count] => Some(Limit::Count(count)),
            [offset, count] => Some(Limit::Range { offset, count }),
            _ => None,
        }
    }
}

impl From<u64> for Limit {
    fn from(value: u64) -> Self {
        Limit::Count(value)
    }
}

impl From<[u64; 1]> for Limit {
    fn from([count]: [u64; 1]) -> Self {
        Limit::Count(count)
    }
}

impl From<[u64; 2]> for Limit {
    fn from([offset, count]: [u64; 2]) -> Self {
        Limit::Range { offset, count }
    }
}

impl From<(u64, u64)> for Limit {
    fn from((offset, count): (u64, u64)) -> Self {
        Limit::Range { offset, count }
    }
}

/// Arguments of a single table SELECT. No fields means `*`.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Select {
    pub table: String,
    pub fields: Vec<String>,
    pub filter: Filter,
    pub order: Option<Order>,
    pub limit: Option<Limit>,
}

impl Select {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }
    pub fn fields(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }
    pub fn filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filter = filter.into();
        self
    }
    pub fn order(mut self, order: impl Into<Order>) -> Self {
        self.order = Some(order.into());
        self
    }
    pub fn limit(mut self, limit: impl Into<Limit>) -> Self {
        self.limit = Some(limit.into());
        self
    }
}

impl From<&str> for Select {
    fn from(value: &str) -> Self {
        Select::new(value)
    }
}

impl From<String> for Select {
    fn from(value: String) -> Self {
        Select::new(value)
    }
}

/// Arguments of a two tables LEFT JOIN.
///
/// `fields.0` and `join_fields.0` belong to `tables.0`, the second elements to `tables.1`.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct LeftJoin {
    pub tables: (String, String),
    pub fields: (Vec<String>, Vec<String>),
    pub join_fields: (String, String),
    pub filter: Filter,
    pub order: Option<Order>,
    pub limit: Option<Limit>,
}

impl LeftJoin {
    pub fn new(
        tables: (impl Into<String>, impl Into<String>),
        fields: (
            impl IntoIterator<Item = impl Into<String>>,
            impl IntoIterator<Item = impl Into<String>>,
        ),
        join_fields: (impl Into<String>, impl Into<String>),
    ) -> Self {
        Self {
            tables: (tables.0.into(), tables.1.into()),
            fields: (
                fields.0.into_iter().map(Into::into).collect(),
                fields.1.into_iter().map(Into::into).collect(),
            ),
            join_fields: (join_fields.0.into(), join_fields.1.into()),
            ..Default::default()
        }
    }
    pub fn filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filter = filter.into();
        self
    }
    pub fn order(mut self, order: impl Into<Order>) -> Self {
        self.order = Some(order.into());
        self
    }
    pub fn limit(mut self, limit: impl Into<Limit>) -> Self {
        self.limit = Some(limit.into());
        self
    }
}
