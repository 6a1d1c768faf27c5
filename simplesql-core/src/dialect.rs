use crate::{DriverError, Error, ErrorKind};

/// Placeholder token used by every statement before it is adapted to a dialect.
pub const NEUTRAL_PLACEHOLDER: &str = "%s";

/// MySQL client error `CR_SERVER_GONE_ERROR`.
pub const SERVER_GONE_ERROR: i64 = 2006;

/// The conventions a SQL backend differs on: parameter token, identifier quote and which
/// failures are worth a reconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    MySql,
    Postgres,
    Sqlite,
}

impl Dialect {
    pub const fn placeholder(&self) -> &'static str {
        match self {
            Dialect::MySql | Dialect::Postgres => "%s",
            Dialect::Sqlite => "?",
        }
    }

    pub const fn quote_char(&self) -> char {
        match self {
            Dialect::MySql | Dialect::Sqlite => '`',
            Dialect::Postgres => '"',
        }
    }

    pub fn quote(&self, identifier: &str) -> String {
        let q = self.quote_char();
        let mut out = String::with_capacity(identifier.len() + 2);
        out.push(q);
        out.push_str(identifier);
        out.push(q);
        out
    }

    pub fn quote_many<'a>(&self, identifiers: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        identifiers.into_iter().map(|v| self.quote(v)).collect()
    }

    /// Whether `error` means the connection went stale and a fresh one could run the statement.
    ///
    /// MySQL only retries when the server went away. Postgres and SQLite retry on any failure, so
    /// with a `sqlite://:memory:` database a failing statement is retried on a new, empty
    /// database.
    pub fn is_reconnectable(&self, error: &Error) -> bool {
        match self {
            Dialect::MySql => DriverError::find(error).is_some_and(|e| {
                e.kind == ErrorKind::Operational && e.code == Some(SERVER_GONE_ERROR)
            }),
            Dialect::Postgres | Dialect::Sqlite => true,
        }
    }

    /// Replaces every neutral placeholder of the template with this dialect's token.
    pub fn adapt(&self, sql: &str) -> String {
        let placeholder = self.placeholder();
        if placeholder == NEUTRAL_PLACEHOLDER {
            sql.to_owned()
        } else {
            sql.replace(NEUTRAL_PLACEHOLDER, placeholder)
        }
    }
}
