#[cfg(test)]
mod tests {
    use simplesql_core::{Dialect, DriverError, Error, ErrorKind, SERVER_GONE_ERROR};

    #[test]
    fn placeholders() {
        let sql = "SELECT * FROM test WHERE id=%s AND name=%s";
        assert_eq!(
            Dialect::Sqlite.adapt(sql),
            "SELECT * FROM test WHERE id=? AND name=?"
        );
        assert_eq!(Dialect::MySql.adapt(sql), sql);
        assert_eq!(Dialect::Postgres.adapt(sql), sql);
        assert_eq!(Dialect::Sqlite.placeholder(), "?");
        assert_eq!(Dialect::MySql.placeholder(), "%s");
        assert_eq!(Dialect::Postgres.placeholder(), "%s");
    }

    #[test]
    fn quoting() {
        assert_eq!(Dialect::MySql.quote("test"), "`test`");
        assert_eq!(Dialect::Sqlite.quote("test"), "`test`");
        assert_eq!(Dialect::Postgres.quote("test"), "\"test\"");
        assert_eq!(
            Dialect::Postgres.quote_many(["a", "b"]),
            ["\"a\"", "\"b\""]
        );
        assert!(Dialect::MySql.quote_many([]).is_empty());
    }

    #[test]
    fn mysql_reconnects_only_when_server_is_gone() {
        let gone = Error::new(DriverError::operational(
            Some(SERVER_GONE_ERROR),
            "MySQL server has gone away",
        ));
        assert!(Dialect::MySql.is_reconnectable(&gone));
        let gone_with_context = Error::new(DriverError::operational(
            Some(SERVER_GONE_ERROR),
            "MySQL server has gone away",
        ))
        .context("While executing");
        assert!(Dialect::MySql.is_reconnectable(&gone_with_context));

        let lost = Error::new(DriverError::operational(Some(2013), "Lost connection"));
        assert!(!Dialect::MySql.is_reconnectable(&lost));
        let syntax = Error::new(DriverError::new(
            ErrorKind::Programming,
            Some(SERVER_GONE_ERROR),
            "syntax",
        ));
        assert!(!Dialect::MySql.is_reconnectable(&syntax));
        assert!(!Dialect::MySql.is_reconnectable(&Error::msg("unknown")));
    }

    #[test]
    fn postgres_and_sqlite_always_reconnect() {
        let syntax = Error::new(DriverError::programming(None, "syntax error"));
        assert!(Dialect::Postgres.is_reconnectable(&syntax));
        assert!(Dialect::Sqlite.is_reconnectable(&syntax));
        assert!(Dialect::Sqlite.is_reconnectable(&Error::msg("anything")));
    }
}
