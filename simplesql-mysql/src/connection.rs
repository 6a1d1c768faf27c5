use crate::{RowWrap, ValueWrap, driver_error};
use mysql_async::{
    Conn, Opts, Params, QueryResult,
    prelude::{Protocol, Queryable},
};
use simplesql_core::{
    Connection, Context, Cursor, Dialect, Error, ErrorKind, Result, Row, RowNames, Value,
    SERVER_GONE_ERROR, rewrite_placeholders, truncate_long,
};
use std::borrow::Cow;
use url::Url;

pub struct MySqlConnection {
    pub(crate) connection: Conn,
    broken: bool,
}

impl MySqlConnection {
    /// `%s` markers become `?` and `%%` becomes `%`.
    pub fn positional_placeholders(sql: &str) -> String {
        rewrite_placeholders(sql, |out, _| out.push('?'))
    }

    fn error(&mut self, e: mysql_async::Error, context: impl FnOnce() -> String) -> Error {
        let driver = driver_error(&e);
        if driver.kind == ErrorKind::Operational && driver.code == Some(SERVER_GONE_ERROR) {
            self.broken = true;
        }
        let error = Error::new(e).context(driver).context(context());
        log::error!("{:#}", error);
        error
    }

    async fn collect<P: Protocol>(
        sql: &str,
        mut result: QueryResult<'_, 'static, P>,
    ) -> mysql_async::Result<Cursor> {
        let labels: RowNames = result
            .columns_ref()
            .iter()
            .map(|c| c.name_str().into_owned())
            .collect();
        if labels.is_empty() {
            let affected = result.affected_rows();
            let last_insert_id = result.last_insert_id().filter(|v| *v != 0);
            result.drop_result().await?;
            return Ok(Cursor::affected(sql, affected, last_insert_id));
        }
        let rows = result
            .collect::<RowWrap>()
            .await?
            .into_iter()
            .map(|row| Row::new(labels.clone(), row.0))
            .collect();
        result.drop_result().await?;
        Ok(Cursor::with_rows(sql, labels, rows))
    }
}

impl Connection for MySqlConnection {
    const NAME: &'static str = "mysql";
    const DIALECT: Dialect = Dialect::MySql;

    async fn connect(url: Cow<'static, str>) -> Result<MySqlConnection> {
        let context = || format!("While trying to connect to `{}`", truncate_long!(url));
        let prefix = format!("{}://", Self::NAME);
        if !url.starts_with(&prefix) {
            let error = Error::msg(format!(
                "MySQL connection url must start with `{}`",
                &prefix
            ))
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let url = Url::parse(&url).with_context(context)?;
        let config = Opts::from_url(url.as_str()).with_context(context)?;
        let connection = Conn::new(config).await.map_err(|e| {
            let error = Error::new(e).context(context());
            log::error!("{:#}", error);
            error
        })?;
        Ok(MySqlConnection {
            connection,
            broken: false,
        })
    }

    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<Cursor> {
        let context = || format!("While executing the query:\n{}", truncate_long!(sql));
        let result = if params.is_empty() {
            match self.connection.query_iter(sql).await {
                Ok(result) => Self::collect(sql, result).await,
                Err(e) => Err(e),
            }
        } else {
            let statement = Self::positional_placeholders(sql);
            let params = Params::Positional(
                params
                    .iter()
                    .cloned()
                    .map(|v| ValueWrap(v).into())
                    .collect(),
            );
            match self.connection.exec_iter(statement.as_str(), params).await {
                Ok(result) => Self::collect(&statement, result).await,
                Err(e) => Err(e),
            }
        };
        result.map_err(|e| self.error(e, context))
    }

    async fn commit(&mut self) -> Result<()> {
        self.connection
            .query_drop("COMMIT")
            .await
            .map_err(|e| self.error(e, || "While committing".into()))
    }

    fn is_open(&self) -> bool {
        !self.broken
    }

    async fn close(self) -> Result<()> {
        if self.broken {
            return Ok(());
        }
        self.connection
            .disconnect()
            .await
            .context("While closing the connection")
    }

    fn capabilities() -> &'static [&'static str] {
        &["autocommit"]
    }

    async fn invoke(&mut self, capability: &str, args: &[Value]) -> Result<()> {
        match capability {
            "autocommit" => {
                let Some(enabled) = args.first().and_then(Value::as_bool) else {
                    return Err(Error::msg("autocommit expects a boolean"));
                };
                self.execute(&format!("SET autocommit={}", enabled as u8), &[])
                    .await
                    .map(|_| ())
            }
            _ => Err(Error::msg(format!(
                "mysql connection does not support `{}`",
                capability
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders() {
        assert_eq!(
            MySqlConnection::positional_placeholders(
                "UPDATE test SET name=%s WHERE id=%s AND name LIKE '100%%'"
            ),
            "UPDATE test SET name=? WHERE id=? AND name LIKE '100%'"
        );
    }
}
