use crate::{ValueHolder, driver_error};
use postgres_types::ToSql;
use simplesql_core::{
    Connection, Context, Cursor, Dialect, Error, Result, Row, Value, rewrite_placeholders,
    truncate_long,
};
use std::{borrow::Cow, fmt::Write, sync::Arc};
use tokio::spawn;
use tokio_postgres::NoTls;
use url::Url;

pub struct PostgresConnection {
    pub(crate) client: tokio_postgres::Client,
}

impl PostgresConnection {
    /// `%s` markers become `$1`, `$2`, ... and `%%` becomes `%`.
    pub fn numbered_placeholders(sql: &str) -> String {
        rewrite_placeholders(sql, |out, i| {
            let _ = write!(out, "${}", i + 1);
        })
    }

    fn error(e: tokio_postgres::Error, context: impl FnOnce() -> String) -> Error {
        let driver = driver_error(&e);
        let error = Error::new(e).context(driver).context(context());
        log::error!("{:#}", error);
        error
    }
}

impl Connection for PostgresConnection {
    const NAME: &'static str = "postgres";
    const DIALECT: Dialect = Dialect::Postgres;

    async fn connect(url: Cow<'static, str>) -> Result<PostgresConnection> {
        let context = || format!("While trying to connect to `{}`", url);
        let prefix = format!("{}://", Self::NAME);
        if !url.starts_with(&prefix) && !url.starts_with("postgresql://") {
            let error = Error::msg(format!(
                "Postgres connection url must start with `{}`",
                &prefix
            ))
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let url = Url::parse(&url).with_context(context)?;
        let (client, connection) = tokio_postgres::connect(url.as_str(), NoTls)
            .await
            .map_err(|e| Self::error(e, context))?;
        spawn(async move {
            if let Err(e) = connection.await
                && !e.is_closed()
            {
                log::error!("Postgres connection error: {:#}", e);
            }
        });
        Ok(Self { client })
    }

    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<Cursor> {
        let sql: Cow<str> = if params.is_empty() {
            sql.into()
        } else {
            Self::numbered_placeholders(sql).into()
        };
        let context = || format!("While executing the query:\n{}", truncate_long!(sql));
        let statement = self
            .client
            .prepare(&sql)
            .await
            .map_err(|e| Self::error(e, context))?;
        let holders: Vec<ValueHolder> = params.iter().cloned().map(ValueHolder).collect();
        let params: Vec<&(dyn ToSql + Sync)> = holders
            .iter()
            .map(|v| v as &(dyn ToSql + Sync))
            .collect();
        if statement.columns().is_empty() {
            let affected = self
                .client
                .execute(&statement, &params)
                .await
                .map_err(|e| Self::error(e, context))?;
            return Ok(Cursor::affected(sql, affected, None));
        }
        let labels: Arc<[String]> = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        let rows = self
            .client
            .query(&statement, &params)
            .await
            .map_err(|e| Self::error(e, context))?
            .into_iter()
            .map(|row| {
                let values = (0..row.len())
                    .map(|i| match row.try_get::<_, ValueHolder>(i) {
                        Ok(v) => Ok(v.0),
                        Err(e) => {
                            let column = &row.columns()[i];
                            Err(Error::new(e).context(format!(
                                "Could not decode column {} `{}`: {}",
                                i,
                                column.name(),
                                column.type_()
                            )))
                        }
                    })
                    .collect::<Result<_>>()?;
                Ok(Row::new(labels.clone(), values))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Cursor::with_rows(sql, labels, rows))
    }

    async fn commit(&mut self) -> Result<()> {
        self.client
            .batch_execute("COMMIT")
            .await
            .map_err(|e| Self::error(e, || "While committing".into()))
    }

    fn is_open(&self) -> bool {
        !self.client.is_closed()
    }

    async fn close(self) -> Result<()> {
        drop(self.client);
        Ok(())
    }
}
