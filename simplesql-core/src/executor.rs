use crate::{
    Connection, ConnectionFactory, Context, Cursor, Dialect, DisplayParams, Error, Failure, Filter,
    LeftJoin, Limit, Logger, Record, Result, Row, Select, SqlWriter, Statement, Value,
    truncate_long,
};
use std::{borrow::Cow, mem};

/// Database handle that builds statements, runs them on the owned connection and reconnects once
/// when the connection went stale.
///
/// Every operation takes `&mut self`: one statement at a time, in the caller's order.
pub struct SimpleSql<C: Connection> {
    connection: C,
    factory: ConnectionFactory<C>,
    dialect: Dialect,
    logger: Logger,
    last_statement: Option<String>,
    last_insert_id: Option<u64>,
}

/// Configures a [`SimpleSql`] before connecting.
pub struct Builder<C: Connection> {
    factory: ConnectionFactory<C>,
    dialect: Dialect,
    logger: Option<Logger>,
}

impl<C: Connection> Builder<C> {
    /// Override the dialect, by default the connection's own.
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub async fn connect(self) -> Result<SimpleSql<C>> {
        let logger = self.logger.unwrap_or_default();
        let connection = match self.factory.connect(&logger).await {
            Ok(v) => v,
            Err(e) => {
                let error = e.context(Failure::ConnectFailed);
                logger.error(format_args!("{:#}", error));
                return Err(error);
            }
        };
        Ok(SimpleSql {
            connection,
            factory: self.factory,
            dialect: self.dialect,
            logger,
            last_statement: None,
            last_insert_id: None,
        })
    }
}

impl<C: Connection> SimpleSql<C> {
    pub fn builder(factory: ConnectionFactory<C>) -> Builder<C> {
        Builder {
            factory,
            dialect: C::DIALECT,
            logger: None,
        }
    }

    /// Connect through `factory` with the default dialect and logger.
    pub async fn new(factory: ConnectionFactory<C>) -> Result<Self> {
        Self::builder(factory).connect().await
    }

    /// Connect to `url` with the default dialect and logger.
    pub async fn connect(url: impl Into<Cow<'static, str>>) -> Result<Self> {
        Self::new(ConnectionFactory::from_url(url)).await
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn writer(&self) -> SqlWriter {
        SqlWriter::new(self.dialect)
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Replace the connection with a new one from the factory. The old connection is closed only
    /// after the new one is established.
    pub async fn reconnect(&mut self) -> Result<()> {
        let connection = match self.factory.connect(&self.logger).await {
            Ok(v) => v,
            Err(e) => {
                let error = e.context(Failure::ConnectFailed);
                self.logger.error(format_args!("{:#}", error));
                return Err(error);
            }
        };
        let stale = mem::replace(&mut self.connection, connection);
        if let Err(e) = stale.close().await {
            self.logger
                .debug(format_args!("Closing the stale connection: {:#}", e));
        }
        Ok(())
    }

    /// Run a statement written with `%s` placeholders.
    ///
    /// If the failure is classified as a stale connection by the dialect, the connection is
    /// replaced and the statement is retried once.
    pub async fn query(&mut self, sql: &str, params: &[Value]) -> Result<Cursor> {
        let sql = self.dialect.adapt(sql);
        self.logger.debug(format_args!(
            "{} {}",
            truncate_long!(sql),
            DisplayParams(params)
        ));
        self.last_statement = Some(sql.clone());
        let result = match self.connection.execute(&sql, params).await {
            Ok(cursor) => Ok(cursor),
            Err(e) if self.dialect.is_reconnectable(&e) => {
                self.logger.error(format_args!(
                    "{:#}\nReconnecting and retrying:\n{}",
                    e,
                    truncate_long!(sql)
                ));
                self.reconnect().await?;
                self.connection.execute(&sql, params).await.map_err(|e| {
                    e.context(Failure::ReconnectExhausted {
                        statement: truncate_long!(sql).to_string(),
                    })
                })
            }
            Err(e) => Err(e.context(Failure::StatementFailed {
                statement: truncate_long!(sql).to_string(),
            })),
        };
        match result {
            Ok(cursor) => {
                if let Some(id) = cursor.last_insert_id() {
                    self.last_insert_id = Some(id);
                }
                Ok(cursor)
            }
            Err(error) => {
                self.logger.error(format_args!("{:#}", error));
                Err(error)
            }
        }
    }

    async fn run(&mut self, statement: Statement) -> Result<Cursor> {
        self.query(&statement.sql, &statement.params).await
    }

    /// First row of the selection, by default `LIMIT 1 OFFSET 0` is applied.
    pub async fn get_one(&mut self, select: impl Into<Select>) -> Result<Option<Row>> {
        let mut select = select.into();
        if select.limit.is_none() {
            select.limit = Some(Limit::Range {
                offset: 0,
                count: 1,
            });
        }
        let statement = self.writer().select(&select);
        Ok(self.run(statement).await?.fetch_one())
    }

    /// Every row of the selection, `None` if there are none.
    pub async fn get_all(&mut self, select: impl Into<Select>) -> Result<Option<Vec<Row>>> {
        let statement = self.writer().select(&select.into());
        let rows = self.run(statement).await?.fetch_all();
        Ok(Some(rows).filter(|v| !v.is_empty()))
    }

    pub async fn left_join(&mut self, join: LeftJoin) -> Result<Option<Vec<Row>>> {
        let statement = self.writer().left_join(&join);
        let rows = self.run(statement).await?.fetch_all();
        Ok(Some(rows).filter(|v| !v.is_empty()))
    }

    /// Insert one row, returns the number of affected rows.
    pub async fn insert(&mut self, table: &str, record: &Record) -> Result<u64> {
        if record.is_empty() {
            return Err(Error::msg(format!(
                "Cannot insert an empty record into `{}`",
                table
            )));
        }
        let statement = self.writer().insert(table, record);
        Ok(self.run(statement).await?.rows_affected())
    }

    /// Insert many rows sharing the key set of the first one in a single statement.
    pub async fn insert_batch(&mut self, table: &str, records: &[Record]) -> Result<u64> {
        if records.first().is_none_or(Record::is_empty) {
            return Err(Error::msg(format!(
                "Cannot batch insert into `{}` without records",
                table
            )));
        }
        let statement = self.writer().insert_batch(table, records);
        Ok(self.run(statement).await?.rows_affected())
    }

    pub async fn update(
        &mut self,
        table: &str,
        record: &Record,
        filter: impl Into<Filter>,
    ) -> Result<u64> {
        if record.is_empty() {
            return Err(Error::msg(format!(
                "Cannot update `{}` without columns to set",
                table
            )));
        }
        let statement = self.writer().update(table, record, &filter.into());
        Ok(self.run(statement).await?.rows_affected())
    }

    /// Insert the record or, when a row with the same `keys` exists, update its other columns.
    pub async fn insert_or_update(
        &mut self,
        table: &str,
        record: &Record,
        keys: &[&str],
    ) -> Result<u64> {
        if keys.is_empty() {
            return Err(Error::msg(format!(
                "Cannot upsert into `{}` without key columns",
                table
            )));
        }
        if let Some(key) = keys.iter().find(|k| !record.contains_key(k)) {
            return Err(Error::msg(format!(
                "Key `{}` is missing from the record to upsert into `{}`",
                key, table
            )));
        }
        let statement = self.writer().insert_or_update(table, record, keys);
        Ok(self.run(statement).await?.rows_affected())
    }

    pub async fn delete(&mut self, table: &str, filter: impl Into<Filter>) -> Result<u64> {
        let statement = self.writer().delete(table, &filter.into());
        Ok(self.run(statement).await?.rows_affected())
    }

    /// Insert id of the most recent statement that reported one. Statements without an insert id
    /// leave it unchanged.
    pub fn last_id(&self) -> Option<u64> {
        self.last_insert_id
    }

    /// Last statement sent to the connection, with the dialect placeholders.
    pub fn last_query(&self) -> Option<&str> {
        self.last_statement.as_deref()
    }

    pub async fn commit(&mut self) -> Result<()> {
        self.connection
            .commit()
            .await
            .context("While committing the transaction")
    }

    pub fn is_open(&self) -> bool {
        self.connection.is_open()
    }

    /// Close the connection.
    pub async fn end(self) -> Result<()> {
        self.connection.close().await
    }

    /// Run `f` and close the connection afterwards, also when `f` fails.
    pub async fn scope<T>(mut self, f: impl AsyncFnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let result = f(&mut self).await;
        let closed = self.end().await;
        let value = result?;
        closed?;
        Ok(value)
    }

    /// Borrow the underlying connection.
    pub fn connection(&mut self) -> &mut C {
        &mut self.connection
    }
}
