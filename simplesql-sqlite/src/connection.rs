use crate::{
    CBox,
    bind::bind_value,
    driver_error,
    extract::{extract_name, extract_value},
};
use libsqlite3_sys::{
    SQLITE_DONE, SQLITE_OK, SQLITE_OPEN_CREATE, SQLITE_OPEN_READWRITE, SQLITE_OPEN_URI,
    SQLITE_ROW, sqlite3, sqlite3_bind_parameter_count, sqlite3_busy_timeout, sqlite3_changes64,
    sqlite3_close, sqlite3_column_count, sqlite3_finalize, sqlite3_get_autocommit,
    sqlite3_last_insert_rowid, sqlite3_open_v2, sqlite3_prepare_v2, sqlite3_step, sqlite3_stmt,
    sqlite3_total_changes64,
};
use simplesql_core::{
    Connection, Context, Cursor, Dialect, DriverError, Error, Result, Row, Value, truncate_long,
};
use std::{
    borrow::Cow,
    ffi::{CStr, CString, c_int},
    ptr,
    sync::{
        Arc,
        atomic::{AtomicPtr, Ordering},
    },
};
use tokio::task::spawn_blocking;

/// Connection to a sqlite database file, or to a private in memory database with
/// `sqlite://:memory:`.
///
/// Every sqlite failure makes the executor reconnect and retry once. An in memory database does
/// not survive that reconnect: the retry runs against a new empty database, so the caller sees
/// the retry's error (typically `no such table`) while the original failure is only logged.
pub struct SqliteConnection {
    pub(crate) connection: CBox<sqlite3>,
}

fn close_handle(p: *mut sqlite3) {
    unsafe {
        sqlite3_close(p);
    }
}

fn finalize_statement(p: *mut sqlite3_stmt) {
    unsafe {
        sqlite3_finalize(p);
    }
}

impl SqliteConnection {
    /// Prepare, bind and step a single statement. Must run on a blocking thread.
    fn run(connection: *mut sqlite3, sql: &str, params: &[Value]) -> Result<Cursor> {
        unsafe {
            let query = CString::new(sql).context("The query contains a nul byte")?;
            let mut statement = CBox::null(finalize_statement);
            let mut tail = ptr::null();
            let rc = sqlite3_prepare_v2(
                connection,
                query.as_ptr(),
                -1,
                &mut *statement,
                &mut tail,
            );
            if rc != SQLITE_OK {
                return Err(driver_error(connection, rc).into());
            }
            if !tail.is_null() && !CStr::from_ptr(tail).to_bytes().trim_ascii().is_empty() {
                return Err(DriverError::programming(
                    None,
                    "Cannot execute more than one statement at a time",
                )
                .into());
            }
            if statement.is_null() {
                // Only whitespace or comments
                return Ok(Cursor::affected(sql, 0, None));
            }
            let expected = sqlite3_bind_parameter_count(*statement) as usize;
            if expected != params.len() {
                return Err(DriverError::programming(
                    None,
                    format!(
                        "Incorrect number of bindings supplied: the statement uses {}, and there are {} supplied",
                        expected,
                        params.len()
                    ),
                )
                .into());
            }
            for (i, value) in params.iter().enumerate() {
                bind_value(*statement, i as c_int + 1, value)?;
            }
            let count = sqlite3_column_count(*statement);
            let labels: Arc<[String]> = (0..count)
                .map(|i| extract_name(*statement, i))
                .collect::<Result<_>>()?;
            let last_rowid = sqlite3_last_insert_rowid(connection);
            let total_changes = sqlite3_total_changes64(connection);
            let mut rows = Vec::new();
            loop {
                match sqlite3_step(*statement) {
                    SQLITE_DONE => break,
                    SQLITE_ROW => {
                        let values = (0..count)
                            .map(|i| extract_value(*statement, i))
                            .collect::<Result<_>>()?;
                        rows.push(Row::new(labels.clone(), values));
                    }
                    rc => return Err(driver_error(connection, rc).into()),
                }
            }
            if count > 0 {
                return Ok(Cursor::with_rows(sql, labels, rows));
            }
            // sqlite3_changes64 keeps the count of the last INSERT, UPDATE or DELETE, other
            // statements leave the total untouched
            let changes = if sqlite3_total_changes64(connection) != total_changes {
                sqlite3_changes64(connection).max(0) as u64
            } else {
                0
            };
            let rowid = sqlite3_last_insert_rowid(connection);
            let last_insert_id = (rowid != last_rowid).then_some(rowid as u64);
            Ok(Cursor::affected(sql, changes, last_insert_id))
        }
    }

    fn handle(&self) -> Result<AtomicPtr<sqlite3>> {
        if self.connection.is_null() {
            return Err(DriverError::operational(None, "Cannot operate on a closed database").into());
        }
        Ok(AtomicPtr::new(*self.connection))
    }
}

impl Connection for SqliteConnection {
    const NAME: &'static str = "sqlite";
    const DIALECT: Dialect = Dialect::Sqlite;

    async fn connect(url: Cow<'static, str>) -> Result<SqliteConnection> {
        let prefix = format!("{}://", Self::NAME);
        if !url.starts_with(&prefix) {
            let error = Error::msg(format!(
                "Expected sqlite connection url to start with `{}`",
                &prefix
            ));
            log::error!("{:#}", error);
            return Err(error);
        }
        let context = || format!("Error while decoding connection URL: `{}`", url);
        let path = CString::new(format!("file:{}", url.trim_start_matches(&prefix)))
            .with_context(context)?;
        let connection = spawn_blocking(move || unsafe {
            let mut connection = CBox::null(close_handle);
            let rc = sqlite3_open_v2(
                path.as_ptr(),
                &mut *connection,
                SQLITE_OPEN_URI | SQLITE_OPEN_READWRITE | SQLITE_OPEN_CREATE,
                ptr::null(),
            );
            if rc != SQLITE_OK {
                let error = Error::new(driver_error(*connection, rc)).context(format!(
                    "Cannot open the database `{}`",
                    path.to_string_lossy()
                ));
                log::error!("{:#}", error);
                return Err(error);
            }
            Ok(connection)
        })
        .await??;
        Ok(Self { connection })
    }

    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<Cursor> {
        let connection = self.handle()?;
        let query = sql.to_owned();
        let params = params.to_vec();
        let result = spawn_blocking(move || {
            Self::run(connection.load(Ordering::Relaxed), &query, &params)
        })
        .await?;
        result.map_err(|e| {
            let error = e.context(format!(
                "While executing the query:\n{}",
                truncate_long!(sql)
            ));
            log::error!("{:#}", error);
            error
        })
    }

    async fn commit(&mut self) -> Result<()> {
        let autocommit = unsafe { sqlite3_get_autocommit(self.handle()?.into_inner()) };
        if autocommit == 0 {
            self.execute("COMMIT", &[]).await?;
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        !self.connection.is_null()
    }

    async fn close(mut self) -> Result<()> {
        let connection = AtomicPtr::new(self.connection.take());
        spawn_blocking(move || unsafe {
            let connection = connection.load(Ordering::Relaxed);
            if connection.is_null() {
                return Ok(());
            }
            let rc = sqlite3_close(connection);
            if rc != SQLITE_OK {
                let error = Error::new(driver_error(connection, rc))
                    .context("While closing the database");
                log::error!("{:#}", error);
                return Err(error);
            }
            Ok(())
        })
        .await?
    }

    fn capabilities() -> &'static [&'static str] {
        &["busy_timeout"]
    }

    async fn invoke(&mut self, capability: &str, args: &[Value]) -> Result<()> {
        match capability {
            "busy_timeout" => {
                let Some(ms) = args.first().and_then(Value::as_i64) else {
                    return Err(Error::msg(
                        "busy_timeout expects the timeout in milliseconds",
                    ));
                };
                let ms = c_int::try_from(ms).unwrap_or(c_int::MAX);
                let connection = self.handle()?.into_inner();
                let rc = unsafe { sqlite3_busy_timeout(connection, ms) };
                if rc != SQLITE_OK {
                    return Err(driver_error(connection, rc).into());
                }
                Ok(())
            }
            _ => Err(Error::msg(format!(
                "sqlite connection does not support `{}`",
                capability
            ))),
        }
    }
}
