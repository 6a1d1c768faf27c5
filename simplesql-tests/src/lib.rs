mod batch;
mod join;
mod raw;
mod simple;
mod upsert;

use crate::{batch::batch, join::left_join, raw::raw, simple::simple, upsert::upsert};
use log::LevelFilter;
use simplesql::{Connection, SimpleSql};
use std::env;

/// Backend specific pieces of the shared suite.
#[derive(Debug, Clone, Copy)]
pub struct Fixture {
    /// Column definition of an integer primary key generated by the database.
    pub serial_key: &'static str,
    /// Whether the connection reports the id generated by an insert.
    pub last_insert_id: bool,
}

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

pub async fn execute_tests<C: Connection>(mut db: SimpleSql<C>, fixture: Fixture) {
    simple(&mut db).await;
    batch(&mut db, &fixture).await;
    upsert(&mut db).await;
    left_join(&mut db).await;
    raw(&mut db).await;
    assert!(db.is_open());
    db.end().await.expect("Failed to close the connection");
}

/// Creates `test` with the three rows every case starts from.
pub(crate) async fn setup<C: Connection>(db: &mut SimpleSql<C>) {
    teardown(db, "test").await;
    db.query(
        "CREATE TABLE test (id INTEGER PRIMARY KEY, name VARCHAR(255))",
        &[],
    )
    .await
    .expect("Failed to create the test table");
    db.query(
        "INSERT INTO test (id, name) VALUES (1, 'Value 1'), (2, 'Value 2'), (3, 'Do not look at me')",
        &[],
    )
    .await
    .expect("Failed to fill the test table");
}

pub(crate) async fn teardown<C: Connection>(db: &mut SimpleSql<C>, table: &str) {
    let sql = format!("DROP TABLE IF EXISTS {}", db.dialect().quote(table));
    db.query(&sql, &[])
        .await
        .expect("Failed to drop the table");
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        let result = { $($code)+ };
        log::set_max_level(level);
        result
    }};
}
