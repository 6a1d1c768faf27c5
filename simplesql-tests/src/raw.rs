use crate::{setup, silent_logs, teardown};
use simplesql::{Connection, DriverError, SimpleSql, Value};

pub async fn raw<C: Connection>(db: &mut SimpleSql<C>) {
    setup(db).await;

    let mut cursor = db
        .query("SELECT SUM(id) AS total FROM test WHERE id < %s", &[10.into()])
        .await
        .expect("Failed to sum the ids");
    let row = cursor.fetch_one().expect("Failed to fetch the sum");
    assert_eq!(row["total"].as_i64(), Some(6));
    assert!(cursor.fetch_one().is_none());
    assert!(
        db.last_query()
            .is_some_and(|v| v.starts_with("SELECT SUM(id) AS total FROM test WHERE id < "))
    );

    let mut cursor = db
        .query(
            "SELECT name FROM test WHERE name LIKE %s ORDER BY id",
            &[Value::from("Value%")],
        )
        .await
        .expect("Failed to select the names");
    assert_eq!(&cursor.labels()[..], ["name".to_string()]);
    let names = cursor
        .fetch_all()
        .into_iter()
        .map(|r| r[0].as_str().map(ToString::to_string))
        .collect::<Vec<_>>();
    assert_eq!(
        names,
        [Some("Value 1".to_string()), Some("Value 2".to_string())]
    );

    let cursor = db
        .query("UPDATE test SET name = %s WHERE id > %s", &["x".into(), 1.into()])
        .await
        .expect("Failed to update");
    assert_eq!(cursor.rows_affected(), 2);
    db.commit().await.expect("Failed to commit");

    // Errors keep the driver failure
    let error = silent_logs! {
        db.query("SELECT * FROM missing_table", &[])
            .await
            .expect_err("Querying a missing table must fail")
    };
    assert!(DriverError::find(&error).is_some());
    assert!(db.is_open());

    teardown(db, "test").await;
}
