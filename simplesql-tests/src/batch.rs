use crate::{Fixture, setup, teardown};
use indoc::formatdoc;
use simplesql::{Connection, Record, Select, SimpleSql, Value};

pub async fn batch<C: Connection>(db: &mut SimpleSql<C>, fixture: &Fixture) {
    setup(db).await;

    // Single
    let affected = db
        .insert(
            "test",
            &Record::new().with("id", 4).with("name", "Value 4"),
        )
        .await
        .expect("Failed to insert one row");
    assert_eq!(affected, 1);
    let row = db
        .get_one(Select::new("test").filter(("id=%s", [4])))
        .await
        .expect("Failed to query the inserted row")
        .expect("Failed to find the inserted row");
    assert_eq!(row["name"], Value::from("Value 4"));

    // Many
    let records: Vec<Record> = (10..15)
        .map(|i| {
            Record::new()
                .with("id", i)
                .with("name", format!("Batch {}", i))
        })
        .collect();
    let affected = db
        .insert_batch("test", &records)
        .await
        .expect("Failed to insert the batch");
    assert_eq!(affected, 5);
    let rows = db
        .get_all(Select::new("test").filter(("name LIKE %s", ["Batch%"])).order("id"))
        .await
        .expect("Failed to query the batch")
        .expect("Failed to find the batch");
    assert_eq!(
        rows.iter().map(|r| r["id"].as_i64()).collect::<Vec<_>>(),
        (10..15).map(Some).collect::<Vec<_>>()
    );

    // Null
    db.insert("test", &Record::new().with("id", 20).with("name", None::<String>))
        .await
        .expect("Failed to insert a null name");
    let row = db
        .get_one(Select::new("test").filter("name IS NULL"))
        .await
        .expect("Failed to query the null name")
        .expect("Failed to find the null name");
    assert!(row["name"].is_null());

    // Generated ids
    teardown(db, "numbered").await;
    db.query(
        &formatdoc! {"
            CREATE TABLE numbered (
                id {},
                label VARCHAR(64)
            )
        ", fixture.serial_key},
        &[],
    )
    .await
    .expect("Failed to create the numbered table");
    db.insert("numbered", &Record::from([("label", "first")]))
        .await
        .expect("Failed to insert the first numbered row");
    db.insert("numbered", &Record::from([("label", "second")]))
        .await
        .expect("Failed to insert the second numbered row");
    if fixture.last_insert_id {
        assert_eq!(db.last_id(), Some(2));
    }
    let row = db
        .get_one(Select::new("numbered").filter(("label=%s", ["second"])))
        .await
        .expect("Failed to query the second numbered row")
        .expect("Failed to find the second numbered row");
    assert_eq!(row["id"].as_i64(), Some(2));
    teardown(db, "numbered").await;

    teardown(db, "test").await;
}
