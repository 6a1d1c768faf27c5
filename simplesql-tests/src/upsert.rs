use crate::{setup, teardown};
use simplesql::{Connection, Record, Select, SimpleSql};

pub async fn upsert<C: Connection>(db: &mut SimpleSql<C>) {
    setup(db).await;

    // Update
    let affected = db
        .update(
            "test",
            &Record::from([("name", "Renamed")]),
            ("id=%s OR id=%s", [1, 2]),
        )
        .await
        .expect("Failed to update");
    assert_eq!(affected, 2);
    let rows = db
        .get_all(Select::new("test").filter(("name=%s", ["Renamed"])))
        .await
        .expect("Failed to query the renamed rows")
        .expect("Failed to find the renamed rows");
    assert_eq!(rows.len(), 2);

    // Existing key
    let affected = db
        .insert_or_update(
            "test",
            &Record::new().with("id", 3).with("name", "Now look at me"),
            &["id"],
        )
        .await
        .expect("Failed to upsert an existing row");
    assert!(affected > 0);
    let row = db
        .get_one(Select::new("test").filter(("id=%s", [3])))
        .await
        .expect("Failed to query the upserted row")
        .expect("Failed to find the upserted row");
    assert_eq!(row["name"].as_str(), Some("Now look at me"));

    // New key
    let affected = db
        .insert_or_update(
            "test",
            &Record::new().with("id", 30).with("name", "Thirty"),
            &["id"],
        )
        .await
        .expect("Failed to upsert a new row");
    assert_eq!(affected, 1);
    let row = db
        .get_one(Select::new("test").filter(("id=%s", [30])))
        .await
        .expect("Failed to query the new row")
        .expect("Failed to find the new row");
    assert_eq!(row["name"].as_str(), Some("Thirty"));

    teardown(db, "test").await;
}
