use crate::{setup, teardown};
use simplesql::{Connection, Direction, Select, SimpleSql};

pub async fn simple<C: Connection>(db: &mut SimpleSql<C>) {
    setup(db).await;

    // One
    let row = db
        .get_one(Select::new("test").filter(("id=%s", [2])))
        .await
        .expect("Failed to query the second row")
        .expect("Failed to find the second row");
    assert_eq!(row["name"].as_str(), Some("Value 2"));
    assert_eq!(row["id"].as_i64(), Some(2));
    let row = db
        .get_one(Select::new("test").fields(["name"]).order(("id", Direction::Desc)))
        .await
        .expect("Failed to query the last row")
        .expect("Failed to find the last row");
    assert_eq!(row.len(), 1);
    assert_eq!(row["name"].as_str(), Some("Do not look at me"));
    let missing = db
        .get_one(Select::new("test").filter(("id=%s", [42])))
        .await
        .expect("Failed to query a missing row");
    assert!(missing.is_none());

    // All
    let rows = db
        .get_all(Select::new("test").filter(("name LIKE %s", ["%Value%"])))
        .await
        .expect("Failed to query the values")
        .expect("Failed to find the values");
    assert_eq!(rows.len(), 2);
    let rows = db
        .get_all(
            Select::new("test")
                .filter(("name LIKE %s", ["%Value%"]))
                .order(("name", Direction::Asc)),
        )
        .await
        .expect("Failed to query the ordered values")
        .expect("Failed to find the ordered values");
    assert_eq!(rows[0]["name"].as_str(), Some("Value 1"));
    assert_eq!(rows[1]["name"].as_str(), Some("Value 2"));

    // Limits
    let rows = db
        .get_all(Select::new("test").order("id").limit([1u64, 2]))
        .await
        .expect("Failed to query with offset")
        .expect("Failed to find rows with offset");
    assert_eq!(
        rows.iter().map(|r| r["id"].as_i64()).collect::<Vec<_>>(),
        [Some(2), Some(3)]
    );
    let rows = db
        .get_all(Select::new("test").order("id").limit(1u64))
        .await
        .expect("Failed to query with limit")
        .expect("Failed to find rows with limit");
    assert_eq!(rows.len(), 1);

    // Delete
    let affected = db
        .delete("test", ("name LIKE %s", ["%Do not look%"]))
        .await
        .expect("Failed to delete the third row");
    assert_eq!(affected, 1);
    let rows = db
        .get_all(Select::new("test").filter(("id=%s", [3])))
        .await
        .expect("Failed to query the deleted row");
    assert_eq!(rows, None);
    let affected = db
        .delete("test", ())
        .await
        .expect("Failed to delete everything");
    assert_eq!(affected, 2);
    assert_eq!(
        db.get_all("test")
            .await
            .expect("Failed to query the empty table"),
        None
    );

    teardown(db, "test").await;
}
