use crate::{setup, teardown};
use simplesql::{Connection, Direction, LeftJoin, Record, SimpleSql};

pub async fn left_join<C: Connection>(db: &mut SimpleSql<C>) {
    setup(db).await;
    teardown(db, "test_tag").await;
    db.query(
        "CREATE TABLE test_tag (test_id INTEGER, tag VARCHAR(64))",
        &[],
    )
    .await
    .expect("Failed to create the test_tag table");
    db.insert_batch(
        "test_tag",
        &[
            Record::new().with("test_id", 1).with("tag", "red"),
            Record::new().with("test_id", 1).with("tag", "green"),
            Record::new().with("test_id", 3).with("tag", "blue"),
        ],
    )
    .await
    .expect("Failed to insert the tags");

    let join = || {
        LeftJoin::new(("test", "test_tag"), (["id", "name"], ["tag"]), ("id", "test_id"))
    };

    // Every row of the left table
    let rows = db
        .left_join(join().order(("test.id", Direction::Asc)))
        .await
        .expect("Failed to left join")
        .expect("Failed to find joined rows");
    assert_eq!(rows.len(), 4);
    let untagged = rows
        .iter()
        .find(|r| r[0].as_i64() == Some(2))
        .expect("The row without tags is kept");
    assert!(untagged[2].is_null());

    // Filtered
    let rows = db
        .left_join(join().filter(("test_tag.tag=%s", ["blue"])))
        .await
        .expect("Failed to filter the join")
        .expect("Failed to find the blue row");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][1].as_str(), Some("Do not look at me"));

    // Limited
    let rows = db
        .left_join(join().order(("test.id", Direction::Desc)).limit(1u64))
        .await
        .expect("Failed to limit the join")
        .expect("Failed to find the last row");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0].as_i64(), Some(3));

    // Nothing
    let rows = db
        .left_join(join().filter(("test_tag.tag=%s", ["purple"])))
        .await
        .expect("Failed to query a missing tag");
    assert_eq!(rows, None);

    teardown(db, "test_tag").await;
    teardown(db, "test").await;
}
