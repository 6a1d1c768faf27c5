#[cfg(test)]
mod tests {
    use indoc::indoc;
    use simplesql_core::{
        Dialect, Direction, Filter, LeftJoin, Limit, Record, Select, SqlWriter, Value,
    };

    fn clean(sql: &str) -> String {
        sql.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn select_all() {
        let writer = SqlWriter::new(Dialect::MySql);
        let statement = writer.select(&Select::new("test"));
        assert_eq!(statement.sql, "SELECT * FROM `test`");
        assert!(statement.params.is_empty());

        let writer = SqlWriter::new(Dialect::Postgres);
        let statement = writer.select(&Select::new("test").fields(["id", "name"]));
        assert_eq!(statement.sql, r#"SELECT id,name FROM "test""#);
    }

    #[test]
    fn select_complete() {
        let writer = SqlWriter::new(Dialect::Sqlite);
        let statement = writer.select(
            &Select::new("test")
                .fields(["name"])
                .filter(("name LIKE %s AND id > %s", vec![Value::from("%Value%"), 1.into()]))
                .order(("name", Direction::Desc))
                .limit([5u64, 10]),
        );
        assert_eq!(
            statement.sql,
            clean(indoc! {"
                SELECT name FROM `test`
                WHERE name LIKE %s AND id > %s
                ORDER BY name DESC
                LIMIT 10 OFFSET 5
            "})
        );
        assert_eq!(
            statement.params,
            [Value::Varchar("%Value%".into()), Value::Int64(1)]
        );
    }

    #[test]
    fn limits() {
        let writer = SqlWriter::new(Dialect::MySql);
        let mut out = String::new();
        writer.write_limit(&mut out, &Limit::from([0u64, 1]));
        assert_eq!(out, "LIMIT 1 OFFSET 0");
        let mut out = String::new();
        writer.write_limit(&mut out, &Limit::from([5u64]));
        assert_eq!(out, "LIMIT 5");
        assert_eq!(Limit::from_slice(&[3]), Some(Limit::Count(3)));
        assert_eq!(
            Limit::from_slice(&[3, 4]),
            Some(Limit::Range {
                offset: 3,
                count: 4
            })
        );
        assert_eq!(Limit::from_slice(&[]), None);
        assert_eq!(Limit::from_slice(&[1, 2, 3]), None);
    }

    #[test]
    fn order_without_direction() {
        let writer = SqlWriter::new(Dialect::MySql);
        let statement = writer.select(&Select::new("test").order("id"));
        assert_eq!(statement.sql, "SELECT * FROM `test` ORDER BY id");
    }

    #[test]
    fn empty_filter_has_no_where() {
        let writer = SqlWriter::new(Dialect::MySql);
        let statement = writer.delete("test", &Filter::from("  "));
        assert_eq!(statement.sql, "DELETE FROM test");
        let statement = writer.delete("test", &Filter::none());
        assert_eq!(statement.sql, "DELETE FROM test");
    }

    #[test]
    fn blank_filter_binds_nothing() {
        let writer = SqlWriter::new(Dialect::Postgres);
        let blank = Filter::new(" ", [1]);
        let statement = writer.delete("test", &blank);
        assert_eq!(statement.sql, "DELETE FROM test");
        assert!(statement.params.is_empty());
        let statement = writer.select(&Select::new("test").filter(blank.clone()));
        assert!(statement.params.is_empty());
        let statement = writer.update("test", &Record::from([("name", "x")]), &blank);
        assert_eq!(statement.sql, "UPDATE test SET name=%s");
        assert_eq!(statement.params, [Value::from("x")]);
    }

    #[test]
    fn insert_follows_record_order() {
        let writer = SqlWriter::new(Dialect::MySql);
        let record = Record::new()
            .with("name", "Value 1")
            .with("id", 1)
            .with("note", None::<String>);
        let statement = writer.insert("test", &record);
        assert_eq!(
            statement.sql,
            "INSERT INTO test (name,id,note) VALUES(%s,%s,%s)"
        );
        assert_eq!(
            statement.params,
            [Value::from("Value 1"), Value::Int64(1), Value::Null]
        );
    }

    #[test]
    fn insert_batch_is_record_major() {
        let writer = SqlWriter::new(Dialect::Postgres);
        let records: Vec<Record> = (1..=3)
            .map(|i| {
                Record::new()
                    .with("id", i)
                    .with("name", format!("Value {}", i))
            })
            .collect();
        let statement = writer.insert_batch("test", &records);
        assert_eq!(
            statement.sql,
            "INSERT INTO test (id,name) VALUES (%s,%s),(%s,%s),(%s,%s)"
        );
        assert_eq!(statement.params.len(), 3 * 2);
        assert_eq!(
            statement.params,
            [
                Value::Int64(1),
                Value::from("Value 1"),
                Value::Int64(2),
                Value::from("Value 2"),
                Value::Int64(3),
                Value::from("Value 3"),
            ]
        );
        assert_eq!(writer.insert_batch("test", &[]).sql, "");
    }

    #[test]
    fn update_set_then_where() {
        let writer = SqlWriter::new(Dialect::Sqlite);
        let record = Record::from([("name", "New"), ("note", "n")]);
        let statement = writer.update("test", &record, &("id=%s", [3]).into());
        assert_eq!(statement.sql, "UPDATE test SET name=%s,note=%s WHERE id=%s");
        assert_eq!(
            statement.params,
            [Value::from("New"), Value::from("n"), Value::Int64(3)]
        );
    }

    #[test]
    fn insert_or_update_by_dialect() {
        let record = Record::new()
            .with("id", 7)
            .with("name", "Seven")
            .with("note", "x");

        let statement = SqlWriter::new(Dialect::MySql).insert_or_update("test", &record, &["id"]);
        assert_eq!(
            statement.sql,
            "INSERT INTO test (id,name,note) VALUES(%s,%s,%s) ON DUPLICATE KEY UPDATE name=%s,note=%s"
        );
        assert_eq!(
            statement.params,
            [
                Value::Int64(7),
                Value::from("Seven"),
                Value::from("x"),
                Value::from("Seven"),
                Value::from("x"),
            ]
        );

        for dialect in [Dialect::Postgres, Dialect::Sqlite] {
            let statement = SqlWriter::new(dialect).insert_or_update("test", &record, &["id"]);
            assert_eq!(
                statement.sql,
                "INSERT INTO test (id,name,note) VALUES(%s,%s,%s) ON CONFLICT (id) DO UPDATE SET name=%s,note=%s"
            );
            assert_eq!(statement.params.len(), 5);
        }
    }

    #[test]
    fn insert_or_update_only_keys() {
        let record = Record::from([("a", 1), ("b", 2)]);
        let statement =
            SqlWriter::new(Dialect::Postgres).insert_or_update("pairs", &record, &["a", "b"]);
        assert_eq!(
            statement.sql,
            "INSERT INTO pairs (a,b) VALUES(%s,%s) ON CONFLICT (a,b) DO NOTHING"
        );
        assert_eq!(statement.params, [Value::Int64(1), Value::Int64(2)]);
        let statement =
            SqlWriter::new(Dialect::MySql).insert_or_update("pairs", &record, &["a", "b"]);
        assert_eq!(
            statement.sql,
            "INSERT INTO pairs (a,b) VALUES(%s,%s) ON DUPLICATE KEY UPDATE a=a"
        );
    }

    #[test]
    fn left_join() {
        let writer = SqlWriter::new(Dialect::MySql);
        let statement = writer.left_join(
            &LeftJoin::new(("test", "test_tag"), (["id", "name"], ["tag"]), ("id", "test_id"))
                .filter(("test_tag.tag=%s", ["red"]))
                .order(("test.id", Direction::Asc))
                .limit(10u64),
        );
        assert_eq!(
            statement.sql,
            clean(indoc! {"
                SELECT test.id,test.name,test_tag.tag
                FROM test LEFT JOIN test_tag ON (test.id = test_tag.test_id)
                WHERE test_tag.tag=%s
                ORDER BY test.id ASC
                LIMIT 10
            "})
        );
        assert_eq!(statement.params, [Value::from("red")]);
    }

    #[test]
    fn statement_display_is_truncated() {
        let writer = SqlWriter::new(Dialect::MySql);
        let fields: Vec<String> = (0..200).map(|i| format!("column_{}", i)).collect();
        let statement = writer.select(&Select::new("wide").fields(fields));
        let printed = statement.to_string();
        assert!(statement.sql.len() > 500);
        assert_eq!(printed.len(), 500);
        assert!(printed.ends_with("..."));
    }
}
