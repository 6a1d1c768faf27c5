#[cfg(test)]
mod tests {
    use simplesql_core::{
        Connection, ConnectionFactory, Cursor, Dialect, DriverError, ErrorKind, Failure, Filter,
        LeftJoin, Logger, Record, Result, Row, SERVER_GONE_ERROR, Select, SimpleSql, Value,
    };
    use std::{
        borrow::Cow,
        collections::VecDeque,
        sync::{
            Arc, Mutex,
            atomic::{AtomicUsize, Ordering},
        },
    };

    /// What the scripted connection answers to the next statement.
    enum Reply {
        Rows(Vec<Vec<Value>>),
        Affected(u64, Option<u64>),
        Fail(DriverError),
    }

    /// Shared between the test and every connection the factory builds.
    #[derive(Default)]
    struct Script {
        replies: Mutex<VecDeque<Reply>>,
        executed: Mutex<Vec<(String, Vec<Value>)>>,
        invoked: Mutex<Vec<(String, Vec<Value>)>>,
        connects: AtomicUsize,
        closes: AtomicUsize,
    }

    impl Script {
        fn push(&self, reply: Reply) -> &Self {
            self.replies.lock().unwrap().push_back(reply);
            self
        }
        fn executed(&self) -> Vec<(String, Vec<Value>)> {
            self.executed.lock().unwrap().clone()
        }
        fn connects(&self) -> usize {
            self.connects.load(Ordering::SeqCst)
        }
        fn closes(&self) -> usize {
            self.closes.load(Ordering::SeqCst)
        }
    }

    struct ScriptedConnection {
        script: Arc<Script>,
        open: bool,
    }

    impl Connection for ScriptedConnection {
        const NAME: &'static str = "scripted";
        const DIALECT: Dialect = Dialect::Sqlite;

        async fn connect(url: Cow<'static, str>) -> Result<Self> {
            Err(DriverError::operational(None, format!("Cannot connect to {}", url)).into())
        }

        async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<Cursor> {
            self.script
                .executed
                .lock()
                .unwrap()
                .push((sql.to_string(), params.to_vec()));
            let reply = self.script.replies.lock().unwrap().pop_front();
            match reply {
                Some(Reply::Rows(rows)) => {
                    let labels: Arc<[String]> = ["id".to_string(), "name".to_string()].into();
                    let rows = rows
                        .into_iter()
                        .map(|v| Row::new(labels.clone(), v.into()))
                        .collect();
                    Ok(Cursor::with_rows(sql, labels, rows))
                }
                Some(Reply::Affected(n, id)) => Ok(Cursor::affected(sql, n, id)),
                Some(Reply::Fail(e)) => Err(e.into()),
                None => Ok(Cursor::affected(sql, 0, None)),
            }
        }

        async fn commit(&mut self) -> Result<()> {
            Ok(())
        }

        fn is_open(&self) -> bool {
            self.open
        }

        async fn close(self) -> Result<()> {
            self.script.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn capabilities() -> &'static [&'static str] {
            &["busy_timeout"]
        }

        async fn invoke(&mut self, capability: &str, args: &[Value]) -> Result<()> {
            self.script
                .invoked
                .lock()
                .unwrap()
                .push((capability.to_string(), args.to_vec()));
            Ok(())
        }
    }

    fn factory(script: &Arc<Script>) -> ConnectionFactory<ScriptedConnection> {
        let script = script.clone();
        ConnectionFactory::new(move || {
            let script = script.clone();
            async move {
                script.connects.fetch_add(1, Ordering::SeqCst);
                Ok(ScriptedConnection { script, open: true })
            }
        })
    }

    async fn database(
        script: &Arc<Script>,
        dialect: Dialect,
    ) -> SimpleSql<ScriptedConnection> {
        SimpleSql::builder(factory(script))
            .dialect(dialect)
            .logger(Logger::global())
            .connect()
            .await
            .expect("Scripted connection never fails")
    }

    fn gone() -> DriverError {
        DriverError::operational(Some(SERVER_GONE_ERROR), "MySQL server has gone away")
    }

    #[tokio::test]
    async fn placeholders_are_adapted() {
        let script = Arc::new(Script::default());
        let mut db = database(&script, Dialect::Sqlite).await;
        let cursor = db
            .query("SELECT %s, %s", &[1.into(), "a".into()])
            .await
            .expect("Query succeeds");
        assert_eq!(cursor.statement(), "SELECT ?, ?");
        assert_eq!(db.last_query(), Some("SELECT ?, ?"));
        assert_eq!(
            script.executed(),
            [("SELECT ?, ?".to_string(), vec![Value::Int64(1), "a".into()])]
        );
    }

    #[tokio::test]
    async fn reconnects_once_and_retries() {
        let script = Arc::new(Script::default());
        let mut db = database(&script, Dialect::MySql).await;
        script
            .push(Reply::Fail(gone()))
            .push(Reply::Affected(1, Some(42)));
        let affected = db
            .insert("test", &Record::new().with("id", 42).with("name", "x"))
            .await
            .expect("Retry succeeds");
        assert_eq!(affected, 1);
        assert_eq!(db.last_id(), Some(42));
        assert_eq!(script.connects(), 2);
        script.push(Reply::Rows(vec![vec![42.into(), "x".into()]]));
        db.get_one("test").await.expect("Query succeeds");
        assert_eq!(db.last_id(), Some(42));
        assert_eq!(script.closes(), 1);
        let executed = script.executed();
        assert_eq!(executed.len(), 2);
        assert_eq!(executed[0], executed[1]);
    }

    #[tokio::test]
    async fn second_failure_propagates() {
        let script = Arc::new(Script::default());
        let mut db = database(&script, Dialect::MySql).await;
        script.push(Reply::Fail(gone())).push(Reply::Fail(gone()));
        let error = db
            .delete("test", ("id=%s", [1]))
            .await
            .expect_err("Both attempts fail");
        assert!(matches!(
            Failure::find(&error),
            Some(Failure::ReconnectExhausted { .. })
        ));
        assert_eq!(
            DriverError::find(&error).map(|e| e.code),
            Some(Some(SERVER_GONE_ERROR))
        );
        assert_eq!(script.connects(), 2);
        assert_eq!(script.executed().len(), 2);
    }

    #[tokio::test]
    async fn not_reconnectable_propagates_immediately() {
        let script = Arc::new(Script::default());
        let mut db = database(&script, Dialect::MySql).await;
        script.push(Reply::Fail(DriverError::new(
            ErrorKind::Programming,
            Some(1064),
            "You have an error in your SQL syntax",
        )));
        let error = db
            .get_all("test")
            .await
            .expect_err("Syntax errors are not retried");
        assert!(matches!(
            Failure::find(&error),
            Some(Failure::StatementFailed { .. })
        ));
        assert_eq!(
            DriverError::find(&error).map(|e| e.kind),
            Some(ErrorKind::Programming)
        );
        assert_eq!(script.connects(), 1);
        assert_eq!(script.executed().len(), 1);
    }

    #[tokio::test]
    async fn sqlite_reconnects_on_any_failure() {
        let script = Arc::new(Script::default());
        let mut db = database(&script, Dialect::Sqlite).await;
        script
            .push(Reply::Fail(DriverError::programming(None, "no such table")))
            .push(Reply::Rows(vec![vec![1.into(), "Value 1".into()]]));
        let row = db.get_one("test").await.expect("Retry succeeds");
        assert!(row.is_some());
        assert_eq!(script.connects(), 2);
    }

    #[tokio::test]
    async fn get_one_limits_to_first_row() {
        let script = Arc::new(Script::default());
        let mut db = database(&script, Dialect::Sqlite).await;
        script.push(Reply::Rows(vec![vec![2.into(), "Value 2".into()]]));
        let row = db
            .get_one(Select::new("test").filter(("id=%s", [2])))
            .await
            .expect("Query succeeds")
            .expect("One row");
        assert_eq!(row["name"].as_str(), Some("Value 2"));
        assert_eq!(
            script.executed()[0],
            (
                "SELECT * FROM `test` WHERE id=? LIMIT 1 OFFSET 0".to_string(),
                vec![Value::Int64(2)]
            )
        );
        assert_eq!(db.get_one("test").await.expect("Query succeeds"), None);
    }

    #[tokio::test]
    async fn empty_results_are_none() {
        let script = Arc::new(Script::default());
        let mut db = database(&script, Dialect::Postgres).await;
        script.push(Reply::Rows(vec![]));
        assert_eq!(db.get_all("test").await.expect("Query succeeds"), None);
        script.push(Reply::Rows(vec![]));
        let join = LeftJoin::new(("test", "test_tag"), (["id"], ["tag"]), ("id", "test_id"));
        assert_eq!(db.left_join(join).await.expect("Query succeeds"), None);
        script.push(Reply::Rows(vec![
            vec![1.into(), "a".into()],
            vec![2.into(), "b".into()],
        ]));
        let rows = db
            .get_all(Select::new("test").order("id"))
            .await
            .expect("Query succeeds")
            .expect("Two rows");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["id"], Value::Int64(2));
    }

    #[tokio::test]
    async fn update_params_order() {
        let script = Arc::new(Script::default());
        let mut db = database(&script, Dialect::Postgres).await;
        script.push(Reply::Affected(2, None));
        let affected = db
            .update(
                "test",
                &Record::from([("name", "z")]),
                Filter::new("id>%s", [0]),
            )
            .await
            .expect("Update succeeds");
        assert_eq!(affected, 2);
        assert_eq!(
            script.executed()[0],
            (
                "UPDATE test SET name=%s WHERE id>%s".to_string(),
                vec![Value::from("z"), Value::Int64(0)]
            )
        );
    }

    #[tokio::test]
    async fn invalid_arguments() {
        let script = Arc::new(Script::default());
        let mut db = database(&script, Dialect::Sqlite).await;
        assert!(db.insert_batch("test", &[]).await.is_err());
        assert!(db.insert("test", &Record::new()).await.is_err());
        assert!(
            db.insert_or_update("test", &Record::from([("name", "x")]), &["id"])
                .await
                .is_err()
        );
        assert!(
            db.insert_or_update("test", &Record::from([("id", 1), ("n", 2)]), &[])
                .await
                .is_err()
        );
        assert!(
            db.update("test", &Record::new(), Filter::none())
                .await
                .is_err()
        );
        assert!(script.executed().is_empty());
        assert_eq!(script.connects(), 1);
    }

    #[tokio::test]
    async fn post_connect_actions() {
        let script = Arc::new(Script::default());
        let factory = factory(&script)
            .post_connect("busy_timeout", [5000])
            .post_connect("autocommit", [true]);
        let mut db = SimpleSql::builder(factory)
            .logger(Logger::global())
            .connect()
            .await
            .expect("Scripted connection never fails");
        assert_eq!(db.dialect(), Dialect::Sqlite);
        db.reconnect().await.expect("Reconnect succeeds");
        assert!(db.connection().is_open());
        db.connection()
            .invoke("busy_timeout", &[Value::Int64(100)])
            .await
            .expect("Direct invoke succeeds");
        let invoked = script.invoked.lock().unwrap().clone();
        assert_eq!(
            invoked,
            [
                ("busy_timeout".to_string(), vec![Value::Int64(5000)]),
                ("busy_timeout".to_string(), vec![Value::Int64(5000)]),
                ("busy_timeout".to_string(), vec![Value::Int64(100)]),
            ]
        );
    }

    #[tokio::test]
    async fn connect_failure() {
        let result = SimpleSql::<ScriptedConnection>::builder(ConnectionFactory::from_url(
            "scripted://nowhere",
        ))
        .logger(Logger::global())
        .connect()
        .await;
        let Err(error) = result else {
            panic!("Connecting must fail");
        };
        assert_eq!(Failure::find(&error), Some(&Failure::ConnectFailed));
    }

    #[tokio::test]
    async fn scope_closes_connection() {
        let script = Arc::new(Script::default());
        let db = database(&script, Dialect::Sqlite).await;
        script.push(Reply::Affected(3, None));
        let affected = db
            .scope(async |db| {
                assert!(db.is_open());
                db.commit().await?;
                db.delete("test", ()).await
            })
            .await
            .expect("Scope succeeds");
        assert_eq!(affected, 3);
        assert_eq!(script.closes(), 1);
        assert_eq!(script.executed()[0].0, "DELETE FROM test");

        let db = database(&script, Dialect::Sqlite).await;
        script.push(Reply::Fail(DriverError::programming(None, "boom")));
        script.push(Reply::Fail(DriverError::programming(None, "boom")));
        let result = db.scope(async |db| db.delete("test", ()).await).await;
        assert!(result.is_err());
        assert_eq!(script.closes(), 3);
    }
}
