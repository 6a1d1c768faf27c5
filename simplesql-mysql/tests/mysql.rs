
#[cfg(test)]
mod tests {
    use super::init::init;
    use simplesql::{Connection, ConnectionFactory, SimpleSql};
    use simplesql_mysql::MySqlConnection;
    use simplesql_tests::{Fixture, execute_tests, init_logs, silent_logs};
    use std::sync::Mutex;

    static MUTEX: Mutex<()> = Mutex::new(());

    #[tokio::test]
    async fn mysql() {
        init_logs();
        let _guard = MUTEX.lock().unwrap();
        let Some((url, container)) = init().await else {
            return;
        };
        let error_msg = format!("Could not connect to `{url}`");
        let factory =
            ConnectionFactory::<MySqlConnection>::from_url(url).post_connect("autocommit", [true]);
        let db = SimpleSql::new(factory).await.expect(&error_msg);
        execute_tests(
            db,
            Fixture {
                serial_key: "INTEGER PRIMARY KEY AUTO_INCREMENT",
                last_insert_id: true,
            },
        )
        .await;
        drop(container);
    }

    #[tokio::test]
    async fn wrong_url() {
        silent_logs! {
            assert!(
                MySqlConnection::connect("postgres://some_url".into())
                    .await
                    .is_err()
            );
        }
    }
}
