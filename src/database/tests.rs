// Unit tests for the database module
use super::*;

#[test]
fn test_database_type_display() {
    assert_eq!(DatabaseType::Postgres.to_string(), "postgres");
    assert_eq!(DatabaseType::MySql.to_string(), "mysql");
    assert_eq!(DatabaseType::Sqlite.to_string(), "sqlite");
}

#[test]
fn test_pool_config_defaults() {
    let config = PoolConfig::default();
    assert_eq!(config.max_connections, 10);
    assert_eq!(config.min_connections, 2);
    assert_eq!(config.idle_timeout_seconds, 300);
    assert_eq!(config.max_lifetime_seconds, 1800);
    assert_eq!(config.acquire_timeout_seconds, 30);
}

#[test]
fn test_database_config_from_toml_uses_defaults() {
    let config: DatabaseConfig = toml::from_str(
        r#"
        db_type = "sqlite"
        database = "/tmp/reflect.db"
        host = "ignored.example"

        [extra_params]
        mode = "ro"
        "#,
    )
    .unwrap();

    assert_eq!(config.db_type, DatabaseType::Sqlite);
    assert_eq!(config.database, "/tmp/reflect.db");
    assert_eq!(config.pool.max_connections, 10);
    assert_eq!(config.extra_params.get("mode"), Some(&"ro".to_string()));
}

#[test]
fn test_sqlite_config_helper() {
    let config = extensions::sqlite_config("data/app.db");
    assert_eq!(config.db_type, DatabaseType::Sqlite);
    assert_eq!(config.database, "data/app.db");
    assert!(config.extra_params.is_empty());
}

#[tokio::test]
async fn test_unsupported_driver_is_configuration_error() {
    let config = DatabaseConfig {
        db_type: DatabaseType::Postgres,
        database: "app".to_string(),
        ..Default::default()
    };

    match create_database_connection(&config).await {
        Err(DatabaseError::Configuration(msg)) => assert!(msg.contains("postgres")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("postgres connections should not be available"),
    }
}

#[cfg(feature = "sqlite")]
mod sqlite_tests {
    use super::*;
    use crate::database::sqlite::build_sqlite_connection_string;

    fn file_config(dir: &tempfile::TempDir) -> DatabaseConfig {
        let mut config =
            extensions::sqlite_config(dir.path().join("test.db").to_string_lossy().to_string());
        config.pool.max_connections = 1;
        config.pool.min_connections = 1;
        config
            .extra_params
            .insert("mode".to_string(), "rwc".to_string());
        config
    }

    #[test]
    fn test_connection_string() {
        let memory = DatabaseConfig::default();
        assert_eq!(
            build_sqlite_connection_string(&memory).unwrap(),
            "sqlite::memory:"
        );

        let mut file = extensions::sqlite_config("/var/db/app.db");
        file.extra_params
            .insert("mode".to_string(), "rwc".to_string());
        file.extra_params
            .insert("cache".to_string(), "shared".to_string());
        assert_eq!(
            build_sqlite_connection_string(&file).unwrap(),
            "sqlite:/var/db/app.db?cache=shared&mode=rwc"
        );

        let empty = extensions::sqlite_config("");
        assert!(matches!(
            build_sqlite_connection_string(&empty),
            Err(DatabaseError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_execute_and_query_with_params() {
        let dir = tempfile::tempdir().unwrap();
        let conn = create_database_connection(&file_config(&dir)).await.unwrap();
        assert_eq!(conn.get_database_type(), DatabaseType::Sqlite);
        conn.ping().await.unwrap();

        conn.execute("CREATE TABLE notes (id INTEGER PRIMARY KEY, body TEXT)", &[])
            .await
            .unwrap();
        let inserted = conn
            .execute(
                "INSERT INTO notes (id, body) VALUES (?, ?), (?, ?)",
                &[
                    DatabaseValue::Integer(1),
                    DatabaseValue::Text("first".to_string()),
                    DatabaseValue::Integer(2),
                    DatabaseValue::Null,
                ],
            )
            .await
            .unwrap();
        assert_eq!(inserted, 2);

        let rows = conn
            .query("SELECT id, body FROM notes ORDER BY id", &[])
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get_i64("id").unwrap(), 1);
        assert_eq!(rows[0].get_string("body").unwrap(), "first");
        assert_eq!(rows[1].try_get_string("body").unwrap(), None);
        assert_eq!(rows[1].try_get_string("missing").unwrap(), None);
        assert_eq!(rows[1].try_get_i64("id").unwrap(), Some(2));

        let one = conn
            .query_one(
                "SELECT body FROM notes WHERE id = ?",
                &[DatabaseValue::Integer(1)],
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(one.get_string("body").unwrap(), "first");

        let none = conn
            .query_one(
                "SELECT body FROM notes WHERE id = ?",
                &[DatabaseValue::Integer(42)],
            )
            .await
            .unwrap();
        assert!(none.is_none());

        conn.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_bad_sql_is_query_error() {
        let dir = tempfile::tempdir().unwrap();
        let conn = create_database_connection(&file_config(&dir)).await.unwrap();
        let err = conn.query("SELECT * FROM nowhere", &[]).await.err().unwrap();
        assert!(matches!(err, DatabaseError::Query(_)));
    }
}
