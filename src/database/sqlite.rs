use async_trait::async_trait;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqlitePoolOptions};
use sqlx::{Row, Sqlite, SqlitePool};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::database::{
    DatabaseConfig, DatabaseConnection, DatabaseError, DatabaseResult, DatabaseRow, DatabaseType,
    DatabaseValue,
};

/// SQLite implementation of the database connection interface
pub struct SqliteConnection {
    pool: Arc<SqlitePool>,
}

impl SqliteConnection {
    /// Create a new SQLite connection from a configuration
    pub async fn connect(config: &DatabaseConfig) -> DatabaseResult<Self> {
        let database_url = build_sqlite_connection_string(config)?;

        // Ensure the directory exists if file-based
        if config.database != ":memory:" && !config.database.starts_with("file:") {
            if let Some(parent) = Path::new(&config.database).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        DatabaseError::Connection(format!(
                            "Failed to create directory for SQLite database: {}",
                            e
                        ))
                    })?;
                }
            }
        }

        let pool_options = SqlitePoolOptions::new()
            .max_connections(config.pool.max_connections)
            .min_connections(config.pool.min_connections)
            .idle_timeout(Duration::from_secs(config.pool.idle_timeout_seconds))
            .max_lifetime(Duration::from_secs(config.pool.max_lifetime_seconds))
            .acquire_timeout(Duration::from_secs(config.pool.acquire_timeout_seconds));

        debug!(url = %database_url, "opening sqlite pool");
        let pool = pool_options
            .connect(&database_url)
            .await
            .map_err(|e| DatabaseError::Connection(e.to_string()))?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

/// Convert a DatabaseConfig to a SQLite connection string
pub(crate) fn build_sqlite_connection_string(config: &DatabaseConfig) -> DatabaseResult<String> {
    let database = &config.database;
    if database.is_empty() {
        return Err(DatabaseError::Configuration(
            "SQLite database path must not be empty".to_string(),
        ));
    }

    let mut connection_string = if database == ":memory:" {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite:{}", database)
    };

    let mut param_added = false;
    for (key, value) in &config.extra_params {
        if !param_added {
            connection_string.push('?');
            param_added = true;
        } else {
            connection_string.push('&');
        }
        connection_string.push_str(&format!("{}={}", key, value));
    }

    Ok(connection_string)
}

/// Build a query and bind every parameter in order.
fn bind_params<'q>(
    query: &'q str,
    params: &'q [DatabaseValue],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    let mut query_builder = sqlx::query(query);
    for param in params {
        query_builder = match param {
            DatabaseValue::Null => query_builder.bind(None::<String>),
            DatabaseValue::Boolean(b) => query_builder.bind(*b),
            DatabaseValue::Integer(i) => query_builder.bind(*i),
            DatabaseValue::Float(f) => query_builder.bind(*f),
            DatabaseValue::Text(s) => query_builder.bind(s.as_str()),
            DatabaseValue::Blob(b) => query_builder.bind(b.as_slice()),
        };
    }
    query_builder
}

/// SQLite implementation of the database row interface
pub struct SqliteRow {
    row: sqlx::sqlite::SqliteRow,
}

impl DatabaseRow for SqliteRow {
    fn get_string(&self, column: &str) -> DatabaseResult<String> {
        self.row.try_get(column).map_err(|e| {
            DatabaseError::Query(format!("Failed to get string column {}: {}", column, e))
        })
    }

    fn get_i64(&self, column: &str) -> DatabaseResult<i64> {
        self.row.try_get(column).map_err(|e| {
            DatabaseError::Query(format!("Failed to get i64 column {}: {}", column, e))
        })
    }

    fn try_get_string(&self, column: &str) -> DatabaseResult<Option<String>> {
        match self.row.try_get::<Option<String>, _>(column) {
            Ok(value) => Ok(value),
            Err(sqlx::Error::ColumnNotFound(_)) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!(
                "Failed to get string column {}: {}",
                column, e
            ))),
        }
    }

    fn try_get_i64(&self, column: &str) -> DatabaseResult<Option<i64>> {
        match self.row.try_get::<Option<i64>, _>(column) {
            Ok(value) => Ok(value),
            Err(sqlx::Error::ColumnNotFound(_)) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!(
                "Failed to get i64 column {}: {}",
                column, e
            ))),
        }
    }
}

#[async_trait]
impl DatabaseConnection for SqliteConnection {
    async fn execute(&self, query: &str, params: &[DatabaseValue]) -> DatabaseResult<u64> {
        let result = bind_params(query, params)
            .execute(&*self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn query(
        &self,
        query: &str,
        params: &[DatabaseValue],
    ) -> DatabaseResult<Vec<Box<dyn DatabaseRow>>> {
        let rows = bind_params(query, params)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| Box::new(SqliteRow { row }) as Box<dyn DatabaseRow>)
            .collect())
    }

    async fn query_one(
        &self,
        query: &str,
        params: &[DatabaseValue],
    ) -> DatabaseResult<Option<Box<dyn DatabaseRow>>> {
        let row = bind_params(query, params)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| DatabaseError::Query(e.to_string()))?;

        Ok(row.map(|r| Box::new(SqliteRow { row: r }) as Box<dyn DatabaseRow>))
    }

    fn get_database_type(&self) -> DatabaseType {
        DatabaseType::Sqlite
    }

    async fn ping(&self) -> DatabaseResult<()> {
        sqlx::query("SELECT 1")
            .execute(&*self.pool)
            .await
            .map_err(|e| DatabaseError::Connection(format!("Failed to ping database: {}", e)))?;

        Ok(())
    }

    async fn close(&self) -> DatabaseResult<()> {
        self.pool.close().await;
        Ok(())
    }
}
