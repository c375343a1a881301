use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use thiserror::Error;

/// Error type for database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Connection error
    #[error("connection error: {0}")]
    Connection(String),

    /// Query error
    #[error("query error: {0}")]
    Query(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type for database operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Supported database types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// PostgreSQL database
    Postgres,
    /// MySQL database
    MySql,
    /// SQLite database
    Sqlite,
}

impl Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseType::Postgres => write!(f, "postgres"),
            DatabaseType::MySql => write!(f, "mysql"),
            DatabaseType::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Database configuration for establishing connections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Type of database to connect to
    pub db_type: DatabaseType,

    /// Database file path, or `:memory:`
    pub database: String,

    /// Connection pool settings
    #[serde(default)]
    pub pool: PoolConfig,

    /// Additional connection parameters as key-value pairs
    #[serde(default)]
    pub extra_params: std::collections::BTreeMap<String, String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        // Default to SQLite in-memory database
        Self {
            db_type: DatabaseType::Sqlite,
            database: ":memory:".to_string(),
            pool: PoolConfig::default(),
            extra_params: std::collections::BTreeMap::new(),
        }
    }
}

/// Configuration for connection pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of connections to maintain
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection idle timeout
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,

    /// Connection max lifetime
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_seconds: u64,

    /// Connection acquisition timeout
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
}

fn default_max_connections() -> u32 {
    10
}
fn default_min_connections() -> u32 {
    2
}
fn default_idle_timeout() -> u64 {
    300
} // 5 minutes
fn default_max_lifetime() -> u64 {
    1800
} // 30 minutes
fn default_acquire_timeout() -> u64 {
    30
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            idle_timeout_seconds: default_idle_timeout(),
            max_lifetime_seconds: default_max_lifetime(),
            acquire_timeout_seconds: default_acquire_timeout(),
        }
    }
}

/// Represents a row from a database query
pub trait DatabaseRow: Send + Sync {
    /// Get a column value by name
    fn get_string(&self, column: &str) -> DatabaseResult<String>;
    fn get_i64(&self, column: &str) -> DatabaseResult<i64>;

    /// Try to get a column value by name, returning None if the column doesn't exist or is NULL
    fn try_get_string(&self, column: &str) -> DatabaseResult<Option<String>>;
    fn try_get_i64(&self, column: &str) -> DatabaseResult<Option<i64>>;
}

/// Core database connection interface.
///
/// Reflection only ever reads through this trait; callers sharing one
/// connection between tasks must serialize access themselves.
#[async_trait]
pub trait DatabaseConnection: Send + Sync {
    /// Execute a query that returns no rows
    async fn execute(&self, query: &str, params: &[DatabaseValue]) -> DatabaseResult<u64>;

    /// Execute a query that returns rows
    async fn query(
        &self,
        query: &str,
        params: &[DatabaseValue],
    ) -> DatabaseResult<Vec<Box<dyn DatabaseRow>>>;

    /// Execute a query that returns a single row
    async fn query_one(
        &self,
        query: &str,
        params: &[DatabaseValue],
    ) -> DatabaseResult<Option<Box<dyn DatabaseRow>>>;

    /// Get the underlying database type
    fn get_database_type(&self) -> DatabaseType;

    /// Check if the connection is alive
    async fn ping(&self) -> DatabaseResult<()>;

    /// Close the connection
    async fn close(&self) -> DatabaseResult<()>;
}

/// Represents a parameter value for database queries
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseValue {
    /// Null value
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// String value
    Text(String),
    /// Binary data
    Blob(Vec<u8>),
}

/// Open a connection for the configured database type.
///
/// Only SQLite has a driver compiled in; other types are rejected with a
/// configuration error.
pub async fn create_database_connection(
    config: &DatabaseConfig,
) -> DatabaseResult<Box<dyn DatabaseConnection>> {
    match config.db_type {
        DatabaseType::Sqlite => {
            #[cfg(feature = "sqlite")]
            {
                let conn = sqlite::SqliteConnection::connect(config).await?;
                Ok(Box::new(conn) as Box<dyn DatabaseConnection>)
            }
            #[cfg(not(feature = "sqlite"))]
            {
                Err(DatabaseError::Configuration(
                    "SQLite support is not enabled. Enable the 'sqlite' feature.".to_string(),
                ))
            }
        }
        other => Err(DatabaseError::Configuration(format!(
            "no driver available for {} databases",
            other
        ))),
    }
}

#[cfg(feature = "sqlite")]
mod sqlite;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteConnection;

#[cfg(test)]
mod tests;

pub mod extensions {
    use super::{DatabaseConfig, DatabaseType};

    /// Create a SQLite connection configuration
    pub fn sqlite_config(database_path: impl Into<String>) -> DatabaseConfig {
        DatabaseConfig {
            db_type: DatabaseType::Sqlite,
            database: database_path.into(),
            ..Default::default()
        }
    }
}
