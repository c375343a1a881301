//! Schema reflection for SQL stores.
//!
//! Connect to a database, list its storages, normalize each column into a
//! [`FieldDescriptor`], and generate model specs for the storages a caller
//! selects.

pub mod build;
pub mod error;
mod logging;
pub mod model_manager;

// Database module for standardized database access
#[cfg(feature = "database")]
pub mod database;

// Database re-exports
#[cfg(feature = "database")]
pub use database::{
    create_database_connection, extensions, DatabaseConfig, DatabaseConnection, DatabaseError,
    DatabaseResult, DatabaseRow, DatabaseType, DatabaseValue,
};

// Re-export model_manager types
#[cfg(feature = "database")]
pub use model_manager::{ReflectionConfig, SchemaReflection};
pub use model_manager::{
    DomainType, FieldAttributes, FieldDescriptor, FieldSelector, GenclassOptions,
    GeneratedModelSpec, ModelGenerator, ModelScope, NullabilityMode, ReflectionAdapter,
    SchemaSnapshot, StorageSelector,
};

pub use error::{ConfigError, Error, Result};
pub use logging::{init_logging, init_logging_with};

/// Prelude module, exposing the most commonly used items.
pub mod prelude {
    pub use crate::{
        build, init_logging, DomainType, Error, FieldDescriptor, FieldSelector, GenclassOptions,
        GeneratedModelSpec, ModelGenerator, ModelScope, ReflectionAdapter, Result,
        StorageSelector,
    };

    // Database API
    #[cfg(feature = "database")]
    pub use crate::database::{
        create_database_connection, extensions, DatabaseConfig, DatabaseConnection,
        DatabaseType,
    };

    #[cfg(feature = "database")]
    pub use crate::{ReflectionConfig, SchemaReflection};

    #[cfg(feature = "sqlite")]
    pub use crate::database::SqliteConnection;

    #[cfg(feature = "sqlite")]
    pub use crate::model_manager::SqliteAdapter;
}
