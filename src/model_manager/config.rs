use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::database::{DatabaseConfig, DatabaseConnection, DatabaseType};
use crate::error::ConfigError;
use crate::model_manager::{
    adapters::ReflectionAdapter,
    errors::unsupported_feature_error,
    generator::GenclassOptions,
    normalizer::{NormalizerOptions, NullabilityMode},
    Result,
};

/// Reflection settings, usually loaded from a TOML file:
///
/// ```toml
/// nullability = "compatibility"
/// strict_types = false
///
/// [database]
/// db_type = "sqlite"
/// database = "app.db"
///
/// [genclass]
/// scope = "App"
/// storages = ["/^abstract_/"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReflectionConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub nullability: NullabilityMode,
    #[serde(default)]
    pub strict_types: bool,
    #[serde(default)]
    pub genclass: GenclassOptions,
}

impl ReflectionConfig {
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::MissingFile(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn normalizer_options(&self) -> NormalizerOptions {
        NormalizerOptions {
            nullability: self.nullability,
            strict_types: self.strict_types,
        }
    }

    /// Get the reflection adapter for the connection's dialect.
    pub fn get_adapter(
        &self,
        connection: Arc<dyn DatabaseConnection>,
    ) -> Result<Box<dyn ReflectionAdapter>> {
        adapter_for(connection, self.normalizer_options())
    }
}

/// Reflection adapter for a connection, if its dialect has one.
pub fn adapter_for(
    connection: Arc<dyn DatabaseConnection>,
    options: NormalizerOptions,
) -> Result<Box<dyn ReflectionAdapter>> {
    match connection.get_database_type() {
        #[cfg(feature = "sqlite")]
        DatabaseType::Sqlite => Ok(Box::new(
            crate::model_manager::adapters::SqliteAdapter::with_options(connection, options),
        )),
        other => {
            let _ = options;
            Err(unsupported_feature_error(format!(
                "schema reflection is not available for {}",
                other
            )))
        }
    }
}
