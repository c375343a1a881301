use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::database::{DatabaseConnection, DatabaseRow, DatabaseValue};
use crate::model_manager::{
    adapters::ReflectionAdapter,
    definitions::FieldDescriptor,
    errors::{invalid_column_metadata, Error},
    normalizer::{FieldNormalizer, NormalizerOptions, RawColumn},
    type_map::SQLITE_TYPE_MAP,
    Result,
};

// User tables only; `sqlite_%` names belong to the engine.
macro_rules! user_tables_sql {
    () => {
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\'"
    };
}

const STORAGES_SQL: &str = user_tables_sql!();

const STORAGE_EXISTS_SQL: &str = concat!(user_tables_sql!(), " AND name = ?");

const TABLE_INFO_SQL: &str =
    "SELECT name, type, \"notnull\", dflt_value, pk FROM pragma_table_info(?) ORDER BY cid";

/// SQLite reflection adapter
pub struct SqliteAdapter {
    connection: Arc<dyn DatabaseConnection>,
    options: NormalizerOptions,
}

impl SqliteAdapter {
    /// Create a new SQLite adapter over an open connection
    pub fn new(connection: Arc<dyn DatabaseConnection>) -> Self {
        Self::with_options(connection, NormalizerOptions::default())
    }

    pub fn with_options(connection: Arc<dyn DatabaseConnection>, options: NormalizerOptions) -> Self {
        Self {
            connection,
            options,
        }
    }

    fn normalizer(&self) -> FieldNormalizer<'static> {
        FieldNormalizer::new(&SQLITE_TYPE_MAP, self.options)
    }

    async fn storage_exists(&self, storage: &str) -> Result<bool> {
        let row = self
            .connection
            .query_one(
                STORAGE_EXISTS_SQL,
                &[DatabaseValue::Text(storage.to_string())],
            )
            .await?;
        Ok(row.is_some())
    }
}

/// Read one `pragma_table_info` row.
fn raw_column(row: &dyn DatabaseRow) -> Result<RawColumn> {
    let bad = |e: crate::database::DatabaseError| invalid_column_metadata(e.to_string());
    Ok(RawColumn {
        name: row.try_get_string("name").map_err(bad)?,
        raw_type: row.try_get_string("type").map_err(bad)?,
        primary_key: row.try_get_i64("pk").map_err(bad)?.map(|pk| pk != 0),
        not_null: row.try_get_i64("notnull").map_err(bad)?.map(|nn| nn != 0),
        default_literal: row.try_get_string("dflt_value").map_err(bad)?,
    })
}

#[async_trait]
impl ReflectionAdapter for SqliteAdapter {
    fn get_db_type_name(&self) -> &'static str {
        "sqlite"
    }

    async fn storages(&self) -> Result<Vec<String>> {
        debug!("listing sqlite storages");
        let rows = self.connection.query(STORAGES_SQL, &[]).await?;
        rows.iter()
            .map(|row| {
                row.get_string("name")
                    .map_err(|e| invalid_column_metadata(e.to_string()))
            })
            .collect()
    }

    async fn fields(&self, storage: &str) -> Result<Vec<FieldDescriptor>> {
        if !self.storage_exists(storage).await? {
            return Err(Error::UnknownStorage(storage.to_string()));
        }

        debug!(storage, "reading sqlite column catalog");
        let rows = self
            .connection
            .query(TABLE_INFO_SQL, &[DatabaseValue::Text(storage.to_string())])
            .await?;

        let normalizer = self.normalizer();
        rows.iter()
            .map(|row| normalizer.normalize(raw_column(&**row)?))
            .collect()
    }
}
