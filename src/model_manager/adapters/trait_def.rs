use async_trait::async_trait;

use crate::model_manager::{
    definitions::{FieldDescriptor, SchemaSnapshot},
    Result,
};

/// Dialect-specific schema reflection.
///
/// Each dialect supplies its own storage listing and column-metadata parsing;
/// every call re-reads the live catalog.
#[async_trait]
pub trait ReflectionAdapter: Send + Sync {
    /// Get the name of the dialect this adapter reflects
    fn get_db_type_name(&self) -> &'static str;

    /// Names of all user storages visible to the connection, excluding the
    /// engine's own bookkeeping tables. Order is unspecified.
    async fn storages(&self) -> Result<Vec<String>>;

    /// Normalized fields of `storage`, in catalog order.
    async fn fields(&self, storage: &str) -> Result<Vec<FieldDescriptor>>;

    /// `fields` for every name returned by `storages`.
    ///
    /// The two phases are not atomic: a storage dropped in between surfaces
    /// as an error from `fields`.
    async fn storages_and_fields(&self) -> Result<SchemaSnapshot> {
        let mut snapshot = SchemaSnapshot::new();
        for storage in self.storages().await? {
            let fields = self.fields(&storage).await?;
            snapshot.insert(storage, fields);
        }
        Ok(snapshot)
    }
}
