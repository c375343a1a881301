// Allow async functions in traits for this module
#![allow(async_fn_in_trait)]

// Extends DatabaseConnection with schema reflection

use std::sync::Arc;

use crate::database::DatabaseConnection;
use crate::model_manager::{
    adapters::ReflectionAdapter,
    config::adapter_for,
    definitions::{FieldDescriptor, GeneratedModelSpec, SchemaSnapshot},
    generator::{GenclassOptions, ModelGenerator},
    normalizer::NormalizerOptions,
    selector::FieldSelector,
    Result,
};

/// Extension trait to reflect the schema of an open connection.
///
/// Every call builds an adapter for the connection's dialect with default
/// [`NormalizerOptions`]; use [`crate::model_manager::ReflectionConfig`] or an
/// adapter directly for anything else.
pub trait SchemaReflection {
    /// Names of all user storages, sorted
    async fn storages(&self) -> Result<Vec<String>>;

    /// Normalized fields of one storage, in catalog order
    async fn fields(&self, storage: &str) -> Result<Vec<FieldDescriptor>>;

    /// Every storage with its fields
    async fn storages_and_fields(&self) -> Result<SchemaSnapshot>;

    /// Generate model specs for the storages selected by `options`
    async fn auto_genclass(&self, options: &GenclassOptions) -> Result<Vec<GeneratedModelSpec>>;

    /// Fields of `storage` matching any of `selectors`
    async fn reflect(
        &self,
        storage: &str,
        selectors: &[FieldSelector],
    ) -> Result<Vec<FieldDescriptor>>;

    /// [INTERNAL] Helper to get the reflection adapter for this connection
    fn reflection_adapter(&self) -> Result<Box<dyn ReflectionAdapter>>;
}

impl SchemaReflection for Arc<dyn DatabaseConnection> {
    fn reflection_adapter(&self) -> Result<Box<dyn ReflectionAdapter>> {
        adapter_for(Arc::clone(self), NormalizerOptions::default())
    }

    async fn storages(&self) -> Result<Vec<String>> {
        let mut names = self.reflection_adapter()?.storages().await?;
        names.sort();
        Ok(names)
    }

    async fn fields(&self, storage: &str) -> Result<Vec<FieldDescriptor>> {
        self.reflection_adapter()?.fields(storage).await
    }

    async fn storages_and_fields(&self) -> Result<SchemaSnapshot> {
        self.reflection_adapter()?.storages_and_fields().await
    }

    async fn auto_genclass(&self, options: &GenclassOptions) -> Result<Vec<GeneratedModelSpec>> {
        let adapter = self.reflection_adapter()?;
        ModelGenerator::new(adapter.as_ref())
            .auto_genclass(options)
            .await
    }

    async fn reflect(
        &self,
        storage: &str,
        selectors: &[FieldSelector],
    ) -> Result<Vec<FieldDescriptor>> {
        let adapter = self.reflection_adapter()?;
        ModelGenerator::new(adapter.as_ref())
            .reflect(storage, selectors)
            .await
    }
}
