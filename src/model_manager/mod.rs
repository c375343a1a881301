// Schema reflection
//
// Reads the live catalog of a SQL store, normalizes each column into a
// field descriptor, and generates model specs for selected storages.

pub mod adapters;
#[cfg(feature = "database")]
pub mod config;
pub mod definitions;
pub mod errors;
pub mod generator;
pub mod inflection;
pub mod normalizer;
pub mod scope;
#[cfg(feature = "database")]
pub mod sdk_integration;
pub mod selector;
pub mod type_map;


// Re-export core types for convenience
pub use adapters::ReflectionAdapter;
#[cfg(feature = "sqlite")]
pub use adapters::SqliteAdapter;
#[cfg(feature = "database")]
pub use config::ReflectionConfig;
pub use definitions::{
    DomainType, FieldAttributes, FieldDescriptor, GeneratedModelSpec, SchemaSnapshot,
};
pub use errors::{Error, Result};
pub use generator::{render_rust, GenclassOptions, ModelGenerator};
pub use inflection::{DefaultInflector, Inflector};
pub use normalizer::{FieldNormalizer, NormalizerOptions, NullabilityMode, RawColumn};
pub use scope::{ModelScope, DEFAULT_SCOPE};
#[cfg(feature = "database")]
pub use sdk_integration::SchemaReflection;
pub use selector::{FieldSelector, StorageSelector};
pub use type_map::{TypeMap, SQLITE_TYPE_MAP};
