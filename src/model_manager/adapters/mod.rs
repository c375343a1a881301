mod trait_def;

pub use trait_def::ReflectionAdapter;

#[cfg(feature = "sqlite")]
pub mod sqlite_adapter;

#[cfg(feature = "sqlite")]
pub use sqlite_adapter::SqliteAdapter;
