use thiserror::Error;

#[cfg(feature = "database")]
use crate::database::DatabaseError;

/// Error types for schema reflection
#[derive(Debug, Error)]
pub enum Error {
    /// The backing store could not be reached or the metadata query failed
    #[cfg(feature = "database")]
    #[error("connection error: {0}")]
    Connection(#[from] DatabaseError),

    /// The named storage does not exist
    #[error("unknown storage: {0}")]
    UnknownStorage(String),

    /// The type map has no entry for a primitive type name
    #[error("unknown primitive type: {0}")]
    UnknownPrimitiveType(String),

    /// A catalog row is missing required data
    #[error("invalid column metadata: {0}")]
    InvalidColumnMetadata(String),

    /// A storage or field selector is neither a name, a symbol, nor a pattern
    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    /// Unsupported feature for the target database
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),
}

/// Convenience Result type for reflection operations
pub type Result<T> = std::result::Result<T, Error>;

/// Helper to create an InvalidColumnMetadata error
pub fn invalid_column_metadata<S: Into<String>>(msg: S) -> Error {
    Error::InvalidColumnMetadata(msg.into())
}

/// Helper to create an InvalidSelector error
pub fn invalid_selector<S: Into<String>>(msg: S) -> Error {
    Error::InvalidSelector(msg.into())
}

/// Helper to create an UnsupportedFeature error
pub fn unsupported_feature_error<S: Into<String>>(msg: S) -> Error {
    Error::UnsupportedFeature(msg.into())
}
