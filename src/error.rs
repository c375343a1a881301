#[cfg(feature = "database")]
use crate::database::DatabaseError;
use crate::model_manager::Error as ReflectionError;
use std::io;
use thiserror::Error;

/// Unified error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[cfg(feature = "database")]
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("reflection error: {0}")]
    Reflection(#[from] ReflectionError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    StringError(String),
}

/// Convenience result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Error category for configuration issues
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cannot read configuration file: {0}")]
    MissingFile(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// Add From<String> implementation for Error to enable ? operator with string errors
impl From<String> for Error {
    fn from(error: String) -> Self {
        Error::StringError(error)
    }
}

impl From<&str> for Error {
    fn from(error: &str) -> Self {
        Error::StringError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions_and_display() {
        let err: Error = ConfigError::Invalid("bad nullability".to_string()).into();
        assert_eq!(
            err.to_string(),
            "configuration error: invalid configuration: bad nullability"
        );

        let err: Error = ReflectionError::UnknownStorage("ghosts".to_string()).into();
        assert_eq!(err.to_string(), "reflection error: unknown storage: ghosts");

        let err: Error = "plain".into();
        assert!(matches!(err, Error::StringError(ref s) if s == "plain"));
    }

    #[cfg(feature = "database")]
    #[test]
    fn test_database_error() {
        let err: Error = DatabaseError::Connection("refused".to_string()).into();
        assert_eq!(err.to_string(), "database error: connection error: refused");
    }
}
