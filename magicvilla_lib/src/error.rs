//! Error types for the library layer.

use std::fmt;

use crate::db::DbError;

/// Errors from loading configuration and running the server.
#[derive(Debug)]
pub enum VillaError {
    /// A storage operation failed.
    Db(DbError),
    /// Configuration could not be loaded.
    Config(String),
    /// The HTTP listener failed.
    Io(std::io::Error),
}

impl fmt::Display for VillaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Db(e) => write!(f, "Database error: {}", e),
            Self::Config(msg) => write!(f, "Config error: {}", msg),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for VillaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Db(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Config(_) => None,
        }
    }
}

impl From<DbError> for VillaError {
    fn from(e: DbError) -> Self {
        Self::Db(e)
    }
}

impl From<std::io::Error> for VillaError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn display_prefixes_category() {
        let err = VillaError::Config("bad port".to_string());
        assert_eq!(err.to_string(), "Config error: bad port");
        assert!(err.source().is_none());
    }

    #[test]
    fn io_error_is_source() {
        let err = VillaError::from(std::io::Error::new(
            std::io::ErrorKind::AddrInUse,
            "address in use",
        ));
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("I/O error"));
    }

    #[test]
    fn storage_error_converts() {
        let err = VillaError::from(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows));
        assert!(matches!(err, VillaError::Db(_)));
        assert!(err.to_string().starts_with("Database error"));
    }
}
