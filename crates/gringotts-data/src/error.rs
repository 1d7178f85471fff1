//! Error types for the data access layer.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// Result alias for data layer operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors raised by the data access layer.
#[derive(Debug)]
pub enum DataError {
    /// The connection pool could not be established.
    ConnectFailed {
        /// Underlying SQL error.
        source: sqlx::Error,
    },
    /// A schema lifecycle statement failed.
    SchemaFailed {
        /// The statement that was being executed.
        statement: String,
        /// Underlying SQL error.
        source: sqlx::Error,
    },
    /// A database operation failed.
    QueryFailed {
        /// Operation identifier.
        operation: &'static str,
        /// Underlying SQL error.
        source: sqlx::Error,
    },
}

impl Display for DataError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectFailed { .. } => formatter.write_str("database connection failed"),
            Self::SchemaFailed { statement, .. } => {
                write!(formatter, "schema statement failed: {statement}")
            }
            Self::QueryFailed { operation, .. } => {
                write!(formatter, "database operation `{operation}` failed")
            }
        }
    }
}

impl Error for DataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ConnectFailed { source }
            | Self::SchemaFailed { source, .. }
            | Self::QueryFailed { source, .. } => Some(source),
        }
    }
}

impl From<sqlx::Error> for DataError {
    fn from(source: sqlx::Error) -> Self {
        Self::QueryFailed {
            operation: "sqlx operation",
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_error_display_and_source() {
        let connect = DataError::ConnectFailed {
            source: sqlx::Error::PoolClosed,
        };
        assert_eq!(connect.to_string(), "database connection failed");
        assert!(connect.source().is_some());

        let schema = DataError::SchemaFailed {
            statement: "CREATE SCHEMA gringotts".to_string(),
            source: sqlx::Error::PoolClosed,
        };
        assert!(schema.to_string().contains("CREATE SCHEMA gringotts"));

        let query = DataError::QueryFailed {
            operation: "fetch vault",
            source: sqlx::Error::RowNotFound,
        };
        assert_eq!(query.to_string(), "database operation `fetch vault` failed");
        assert!(query.source().is_some());

        let from = DataError::from(sqlx::Error::RowNotFound);
        assert!(from.to_string().contains("sqlx operation"));
    }
}
