//! Error types and result types for record mapping and document store operations.
//!
//! This module provides error handling for schema declaration, record construction and every
//! request issued against a document store. Use [`DocumentStoreResult<T>`] as the return type
//! for fallible operations.
//!
//! Not every unsuccessful store response is an error. Saving or deleting a record reports an
//! unexpected status code as `Ok(false)`, and fetching a missing record by id yields `Ok(None)`.
//! Database-level administration through [`Migrator`](crate::migrate::Migrator) always raises.

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when mapping records onto a document store.
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// An attribute or association was declared under a name that is not an identifier.
    #[error("Invalid declaration: {0}")]
    InvalidDeclaration(String),
    /// The parent chain of a record type does not terminate at a base type.
    /// The first argument is the offending type, the second describes the break.
    #[error("Record type {0} does not descend from a base record type: {1}")]
    Hierarchy(String, String),
    /// No record type with the given name has been registered.
    #[error("Unknown record type: {0}")]
    UnknownType(String),
    /// No transport is bound to the record type or any of its ancestors.
    #[error("Record type {0} has no connection")]
    NotConnected(String),
    /// An instance-level operation was attempted on a record in the wrong state.
    #[error("{0}")]
    Precondition(String),
    /// A call was made with missing or malformed arguments.
    #[error("Invalid argument: {0}")]
    Argument(String),
    /// A database-level administrative operation failed.
    #[error(transparent)]
    Migration(#[from] MigrationError),
    /// The transport could not complete the request.
    #[error("Transport error: {0}")]
    Transport(String),
    /// The store answered a read with an unexpected status code.
    /// The first argument is the status code, the second is the request path.
    #[error("Unexpected status {0} for {1}")]
    Request(u16, String),
    /// Serialization/deserialization error when converting between records and JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Failures of database-level administration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MigrationError {
    /// The database to delete does not exist.
    #[error("Database '{0}' does not exist")]
    DatabaseMissing(String),
    /// The database to create already exists.
    #[error("Database '{0}' already exists")]
    DatabaseExists(String),
    /// The store answered with any other unexpected status.
    /// The first argument is the database name, the second the status code.
    #[error("Migration of database '{0}' failed with status {1}")]
    Failed(String, u16),
}

/// A specialized `Result` type for record mapping and document store operations.
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl From<SerdeJsonError> for DocumentStoreError {
    fn from(err: SerdeJsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_database_message() {
        let err = DocumentStoreError::from(MigrationError::DatabaseMissing("foo".to_string()));
        assert_eq!(err.to_string(), "Database 'foo' does not exist");
    }

    #[test]
    fn precondition_message_is_verbatim() {
        let err = DocumentStoreError::Precondition("You must specify a revision".to_string());
        assert_eq!(err.to_string(), "You must specify a revision");
    }

    #[test]
    fn json_errors_become_serialization_errors() {
        let err: DocumentStoreError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, DocumentStoreError::Serialization(_)));
    }
}
