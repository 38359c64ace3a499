//! Database-level administration.
//!
//! Unlike record operations, which report an unexpected status as `Ok(false)`, every failure of
//! the [`Migrator`] is raised as a [`MigrationError`].
//!
//! # Example
//!
//! ```ignore
//! use couchlayer::migrate::Migrator;
//!
//! let migrator = Migrator::new(transport);
//! migrator.create_database("invoices").await?;
//! migrator.delete_database("invoices").await?;
//! ```

use tracing::info;

use crate::{
    backend::{ACCEPTED, CREATED, NOT_FOUND, PRECONDITION_FAILED, Transport},
    error::{DocumentStoreResult, MigrationError},
    query::encode_segment,
};

/// Creates and deletes databases on the site a transport is opened for.
#[derive(Debug)]
pub struct Migrator<T: Transport> {
    transport: T,
}

impl<T: Transport> Migrator<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Deletes a database and every document in it.
    ///
    /// # Errors
    ///
    /// - [`MigrationError::DatabaseMissing`] if the store answers `404`
    /// - [`MigrationError::Failed`] for any status other than `202`
    pub async fn delete_database(&self, name: &str) -> DocumentStoreResult<bool> {
        let response = self.transport.delete(&format!("/{}", encode_segment(name))).await?;

        match response.code {
            ACCEPTED => {
                info!(database = name, "deleted database");
                Ok(true)
            }
            NOT_FOUND => Err(MigrationError::DatabaseMissing(name.to_string()).into()),
            code => Err(MigrationError::Failed(name.to_string(), code).into()),
        }
    }

    /// Creates an empty database.
    ///
    /// # Errors
    ///
    /// - [`MigrationError::DatabaseExists`] if the store answers `412`
    /// - [`MigrationError::Failed`] for any status other than `201`
    pub async fn create_database(&self, name: &str) -> DocumentStoreResult<bool> {
        let response = self.transport.put(&format!("/{}", encode_segment(name)), None).await?;

        match response.code {
            CREATED => {
                info!(database = name, "created database");
                Ok(true)
            }
            PRECONDITION_FAILED => Err(MigrationError::DatabaseExists(name.to_string()).into()),
            code => Err(MigrationError::Failed(name.to_string(), code).into()),
        }
    }
}
