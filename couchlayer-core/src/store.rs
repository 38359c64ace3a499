//! Main interface for working with records.
//!
//! A [`RecordStore`] owns the shared [`SchemaRegistry`] and hands out collections, one per
//! record type. Every transport and database name a collection uses comes from the registry, so
//! the store itself holds no connection state.
//!
//! # Example
//!
//! ```ignore
//! use couchlayer::prelude::*;
//!
//! let mut registry = SchemaRegistry::new();
//! registry.register(RecordType::builder("Invoice").has("number", AttributeOptions::new()).build()?)?;
//! registry.connect("Invoice", transport);
//!
//! let store = RecordStore::new(registry);
//! let invoice = store.collection("Invoice")?.create(json!({"number": "2024-001"})).await?;
//! ```

use std::sync::Arc;

use crate::{
    collection::{self, RecordCollection, TypedCollection},
    error::DocumentStoreResult,
    model::Model,
    record::Record,
    schema::SchemaRegistry,
};

/// Entry point to the collections of every registered record type.
#[derive(Debug, Clone)]
pub struct RecordStore {
    registry: Arc<SchemaRegistry>,
}

impl RecordStore {
    /// Creates a store over a configured registry.
    pub fn new(registry: impl Into<Arc<SchemaRegistry>>) -> Self {
        Self {
            registry: registry.into(),
        }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Gets the collection of a record type.
    ///
    /// # Errors
    ///
    /// - [`DocumentStoreError::UnknownType`](crate::error::DocumentStoreError::UnknownType) if
    ///   the type is not registered
    /// - [`DocumentStoreError::Hierarchy`](crate::error::DocumentStoreError::Hierarchy) if its
    ///   parent chain is broken
    pub fn collection<'a>(&'a self, type_name: &str) -> DocumentStoreResult<RecordCollection<'a>> {
        Ok(RecordCollection::new(&self.registry, self.registry.schema(type_name)?))
    }

    /// Gets the collection of a model type.
    ///
    /// The model's record type must have been registered, usually with
    /// [`SchemaRegistry::register_model`].
    pub fn typed_collection<'a, M: Model>(&'a self) -> DocumentStoreResult<TypedCollection<'a, M>> {
        Ok(TypedCollection::new(self.collection(M::type_name())?))
    }

    /// Saves a record of any type. See [`RecordCollection::save`].
    pub async fn save(&self, record: &mut Record) -> DocumentStoreResult<bool> {
        collection::save_record(record).await
    }

    /// Deletes a record of any type. See [`RecordCollection::delete`].
    pub async fn delete(&self, record: &mut Record) -> DocumentStoreResult<bool> {
        collection::delete_record(record).await
    }
}

impl From<SchemaRegistry> for RecordStore {
    fn from(registry: SchemaRegistry) -> Self {
        Self::new(registry)
    }
}
