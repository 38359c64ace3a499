//! Main couchlayer crate providing object-document mapping for CouchDB-style stores.
//!
//! This crate is the primary entry point for users of the couchlayer framework.
//! It re-exports the core types and functionality from the sub-crates and provides
//! convenient access to the available transports.
//!
//! # Features
//!
//! - **Declared record types** - Attributes, associations and inheritance, resolved into schemas
//! - **Database naming** - Database names inferred from type names, nested types included
//! - **Persistence** - Save, delete, find by id and `by_{field}` view queries over plain HTTP verbs
//! - **Typed models** - `#[derive(Model)]` maps Serde structs onto record types
//! - **Administration** - Database creation and deletion through the [`migrate::Migrator`]
//!
//! # Quick Start
//!
//! ```ignore
//! use couchlayer::{prelude::*, memory::InMemoryServer};
//!
//! #[tokio::main]
//! async fn main() -> DocumentStoreResult<()> {
//!     let server = InMemoryServer::builder().database("people").build().await?;
//!
//!     let mut registry = SchemaRegistry::new();
//!     registry
//!         .register(
//!             RecordType::builder("Person")
//!                 .has("name", AttributeOptions::new().of_type(AttributeType::Text))
//!                 .has("age", AttributeOptions::new().of_type(AttributeType::Number))
//!                 .build()?,
//!         )?
//!         .connect("Person", server);
//!
//!     let store = RecordStore::new(registry);
//!     let people = store.collection("Person")?;
//!
//!     let person = people.create(json!({"name": "McLovin", "age": 17})).await?;
//!     println!("saved {:?} at {:?}", person.id(), person.rev());
//!
//!     let found = people
//!         .find_all(&FindOptions::builder().by("name", "McLovin").build())
//!         .await?;
//!     println!("found {} people", found.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Typed Models
//!
//! ```ignore
//! use couchlayer::prelude::*;
//!
//! #[derive(Debug, Serialize, Deserialize, Model)]
//! pub struct Invoice {
//!     pub id: Option<String>,
//!     pub rev: Option<String>,
//!     pub number: String,
//!     #[model(has_many)]
//!     pub lineitems: Vec<Lineitem>,
//! }
//!
//! #[derive(Debug, Serialize, Deserialize, Model)]
//! #[model(name = "Invoice::Lineitem")]
//! pub struct Lineitem {
//!     pub price: f64,
//! }
//!
//! registry.register_model::<Invoice>()?.register_model::<Lineitem>()?;
//!
//! let store = RecordStore::new(registry);
//! let invoices = store.typed_collection::<Invoice>()?;
//! let saved = invoices.save(&invoice).await?;
//! ```
//!
//! # Transports
//!
//! - [`memory`] - In-memory server for development and testing
//! - `http` - `reqwest` client for a real server (requires the `http` feature)

#[allow(unused_extern_crates)]
extern crate self as couchlayer;

pub mod prelude;

pub use couchlayer_core::{
    backend, collection, error, inflect, marshal, migrate, model, query, record, schema, store,
};
pub use couchlayer_macros::Model;

// Re-export JSON types for convenience
pub use serde_json;

/// In-memory transport implementations.
pub mod memory {
    pub use couchlayer_memory::{InMemoryServer, InMemoryServerBuilder, LoggedRequest};
}

/// HTTP transport implementations.
///
/// This module is only available when the `http` feature is enabled.
#[cfg(feature = "http")]
pub mod http {
    pub use couchlayer_http::{
        Credentials, HttpConfig, HttpTransport, HttpTransportBuilder, create_database,
        delete_database, migrator,
    };
}
