//! The mapping engine of couchlayer: typed records over CouchDB-style JSON document databases.
//!
//! This crate provides:
//!
//! - **Transport abstraction** ([`backend`]) - The four HTTP verbs the store conventions use
//! - **Schemas** ([`schema`]) - Record type declarations, inheritance and database naming
//! - **Records** ([`record`]) - Live instances built from JSON mappings
//! - **Marshaling** ([`marshal`]) - Records to stored documents and back
//! - **Queries** ([`query`]) - Find scopes and view paths
//! - **Collections** ([`collection`]) - Persistence of one record type
//! - **Record store** ([`store`]) - Main entry point over a registry
//! - **Typed models** ([`model`]) - Rust structs as record types
//! - **Administration** ([`migrate`]) - Database creation and deletion
//! - **Error handling** ([`error`]) - Error types and result types
//! - **Inflection** ([`inflect`]) - The naming conventions behind database names
//!
//! # Example
//!
//! ```ignore
//! use couchlayer_core::{schema::*, store::RecordStore};
//! use serde_json::json;
//!
//! let mut registry = SchemaRegistry::new();
//! registry
//!     .register(
//!         RecordType::builder("Person")
//!             .has("name", AttributeOptions::new().of_type(AttributeType::Text))
//!             .build()?,
//!     )?
//!     .connect("Person", transport);
//!
//! let store = RecordStore::new(registry);
//! let people = store.collection("Person")?;
//! let person = people.create(json!({"name": "McLovin"})).await?;
//! assert!(!person.is_new());
//! ```

#[allow(unused_extern_crates)]
extern crate self as couchlayer_core;

pub mod backend;
pub mod collection;
pub mod error;
pub mod inflect;
pub mod marshal;
pub mod migrate;
pub mod model;
pub mod query;
pub mod record;
pub mod schema;
pub mod store;
