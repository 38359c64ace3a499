//! In-memory document server for couchlayer.
//!
//! This crate provides a thread-safe, in-memory implementation of the `Transport` trait that
//! answers requests the way a CouchDB server would. It is meant for development and tests:
//! bind it to a registry instead of an HTTP transport and every record operation runs against
//! databases held in memory.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent requests through async-aware RwLocks
//! - **CouchDB conventions** - Revisions, conflicts and `by_{field}` views
//! - **Request log** - Every request is recorded for assertions
//!
//! # Quick Start
//!
//! ```ignore
//! use couchlayer::{prelude::*, memory::InMemoryServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = InMemoryServer::builder().database("people").build().await?;
//!
//!     let mut registry = SchemaRegistry::new();
//!     registry
//!         .register(RecordType::builder("Person").has("name", AttributeOptions::new()).build()?)?
//!         .connect("Person", server.clone());
//!
//!     let store = RecordStore::new(registry);
//!     let person = store.collection("Person")?.create(json!({"name": "McLovin"})).await?;
//!     assert!(!person.is_new());
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as couchlayer_memory;

mod request;
pub mod server;
mod view;

pub use server::{InMemoryServer, InMemoryServerBuilder, LoggedRequest};
