//! Convenient re-exports of commonly used types from couchlayer.
//!
//! Import this prelude module to quickly access the most frequently used types
//! and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use couchlayer::prelude::*;
//! ```
//!
//! This provides access to:
//! - Schema declaration and the registry
//! - Records, collections and the record store
//! - Transports and their builders
//! - Find scopes and options
//! - Typed models and their derive macro
//! - Error types and the migrator

pub use couchlayer_core::{
    backend::{Response, SharedTransport, Transport, TransportBuilder},
    collection::{Found, RecordCollection, TypedCollection},
    error::{DocumentStoreError, DocumentStoreResult, MigrationError},
    migrate::Migrator,
    model::Model,
    query::{FindOptions, Scope},
    record::Record,
    schema::{AssociationOptions, AttributeOptions, AttributeType, RecordType, Schema, SchemaRegistry},
    store::RecordStore,
};
pub use couchlayer_macros::Model;
pub use serde::{Deserialize, Serialize};
pub use serde_json::json;
