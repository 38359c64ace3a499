//! HTTP transport for couchlayer.
//!
//! This crate provides a `reqwest`-based implementation of the `Transport` trait, connecting
//! record types to a CouchDB-compatible server.
//!
//! To use this transport, include the `http` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! couchlayer = { version = "x.y.z", features = ["http"] }
//! ```
//!
//! # Features
//!
//! - **Async/await** - Built on `reqwest`'s async client
//! - **Configuration** - Builder API or a deserializable [`HttpConfig`]
//! - **Basic auth** - Credentials sent with every request
//! - **Administration** - [`delete_database`] and [`create_database`] against a site
//!
//! # Example
//!
//! ```ignore
//! use couchlayer::{backend::TransportBuilder, http::HttpTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = HttpTransport::builder("http://localhost:5984")
//!         .with_basic_auth("admin", Some("secret"))
//!         .build()
//!         .await?;
//!
//!     registry.connect("Invoice", transport);
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as couchlayer_http;

pub mod transport;

pub use transport::{Credentials, HttpConfig, HttpTransport, HttpTransportBuilder};

use couchlayer_core::{backend::TransportBuilder, error::DocumentStoreResult, migrate::Migrator};

/// Opens a [`Migrator`] for `site`.
pub async fn migrator(site: &str) -> DocumentStoreResult<Migrator<HttpTransport>> {
    Ok(Migrator::new(HttpTransport::builder(site).build().await?))
}

/// Deletes the database `name` on `site`.
///
/// # Errors
///
/// See [`Migrator::delete_database`].
pub async fn delete_database(site: &str, name: &str) -> DocumentStoreResult<bool> {
    migrator(site).await?.delete_database(name).await
}

/// Creates the database `name` on `site`.
///
/// # Errors
///
/// See [`Migrator::create_database`].
pub async fn create_database(site: &str, name: &str) -> DocumentStoreResult<bool> {
    migrator(site).await?.create_database(name).await
}
