//! HTTP transport abstraction for the document store.
//!
//! This module defines the narrow interface the mapping engine needs from an HTTP client,
//! allowing records to be persisted through any implementation (a real network client, an
//! in-memory server for tests, a scripted fake, etc.).
//!
//! # Overview
//!
//! The [`Transport`] trait offers the four verbs the store conventions use. Every call returns a
//! [`Response`] carrying the raw status code and body; interpreting either is left to the caller.
//! Implementations are required to be thread-safe (`Send + Sync`) because a single transport is
//! shared by every record of a type and its subtypes.
//!
//! # Traits
//!
//! - [`Transport`]: The core trait for HTTP transports
//! - [`TransportBuilder`]: Factory trait for creating transport instances
//!
//! # Examples
//!
//! ```ignore
//! use couchlayer::backend::Transport;
//!
//! let transport = MyTransport::new("http://localhost:5984");
//! let response = transport.get("/invoices/abc").await?;
//! assert_eq!(response.code, 200);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

use crate::error::DocumentStoreResult;

/// Status code answered for a successful create or replace.
pub const CREATED: u16 = 201;
/// Status code answered for a successful delete.
pub const ACCEPTED: u16 = 202;
/// Status code answered when a document or database does not exist.
pub const NOT_FOUND: u16 = 404;
/// Status code answered when a database to create already exists.
pub const PRECONDITION_FAILED: u16 = 412;

/// A raw HTTP response: status code and body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The HTTP status code.
    pub code: u16,
    /// The response body, usually JSON.
    pub body: String,
}

impl Response {
    /// Creates a new response.
    pub fn new(code: u16, body: impl Into<String>) -> Self {
        Self { code, body: body.into() }
    }

    /// Returns `true` for any 2xx status code.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the body is not valid JSON.
    pub fn json(&self) -> DocumentStoreResult<serde_json::Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Abstract interface for HTTP transports.
///
/// Paths are absolute (`/invoices/abc?rev=1-x`) and relative to the site the transport was
/// opened for. Bodies are JSON text.
///
/// # Error Handling
///
/// A non-2xx status is not an error at this layer and must be returned as a [`Response`].
/// Implementations return [`DocumentStoreError::Transport`](crate::error::DocumentStoreError::Transport)
/// only when no response could be obtained at all.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    /// Issues a `GET` request.
    async fn get(&self, path: &str) -> DocumentStoreResult<Response>;

    /// Issues a `PUT` request, with a JSON body when `body` is given.
    async fn put(&self, path: &str, body: Option<&str>) -> DocumentStoreResult<Response>;

    /// Issues a `POST` request with a JSON body.
    async fn post(&self, path: &str, body: &str) -> DocumentStoreResult<Response>;

    /// Issues a `DELETE` request.
    async fn delete(&self, path: &str) -> DocumentStoreResult<Response>;
}

#[async_trait]
impl<T> Transport for &T
where
    T: Transport,
{
    async fn get(&self, path: &str) -> DocumentStoreResult<Response> {
        (*self).get(path).await
    }

    async fn put(&self, path: &str, body: Option<&str>) -> DocumentStoreResult<Response> {
        (*self).put(path, body).await
    }

    async fn post(&self, path: &str, body: &str) -> DocumentStoreResult<Response> {
        (*self).post(path, body).await
    }

    async fn delete(&self, path: &str) -> DocumentStoreResult<Response> {
        (*self).delete(path).await
    }
}

#[async_trait]
impl<T> Transport for Arc<T>
where
    T: Transport + ?Sized,
{
    async fn get(&self, path: &str) -> DocumentStoreResult<Response> {
        (**self).get(path).await
    }

    async fn put(&self, path: &str, body: Option<&str>) -> DocumentStoreResult<Response> {
        (**self).put(path, body).await
    }

    async fn post(&self, path: &str, body: &str) -> DocumentStoreResult<Response> {
        (**self).post(path, body).await
    }

    async fn delete(&self, path: &str) -> DocumentStoreResult<Response> {
        (**self).delete(path).await
    }
}

/// A shared, type-erased transport handle as bound to record types.
pub type SharedTransport = Arc<dyn Transport>;

#[async_trait]
pub trait TransportBuilder {
    type Transport: Transport;

    async fn build(self) -> DocumentStoreResult<Self::Transport>;
}
