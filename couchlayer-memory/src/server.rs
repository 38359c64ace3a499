//! An in-memory server speaking the CouchDB document conventions.
//!
//! [`InMemoryServer`] implements [`Transport`] by routing each request against databases held in
//! memory. It understands the requests the mapping engine issues and answers them the way a
//! CouchDB server would:
//!
//! | Request                              | Answer                                        |
//! |--------------------------------------|-----------------------------------------------|
//! | `PUT /{db}`                          | `201`, `412` if the database exists           |
//! | `DELETE /{db}`                       | `202`, `404` if missing                       |
//! | `GET /{db}`                          | `200` with a document count, `404` if missing |
//! | `POST /{db}`                         | `201` with a generated id unless `_id` is set |
//! | `PUT /{db}/{id}`                     | `201`, `409` on a revision conflict           |
//! | `GET /{db}/{id}`                     | `200` with the document, `404` if missing     |
//! | `DELETE /{db}/{id}?rev={rev}`        | `202`, `409` on a revision conflict           |
//! | `GET /{db}/_view/by_{f}/by_{f}?key=` | `200` with `{"rows": [{"value": doc}, ..]}`   |
//!
//! Writes to a database that does not exist answer `404`. Revisions have the form `{n}-{hex}`,
//! where `n` counts the writes to the document.

use async_trait::async_trait;
use mea::rwlock::RwLock;
use serde_json::{Map, Value, json};
use std::{collections::HashMap, sync::Arc};
use tracing::debug;
use uuid::Uuid;

use couchlayer_core::{
    backend::{ACCEPTED, CREATED, NOT_FOUND, PRECONDITION_FAILED, Response, Transport, TransportBuilder},
    error::DocumentStoreResult,
};

use crate::{request::RequestPath, view};

const OK: u16 = 200;
const BAD_REQUEST: u16 = 400;
const METHOD_NOT_ALLOWED: u16 = 405;
const CONFLICT: u16 = 409;

type Database = HashMap<String, Value>;
type DatabaseMap = HashMap<String, Database>;

/// A request as received by an [`InMemoryServer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedRequest {
    pub method: String,
    pub path: String,
    pub body: Option<String>,
}

/// Thread-safe in-memory document server.
///
/// `InMemoryServer` is cloneable; clones share the same databases and request log, so one clone
/// can be bound to a registry while another is kept for assertions.
///
/// # Example
///
/// ```ignore
/// use couchlayer_memory::InMemoryServer;
///
/// let server = InMemoryServer::builder().database("invoices").build().await?;
/// registry.connect("Invoice", server.clone());
///
/// // ... save some invoices ...
///
/// assert_eq!(server.requests().await.len(), 1);
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryServer {
    databases: Arc<RwLock<DatabaseMap>>,
    log: Arc<RwLock<Vec<LoggedRequest>>>,
}

impl InMemoryServer {
    /// Creates a server without any database.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> InMemoryServerBuilder {
        InMemoryServerBuilder::default()
    }

    /// Every request received so far, oldest first.
    pub async fn requests(&self) -> Vec<LoggedRequest> {
        self.log.read().await.clone()
    }

    /// Forgets the requests received so far.
    pub async fn clear_requests(&self) {
        self.log.write().await.clear();
    }

    /// Names of the existing databases, sorted.
    pub async fn database_names(&self) -> Vec<String> {
        let mut names = self.databases.read().await.keys().cloned().collect::<Vec<_>>();
        names.sort();
        names
    }

    /// The stored document, `_id` and `_rev` included.
    pub async fn document(&self, database: &str, id: &str) -> Option<Value> {
        self.databases.read().await.get(database)?.get(id).cloned()
    }

    async fn handle(&self, method: &str, path: &str, body: Option<&str>) -> Response {
        self.log.write().await.push(LoggedRequest {
            method: method.to_string(),
            path: path.to_string(),
            body: body.map(str::to_string),
        });

        let request = RequestPath::parse(path);
        let segments = request.segments.iter().map(String::as_str).collect::<Vec<_>>();

        let response = match (method, segments.as_slice()) {
            ("PUT", [db]) => self.create_database(db).await,
            ("DELETE", [db]) => self.delete_database(db).await,
            ("GET", [db]) => self.database_info(db).await,
            ("POST", [db]) => self.post_document(db, body).await,
            ("GET", [db, "_view", _, view]) => self.query_view(db, view, request.query.get("key")).await,
            ("PUT", [db, id]) => self.put_document(db, id, body).await,
            ("GET", [db, id]) => self.get_document(db, id).await,
            ("DELETE", [db, id]) => self.delete_document(db, id, request.query.get("rev")).await,
            (_, [] | [_] | [_, _]) => error(METHOD_NOT_ALLOWED, "method_not_allowed", "Only the document API is supported."),
            _ => error(NOT_FOUND, "not_found", "missing"),
        };

        debug!(method, path, code = response.code, "in-memory request");
        response
    }

    async fn create_database(&self, db: &str) -> Response {
        let mut databases = self.databases.write().await;
        if databases.contains_key(db) {
            return error(PRECONDITION_FAILED, "file_exists", "The database could not be created, the file already exists.");
        }

        databases.insert(db.to_string(), Database::new());
        ok(CREATED, json!({"ok": true}))
    }

    async fn delete_database(&self, db: &str) -> Response {
        match self.databases.write().await.remove(db) {
            Some(_) => ok(ACCEPTED, json!({"ok": true})),
            None => no_database(),
        }
    }

    async fn database_info(&self, db: &str) -> Response {
        match self.databases.read().await.get(db) {
            Some(documents) => ok(OK, json!({"db_name": db, "doc_count": documents.len()})),
            None => no_database(),
        }
    }

    async fn post_document(&self, db: &str, body: Option<&str>) -> Response {
        let document = match parse_document(body) {
            Ok(document) => document,
            Err(response) => return response,
        };
        let id = match document.get("_id") {
            Some(Value::String(id)) => id.clone(),
            _ => Uuid::new_v4().simple().to_string(),
        };

        self.write_document(db, &id, document).await
    }

    async fn put_document(&self, db: &str, id: &str, body: Option<&str>) -> Response {
        match parse_document(body) {
            Ok(document) => self.write_document(db, id, document).await,
            Err(response) => response,
        }
    }

    async fn write_document(&self, db: &str, id: &str, mut document: Map<String, Value>) -> Response {
        let mut databases = self.databases.write().await;
        let Some(documents) = databases.get_mut(db) else {
            return no_database();
        };

        let current = documents.get(id).and_then(|stored| stored.get("_rev")).cloned();
        let given = document.get("_rev").cloned();
        if current != given {
            return error(CONFLICT, "conflict", "Document update conflict.");
        }

        let rev = next_revision(current.as_ref());
        document.insert("_id".to_string(), json!(id));
        document.insert("_rev".to_string(), json!(rev));
        documents.insert(id.to_string(), Value::Object(document));

        ok(CREATED, json!({"ok": true, "id": id, "rev": rev}))
    }

    async fn get_document(&self, db: &str, id: &str) -> Response {
        let databases = self.databases.read().await;
        let Some(documents) = databases.get(db) else {
            return no_database();
        };

        match documents.get(id) {
            Some(document) => ok(OK, document.clone()),
            None => error(NOT_FOUND, "not_found", "missing"),
        }
    }

    async fn delete_document(&self, db: &str, id: &str, rev: Option<&String>) -> Response {
        let mut databases = self.databases.write().await;
        let Some(documents) = databases.get_mut(db) else {
            return no_database();
        };
        let Some(stored) = documents.get(id) else {
            return error(NOT_FOUND, "not_found", "missing");
        };

        if stored.get("_rev").and_then(Value::as_str) != rev.map(String::as_str) {
            return error(CONFLICT, "conflict", "Document update conflict.");
        }

        documents.remove(id);
        ok(ACCEPTED, json!({"ok": true, "id": id}))
    }

    async fn query_view(&self, db: &str, view: &str, key: Option<&String>) -> Response {
        let databases = self.databases.read().await;
        let Some(documents) = databases.get(db) else {
            return no_database();
        };

        match view::indexed_field(view) {
            Some(field) => ok(OK, view::query(documents.iter(), field, key.map(String::as_str))),
            None => error(NOT_FOUND, "not_found", "missing_named_view"),
        }
    }
}

fn ok(code: u16, body: Value) -> Response {
    Response::new(code, body.to_string())
}

fn error(code: u16, error: &str, reason: &str) -> Response {
    Response::new(code, json!({"error": error, "reason": reason}).to_string())
}

fn no_database() -> Response {
    error(NOT_FOUND, "not_found", "Database does not exist.")
}

fn parse_document(body: Option<&str>) -> Result<Map<String, Value>, Response> {
    match body.map(serde_json::from_str::<Value>) {
        Some(Ok(Value::Object(document))) => Ok(document),
        _ => Err(error(BAD_REQUEST, "bad_request", "Document must be a JSON object")),
    }
}

fn next_revision(current: Option<&Value>) -> String {
    let generation = current
        .and_then(Value::as_str)
        .and_then(|rev| rev.split_once('-'))
        .and_then(|(n, _)| n.parse::<u64>().ok())
        .unwrap_or(0);

    format!("{}-{}", generation + 1, Uuid::new_v4().simple())
}

#[async_trait]
impl Transport for InMemoryServer {
    async fn get(&self, path: &str) -> DocumentStoreResult<Response> {
        Ok(self.handle("GET", path, None).await)
    }

    async fn put(&self, path: &str, body: Option<&str>) -> DocumentStoreResult<Response> {
        Ok(self.handle("PUT", path, body).await)
    }

    async fn post(&self, path: &str, body: &str) -> DocumentStoreResult<Response> {
        Ok(self.handle("POST", path, Some(body)).await)
    }

    async fn delete(&self, path: &str) -> DocumentStoreResult<Response> {
        Ok(self.handle("DELETE", path, None).await)
    }
}

/// Builder for [`InMemoryServer`] instances with pre-created databases.
///
/// # Example
///
/// ```ignore
/// use couchlayer_memory::InMemoryServer;
///
/// let server = InMemoryServer::builder()
///     .database("invoices")
///     .database("invoice_lineitems")
///     .build()
///     .await?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryServerBuilder {
    databases: Vec<String>,
}

impl InMemoryServerBuilder {
    /// Creates the database `name` when the server is built.
    pub fn database(mut self, name: impl Into<String>) -> Self {
        self.databases.push(name.into());
        self
    }
}

#[async_trait]
impl TransportBuilder for InMemoryServerBuilder {
    type Transport = InMemoryServer;

    async fn build(self) -> DocumentStoreResult<Self::Transport> {
        let server = InMemoryServer::new();
        {
            let mut databases = server.databases.write().await;
            for name in self.databases {
                databases.entry(name).or_default();
            }
        }

        Ok(server)
    }
}
