//! Collections: the persistence gateway of one record type.
//!
//! A collection translates record lifecycle operations into requests against the database and
//! transport of its record type:
//!
//! | Operation                              | Request                           | Success |
//! |----------------------------------------|-----------------------------------|---------|
//! | [`save`](RecordCollection::save), new id | `POST /{db}`                     | `201`   |
//! | [`save`](RecordCollection::save), with id | `PUT /{db}/{id}`                | `201`   |
//! | [`delete`](RecordCollection::delete)   | `DELETE /{db}/{id}?rev={rev}`     | `202`   |
//! | [`find_by_id`](RecordCollection::find_by_id) | `GET /{db}/{id}`            | `2xx`   |
//! | [`find_all`](RecordCollection::find_all) | `GET /{db}/_view/by_{f}/by_{f}?key={k}` | `2xx` |
//!
//! # Collection Types
//!
//! - [`RecordCollection`] - Works with dynamic [`Record`]s
//! - [`TypedCollection`] - Converts records to and from a [`Model`] type
//!
//! # Example
//!
//! ```ignore
//! let invoices = store.collection("Invoice")?;
//!
//! let mut invoice = invoices.build(json!({"number": "2024-001"}).as_object().unwrap())?;
//! assert!(invoices.save(&mut invoice).await?);
//! assert!(!invoice.is_new());
//!
//! let same = invoices.find_by_id(&invoice.id().unwrap()).await?;
//! ```

use serde_json::{Map, Value};
use std::{marker::PhantomData, sync::Arc};
use tracing::{debug, warn};

use crate::{
    backend::{ACCEPTED, CREATED, NOT_FOUND},
    error::{DocumentStoreError, DocumentStoreResult},
    marshal,
    model::Model,
    query::{FindOptions, Scope, encode_segment, urlencode, view_path},
    record::Record,
    schema::{Schema, SchemaRegistry},
};

/// The result of [`RecordCollection::find`].
#[derive(Debug, Clone)]
pub enum Found {
    /// Result of [`Scope::All`].
    Many(Vec<Record>),
    /// Result of [`Scope::First`] and [`Scope::Id`].
    One(Option<Record>),
}

impl Found {
    /// Every record found.
    pub fn into_vec(self) -> Vec<Record> {
        match self {
            Found::Many(records) => records,
            Found::One(record) => record.into_iter().collect(),
        }
    }

    /// The first record found, if any.
    pub fn into_first(self) -> Option<Record> {
        match self {
            Found::Many(records) => records.into_iter().next(),
            Found::One(record) => record,
        }
    }
}

/// The persistence gateway of one record type.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the registry reference
#[derive(Debug, Clone)]
pub struct RecordCollection<'a> {
    registry: &'a SchemaRegistry,
    schema: Arc<Schema>,
}

impl<'a> RecordCollection<'a> {
    /// Creates a new collection reference (internal use).
    pub(crate) fn new(registry: &'a SchemaRegistry, schema: Arc<Schema>) -> Self {
        Self { registry, schema }
    }

    /// The record type of this collection.
    pub fn type_name(&self) -> &str {
        self.schema.name()
    }

    /// The database the record type is stored in.
    pub fn database_name(&self) -> &str {
        self.schema.database_name()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Builds an unsaved record from a mapping.
    ///
    /// # Errors
    ///
    /// See [`Record::build`].
    pub fn build(&self, input: &Map<String, Value>) -> DocumentStoreResult<Record> {
        Record::build(self.registry, self.type_name(), input)
    }

    /// Builds an unsaved record from a mapping, then runs `init` on it.
    pub fn build_with<F>(&self, input: &Map<String, Value>, init: F) -> DocumentStoreResult<Record>
    where
        F: FnOnce(&mut Record),
    {
        Record::build_with(self.registry, self.type_name(), input, init)
    }

    /// Builds a record from `input` and saves it.
    ///
    /// The record is returned whether or not the save succeeded; check [`Record::is_new`].
    ///
    /// # Errors
    ///
    /// - [`DocumentStoreError::Argument`] if `input` is not a mapping
    /// - any error of [`RecordCollection::build`] or [`RecordCollection::save`]
    pub async fn create(&self, input: Value) -> DocumentStoreResult<Record> {
        let fields = match input {
            Value::Object(fields) => fields,
            other => {
                return Err(DocumentStoreError::Argument(format!(
                    "create needs a mapping of attributes, got {other}"
                )));
            }
        };

        let mut record = self.build(&fields)?;
        if !self.save(&mut record).await? {
            warn!(record_type = self.type_name(), "created record was not saved");
        }

        Ok(record)
    }

    /// Saves a record: `PUT /{db}/{id}` when it has an id, `POST /{db}` otherwise.
    ///
    /// When the response body is JSON, the record's `id` and `rev` are replaced by the
    /// response's `id` and `rev` fields, whatever the status.
    ///
    /// # Returns
    ///
    /// `true` if the store answered `201 Created`.
    ///
    /// # Errors
    ///
    /// - [`DocumentStoreError::Argument`] if the record is not of this collection's type or one
    ///   of its subtypes
    /// - otherwise only when no response was obtained: the type is not connected, the record
    ///   cannot be serialized or the transport failed
    pub async fn save(&self, record: &mut Record) -> DocumentStoreResult<bool> {
        self.check_member(record)?;
        save_record(record).await
    }

    /// Deletes a stored record and resets its identity so it can be saved again as new.
    ///
    /// # Returns
    ///
    /// `true` if the store answered `202 Accepted`.
    ///
    /// # Errors
    ///
    /// - [`DocumentStoreError::Argument`] if the record does not belong to this collection
    /// - [`DocumentStoreError::Precondition`] "You must specify a revision" if the record is new
    /// - [`DocumentStoreError::Precondition`] "You must specify an id" if it has no id
    pub async fn delete(&self, record: &mut Record) -> DocumentStoreResult<bool> {
        self.check_member(record)?;
        delete_record(record).await
    }

    /// Records of subtypes belong to the collection of their ancestors.
    fn check_member(&self, record: &Record) -> DocumentStoreResult<()> {
        let mut current = Some(record.type_name());
        while let Some(type_name) = current {
            if type_name == self.type_name() {
                return Ok(());
            }
            current = self.registry.declaration(type_name).and_then(|decl| decl.parent());
        }

        Err(DocumentStoreError::Argument(format!(
            "a {} record does not belong to the {} collection",
            record.type_name(),
            self.type_name()
        )))
    }

    /// Deletes the document stored under `id` at revision `rev`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::Argument`] if either is missing.
    pub async fn delete_by_id(&self, id: Option<&str>, rev: Option<&str>) -> DocumentStoreResult<bool> {
        let id = id.ok_or_else(|| DocumentStoreError::Argument("You must specify an id".to_string()))?;
        let rev = rev.ok_or_else(|| DocumentStoreError::Argument("You must specify a revision".to_string()))?;

        delete_document(&self.schema, id, rev).await
    }

    /// Finds records according to `scope`.
    ///
    /// # Errors
    ///
    /// - [`DocumentStoreError::Argument`] for [`Scope::All`] and [`Scope::First`] without a usable
    ///   filter or `from` path
    /// - [`DocumentStoreError::Request`] if the store answers with an unexpected status
    pub async fn find(&self, scope: Scope, options: &FindOptions) -> DocumentStoreResult<Found> {
        match scope {
            Scope::All => self.find_all(options).await.map(Found::Many),
            Scope::First => self.find_first(options).await.map(Found::One),
            Scope::Id(id) => self.find_by_id(&id).await.map(Found::One),
        }
    }

    /// Fetches the record stored under `id`; `None` if the store answers `404`.
    pub async fn find_by_id(&self, id: &str) -> DocumentStoreResult<Option<Record>> {
        let transport = self.schema.connection()?;
        let path = format!("/{}/{}", self.database_name(), encode_segment(id));

        debug!(method = "GET", path = %path, "fetching record");
        let response = transport.get(&path).await?;

        match response.code {
            NOT_FOUND => Ok(None),
            _ if response.is_success() => {
                let record = marshal::deserialize(self.registry, self.type_name(), response.json()?)?;
                Ok(Some(record))
            }
            code => Err(DocumentStoreError::Request(code, path)),
        }
    }

    /// Every record of the view result.
    pub async fn find_all(&self, options: &FindOptions) -> DocumentStoreResult<Vec<Record>> {
        let transport = self.schema.connection()?;
        let path = view_path(self.database_name(), options)?;

        debug!(method = "GET", path = %path, "querying view");
        let response = transport.get(&path).await?;
        if !response.is_success() {
            return Err(DocumentStoreError::Request(response.code, path));
        }

        let body = response.json()?;
        let rows = body
            .get("rows")
            .and_then(Value::as_array)
            .ok_or_else(|| DocumentStoreError::Serialization(format!("view {path} answered without rows")))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            match row.get("value") {
                Some(document @ Value::Object(_)) => {
                    records.push(marshal::deserialize(self.registry, self.type_name(), document.clone())?);
                }
                _ => warn!(path = %path, "skipping view row without a document value"),
            }
        }

        Ok(records)
    }

    /// The first record of the view result, if any.
    pub async fn find_first(&self, options: &FindOptions) -> DocumentStoreResult<Option<Record>> {
        Ok(self.find_all(options).await?.into_iter().next())
    }

    /// Number of records in the view result.
    pub async fn count(&self, options: &FindOptions) -> DocumentStoreResult<usize> {
        Ok(self.find_all(options).await?.len())
    }
}

pub(crate) async fn save_record(record: &mut Record) -> DocumentStoreResult<bool> {
    let schema = record.schema().clone();
    let transport = schema.connection()?;
    let body = marshal::to_json(record)?;

    let response = match record.id() {
        Some(id) => {
            let path = format!("/{}/{}", schema.database_name(), encode_segment(&id));
            debug!(method = "PUT", path = %path, "saving record");
            transport.put(&path, Some(&body)).await?
        }
        None => {
            let path = format!("/{}", schema.database_name());
            debug!(method = "POST", path = %path, "saving new record");
            transport.post(&path, &body).await?
        }
    };

    match response.json() {
        Ok(reply) => {
            let id = reply.get("id").cloned().unwrap_or(Value::Null);
            let rev = reply.get("rev").cloned().unwrap_or(Value::Null);
            record.set_identity(id, rev);
        }
        Err(err) => warn!(code = response.code, error = %err, "save response is not JSON"),
    }

    debug!(record_type = schema.name(), code = response.code, rev = ?record.rev(), "save answered");
    Ok(response.code == CREATED)
}

pub(crate) async fn delete_record(record: &mut Record) -> DocumentStoreResult<bool> {
    if record.is_new() {
        return Err(DocumentStoreError::Precondition("You must specify a revision".to_string()));
    }
    let Some(id) = record.id() else {
        return Err(DocumentStoreError::Precondition("You must specify an id".to_string()));
    };
    let rev = record.rev().unwrap_or_default();

    let deleted = delete_document(record.schema(), &id, &rev).await?;
    if deleted {
        record.set_identity(Value::Null, Value::Null);
    }

    Ok(deleted)
}

async fn delete_document(schema: &Schema, id: &str, rev: &str) -> DocumentStoreResult<bool> {
    let transport = schema.connection()?;
    let path = format!(
        "/{}/{}?rev={}",
        schema.database_name(),
        encode_segment(id),
        urlencode(rev)
    );

    debug!(method = "DELETE", path = %path, "deleting record");
    let response = transport.delete(&path).await?;

    Ok(response.code == ACCEPTED)
}

/// A collection that converts records to and from the model type `M`.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the registry reference
/// * `M` - The model type
#[derive(Debug)]
pub struct TypedCollection<'a, M: Model> {
    records: RecordCollection<'a>,
    _marker: PhantomData<M>,
}

impl<'a, M: Model> TypedCollection<'a, M> {
    /// Creates a new typed collection reference (internal use).
    pub(crate) fn new(records: RecordCollection<'a>) -> Self {
        Self {
            records,
            _marker: PhantomData,
        }
    }

    /// The untyped collection underneath.
    pub fn records(&self) -> &RecordCollection<'a> {
        &self.records
    }

    /// Saves `model` as a new or replaced document and returns it with the identity the store
    /// assigned.
    ///
    /// # Returns
    ///
    /// `Ok(None)` if the store did not answer `201 Created`.
    pub async fn save(&self, model: &M) -> DocumentStoreResult<Option<M>> {
        let mut record = Record::from_model(self.records.registry, model)?;
        if self.records.save(&mut record).await? {
            Ok(Some(record.to_model()?))
        } else {
            Ok(None)
        }
    }

    pub async fn find_by_id(&self, id: &str) -> DocumentStoreResult<Option<M>> {
        self.records
            .find_by_id(id)
            .await?
            .map(|record| record.to_model())
            .transpose()
    }

    pub async fn find_all(&self, options: &FindOptions) -> DocumentStoreResult<Vec<M>> {
        self.records
            .find_all(options)
            .await?
            .iter()
            .map(Record::to_model)
            .collect()
    }

    pub async fn find_first(&self, options: &FindOptions) -> DocumentStoreResult<Option<M>> {
        self.records
            .find_first(options)
            .await?
            .map(|record| record.to_model())
            .transpose()
    }

    pub async fn count(&self, options: &FindOptions) -> DocumentStoreResult<usize> {
        self.records.count(options).await
    }

    pub async fn delete_by_id(&self, id: Option<&str>, rev: Option<&str>) -> DocumentStoreResult<bool> {
        self.records.delete_by_id(id, rev).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        backend::testing::ScriptedTransport,
        schema::{AssociationOptions, AttributeOptions, RecordType},
    };

    fn registry(transport: Arc<ScriptedTransport>) -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .register(
                RecordType::builder("Person")
                    .has("name", AttributeOptions::new())
                    .has("age", AttributeOptions::new())
                    .has_many("addresses", AssociationOptions::new())
                    .build()
                    .unwrap(),
            )
            .unwrap()
            .register(
                RecordType::builder("Person::Address")
                    .has("street", AttributeOptions::new())
                    .build()
                    .unwrap(),
            )
            .unwrap()
            .connect_shared("Person", transport);
        registry
    }

    fn collection(registry: &SchemaRegistry) -> RecordCollection<'_> {
        RecordCollection::new(registry, registry.schema("Person").unwrap())
    }

    #[tokio::test]
    async fn saving_a_new_record_posts_and_adopts_identity() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(201, r#"{"ok":true,"id":"abc","rev":"1-x"}"#);
        let registry = registry(transport.clone());
        let people = collection(&registry);

        let mut person = people.build(json!({"name": "McLovin"}).as_object().unwrap()).unwrap();
        assert!(person.is_new());
        assert!(people.save(&mut person).await.unwrap());

        assert_eq!(person.id().as_deref(), Some("abc"));
        assert_eq!(person.rev().as_deref(), Some("1-x"));
        assert!(!person.is_new());

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].path, "/people");
        let body: Value = serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"name": "McLovin", "addresses": []}));
    }

    #[tokio::test]
    async fn ids_are_percent_encoded_as_path_segments() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .respond(201, r#"{"ok":true,"id":"my doc","rev":"1-y"}"#)
            .respond(202, r#"{"ok":true}"#);
        let registry = registry(transport.clone());
        let people = collection(&registry);

        let mut person = people.build(&Map::new()).unwrap();
        person.set_id("my doc");
        assert!(people.save(&mut person).await.unwrap());
        assert!(people.delete(&mut person).await.unwrap());

        let requests = transport.requests();
        assert_eq!(requests[0].path, "/people/my%20doc");
        assert_eq!(requests[1].path, "/people/my%20doc?rev=1-y");
    }

    #[tokio::test]
    async fn records_of_other_types_are_rejected() {
        let transport = Arc::new(ScriptedTransport::new());
        let mut registry = registry(transport.clone());
        registry
            .register(RecordType::builder("Student").extends("Person").build().unwrap())
            .unwrap();
        let people = collection(&registry);

        let mut address = Record::build(&registry, "Person::Address", &Map::new()).unwrap();
        assert!(matches!(
            people.save(&mut address).await.unwrap_err(),
            DocumentStoreError::Argument(_)
        ));
        address.set_identity(json!("a"), json!("1-a"));
        assert!(matches!(
            people.delete(&mut address).await.unwrap_err(),
            DocumentStoreError::Argument(_)
        ));
        assert!(transport.requests().is_empty());

        transport.respond(201, r#"{"ok":true,"id":"s","rev":"1-s"}"#);
        let mut student = Record::build(&registry, "Student", &Map::new()).unwrap();
        assert!(people.save(&mut student).await.unwrap());
        assert_eq!(transport.requests()[0].path, "/people");
    }

    #[tokio::test]
    async fn saving_with_an_id_puts() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(201, r#"{"ok":true,"id":"mclovin","rev":"1-y"}"#);
        let registry = registry(transport.clone());
        let people = collection(&registry);

        let mut person = people.build(json!({"id": "mclovin"}).as_object().unwrap()).unwrap();
        assert!(people.save(&mut person).await.unwrap());

        let requests = transport.requests();
        assert_eq!(requests[0].method, "PUT");
        assert_eq!(requests[0].path, "/people/mclovin");
        assert!(requests[0].body.as_deref().unwrap().contains(r#""_id":"mclovin""#));
    }

    #[tokio::test]
    async fn unsuccessful_save_returns_false_and_overwrites_identity() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(409, r#"{"error":"conflict","reason":"Document update conflict."}"#);
        let registry = registry(transport.clone());
        let people = collection(&registry);

        let mut person = people
            .build(json!({"id": "mclovin", "rev": "1-a"}).as_object().unwrap())
            .unwrap();
        assert!(!people.save(&mut person).await.unwrap());
        assert_eq!(person.id(), None);
        assert!(person.is_new());
    }

    #[tokio::test]
    async fn non_json_save_response_keeps_identity() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(500, "<html>oops</html>");
        let registry = registry(transport.clone());
        let people = collection(&registry);

        let mut person = people
            .build(json!({"id": "mclovin", "rev": "1-a"}).as_object().unwrap())
            .unwrap();
        assert!(!people.save(&mut person).await.unwrap());
        assert_eq!(person.rev().as_deref(), Some("1-a"));
    }

    #[tokio::test]
    async fn deleting_checks_revision_then_id() {
        let transport = Arc::new(ScriptedTransport::new());
        let registry = registry(transport.clone());
        let people = collection(&registry);

        let mut fresh = people.build(json!({"id": "x"}).as_object().unwrap()).unwrap();
        let err = people.delete(&mut fresh).await.unwrap_err();
        assert_eq!(err.to_string(), "You must specify a revision");

        let mut anonymous = people.build(json!({"rev": "1-a"}).as_object().unwrap()).unwrap();
        let err = people.delete(&mut anonymous).await.unwrap_err();
        assert_eq!(err.to_string(), "You must specify an id");

        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn deleting_resets_identity() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(202, r#"{"ok":true}"#);
        let registry = registry(transport.clone());
        let people = collection(&registry);

        let mut person = people
            .build(json!({"id": "mclovin", "rev": "1-a"}).as_object().unwrap())
            .unwrap();
        assert!(people.delete(&mut person).await.unwrap());
        assert_eq!(person.id(), None);
        assert!(person.is_new());
        assert_eq!(transport.requests()[0].path, "/people/mclovin?rev=1-a");
    }

    #[tokio::test]
    async fn type_level_delete_requires_id_and_rev() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(202, r#"{"ok":true}"#).respond(404, r#"{"error":"not_found"}"#);
        let registry = registry(transport.clone());
        let people = collection(&registry);

        assert!(matches!(
            people.delete_by_id(None, Some("1-a")).await.unwrap_err(),
            DocumentStoreError::Argument(_)
        ));
        assert!(matches!(
            people.delete_by_id(Some("a"), None).await.unwrap_err(),
            DocumentStoreError::Argument(_)
        ));
        assert!(people.delete_by_id(Some("a"), Some("1-a")).await.unwrap());
        assert!(!people.delete_by_id(Some("b"), Some("1-b")).await.unwrap());
    }

    #[tokio::test]
    async fn create_rejects_non_mappings_and_returns_unsaved_records() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(500, r#"{"error":"internal"}"#);
        let registry = registry(transport.clone());
        let people = collection(&registry);

        assert!(matches!(
            people.create(json!(["McLovin"])).await.unwrap_err(),
            DocumentStoreError::Argument(_)
        ));

        let person = people.create(json!({"name": "McLovin"})).await.unwrap();
        assert!(person.is_new());
        assert_eq!(person.get("name"), Some(&json!("McLovin")));
    }

    #[tokio::test]
    async fn finds_through_views() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .respond(
                200,
                r#"{"rows":[{"value":{"_id":"a","_rev":"1-a","name":"McLovin","addresses":[{"street":"Main"}]}}]}"#,
            )
            .respond(200, r#"{"rows":[]}"#);
        let registry = registry(transport.clone());
        let people = collection(&registry);
        let options = FindOptions::builder().by("name", "McLovin").build();

        let found = people.find(Scope::All, &options).await.unwrap().into_vec();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id().as_deref(), Some("a"));
        assert_eq!(found[0].children("addresses")[0].get("street"), Some(&json!("Main")));

        let first = people.find(Scope::First, &options).await.unwrap().into_first();
        assert!(first.is_none());

        let paths = transport.requests().into_iter().map(|r| r.path).collect::<Vec<_>>();
        assert_eq!(paths, vec!["/people/_view/by_name/by_name?key=McLovin"; 2]);
    }

    #[tokio::test]
    async fn counts_view_rows() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.respond(200, r#"{"rows":[{"value":{"name":"a"}},{"value":{"name":"b"}},{"id":"c"}]}"#);
        let registry = registry(transport.clone());
        let people = collection(&registry);

        let options = FindOptions::builder().from("/people/_design/all/_view/all").build();
        assert_eq!(people.count(&options).await.unwrap(), 2);
        assert_eq!(transport.requests()[0].path, "/people/_design/all/_view/all");
    }

    #[tokio::test]
    async fn find_by_id_maps_not_found_to_none() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .respond(404, r#"{"error":"not_found","reason":"missing"}"#)
            .respond(200, r#"{"_id":"a","_rev":"2-b","name":"Fogell"}"#)
            .respond(500, r#"{"error":"internal"}"#);
        let registry = registry(transport.clone());
        let people = collection(&registry);

        assert!(people.find(Scope::Id("zzz".to_string()), &FindOptions::new()).await.unwrap().into_first().is_none());

        let person = people.find_by_id("a").await.unwrap().unwrap();
        assert_eq!(person.rev().as_deref(), Some("2-b"));
        assert_eq!(person.get("name"), Some(&json!("Fogell")));

        assert!(matches!(
            people.find_by_id("a").await.unwrap_err(),
            DocumentStoreError::Request(500, path) if path == "/people/a"
        ));
    }

    #[tokio::test]
    async fn unconnected_types_fail_before_any_request() {
        let mut registry = SchemaRegistry::new();
        registry.register(RecordType::new("Ghost")).unwrap();
        let ghosts = RecordCollection::new(&registry, registry.schema("Ghost").unwrap());

        let mut ghost = ghosts.build(&Map::new()).unwrap();
        assert!(matches!(
            ghosts.save(&mut ghost).await.unwrap_err(),
            DocumentStoreError::NotConnected(_)
        ));
    }
}
